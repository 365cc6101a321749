//! Snake Showdown leaderboard backend: library with models, business logic and HTTP routes.

pub mod config;
pub mod db;
pub mod logic;
pub mod models;
pub mod web;

pub use logic::{
    compute_rank, create_account, get_leaderboard, get_live_games, get_profile, issue_token,
    resolve_user_from_token, revoke_token, submit_score, verify_credentials, AuthSettings,
};
pub use models::{
    AuthUser, GameMode, LeaderboardEntry, LeaderboardPage, LiveGame, Player, ScoreOutcome,
    ScoreRecord, ServiceError, ServiceResult, User, UserId,
};
