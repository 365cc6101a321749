//! Service logic: leaderboard engine, accounts, profiles and demo data.

pub mod identity;
pub mod leaderboard;
pub mod player;
pub mod seed;

pub use identity::{
    create_account, issue_token, purge_expired_sessions, resolve_user_from_token,
    revoke_token, verify_credentials, AuthSettings,
};
pub use leaderboard::{compute_rank, get_leaderboard, get_live_games, submit_score};
pub use player::get_profile;
pub use seed::{load_roster, seed_players, SeedPlayer, SeedReport, DEFAULT_ROSTER, DEMO_PASSWORD};
