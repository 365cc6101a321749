//! Data structures for the leaderboard service: players, scores, leaderboards, accounts.

mod error;
mod leaderboard;
mod live;
mod mode;
mod player;
mod score;
mod user;

pub use error::{ServiceError, ServiceResult};
pub use leaderboard::{
    LeaderboardEntry, LeaderboardPage, LeaderboardQuery, LiveGamesQuery, MAX_LEADERBOARD_LIMIT,
    MAX_LIVE_GAMES_LIMIT,
};
pub use live::{Direction, GameState, LiveGame, Position, Snake};
pub use mode::GameMode;
pub use player::{Player, UserId};
pub use score::{ScoreId, ScoreOutcome, ScoreRecord, ScoreResponse, ScoreSubmission};
pub use user::{AuthResponse, AuthUser, LoginRequest, Session, SignupRequest, User, MIN_PASSWORD_LEN};
