//! Snapshot of a game in progress, as served by the spectate endpoint.

use crate::models::mode::GameMode;
use crate::models::player::Player;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Snake heading.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Grid cell.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: u32,
    pub y: u32,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Snake {
    /// Head first; never empty.
    pub body: Vec<Position>,
    pub direction: Direction,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub snake: Snake,
    pub food: Position,
    pub score: u32,
    pub is_game_over: bool,
    pub is_paused: bool,
    pub mode: GameMode,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveGame {
    pub id: Uuid,
    pub player: Player,
    pub game_state: GameState,
    pub started_at: DateTime<Utc>,
}
