//! GameMode: the game variant a score was achieved under.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Game variant. Leaderboards and ranks can be filtered by it.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    /// Hitting a wall ends the game.
    Walls,
    /// The snake wraps around the board edges.
    Passthrough,
}

impl GameMode {
    /// Value stored in the `mode` column and used on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            GameMode::Walls => "walls",
            GameMode::Passthrough => "passthrough",
        }
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
