//! Room phase and combat-side tags.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The lifecycle phase of a room.
///
/// ```text
/// LOBBY → PLANNING ⇄ COMBAT → END
/// ```
///
/// - **Lobby**: room exists, accepting joins. No timers run.
/// - **Planning**: shopping and unit placement window.
/// - **Combat**: pairings fight; boards are locked.
/// - **End**: terminal. The room processes no further ticks.
///
/// Planning and combat alternate each round until at most one player
/// has positive health, at which point the room ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GamePhase {
    Lobby,
    Planning,
    Combat,
    End,
}

impl GamePhase {
    /// Returns `true` while the room is accepting new players.
    pub fn is_joinable(&self) -> bool {
        matches!(self, Self::Lobby)
    }

    /// Returns `true` once the match proper has started.
    pub fn is_running(&self) -> bool {
        matches!(self, Self::Planning | Self::Combat)
    }

    /// The phase that follows this one when a deadline expires.
    ///
    /// Planning and combat alternate; lobby and end have no timed
    /// successor (lobby advances via start-match, end is terminal).
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Planning => Some(Self::Combat),
            Self::Combat => Some(Self::Planning),
            Self::Lobby | Self::End => None,
        }
    }
}

impl fmt::Display for GamePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lobby => write!(f, "LOBBY"),
            Self::Planning => write!(f, "PLANNING"),
            Self::Combat => write!(f, "COMBAT"),
            Self::End => write!(f, "END"),
        }
    }
}

/// Which half of the shared arena a participant's board was mapped to
/// for the current combat. Cleared when the combat ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BoardSide {
    Top,
    Bottom,
}
