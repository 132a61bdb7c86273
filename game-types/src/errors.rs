use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;

use crate::PlayerId;

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum GameError {
    #[error("invalid configuration: {reason}")]
    InvalidConfiguration { reason: String },
    #[error("player {player_id} is not in this game")]
    PlayerNotFound { player_id: PlayerId },
    #[error("command not allowed in phase {current_state}")]
    InvalidGameState { current_state: String },
    #[error("seat {index} cannot open the discussion")]
    InvalidStartingPlayer { index: usize },
    /// Allocator and validator disagree, which is a bug rather than user error.
    #[error("role allocation failed: {reason}")]
    RoleAllocation { reason: String },
}

impl GameError {
    pub fn invalid_configuration(reason: impl Into<String>) -> Self {
        GameError::InvalidConfiguration {
            reason: reason.into(),
        }
    }
}
