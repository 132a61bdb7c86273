use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::{PlayerConfig, PlayerId};

/// Everything the renderer can ask the engine to do.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum GameCommand {
    StartGame {
        players: Vec<PlayerConfig>,
        undercover_count: usize,
        mister_white_count: usize,
    },
    RevealWord { player_id: PlayerId },
    SelectStartingPlayer { index: usize },
    EliminatePlayer { player_id: PlayerId },
    SubmitMisterWhiteGuess { guess: String },
    SkipRound,
    StartNewRound,
    EnableAmnesicMode { player_id: PlayerId },
    ResetGame,
}

impl GameCommand {
    /// Commands that deal a new round and therefore draw a word pair.
    pub fn deals_round(&self) -> bool {
        matches!(
            self,
            GameCommand::StartGame { .. } | GameCommand::SkipRound | GameCommand::StartNewRound
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            GameCommand::StartGame { .. } => "start-game",
            GameCommand::RevealWord { .. } => "reveal-word",
            GameCommand::SelectStartingPlayer { .. } => "select-starting-player",
            GameCommand::EliminatePlayer { .. } => "eliminate-player",
            GameCommand::SubmitMisterWhiteGuess { .. } => "mister-white-guess",
            GameCommand::SkipRound => "skip-round",
            GameCommand::StartNewRound => "start-new-round",
            GameCommand::EnableAmnesicMode { .. } => "enable-amnesic-mode",
            GameCommand::ResetGame => "reset-game",
        }
    }
}
