use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::{Winner, WordPair};

/// How many used word pairs the history keeps.
pub const HISTORY_CAPACITY: usize = 100;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export)]
pub struct GameStats {
    pub total_games: u32,
    pub civil_wins: u32,
    pub undercover_wins: u32,
    pub mister_white_wins: u32,
    pub used_word_pairs: Vec<WordPair>,
    pub last_played_at: Option<String>, // ISO 8601 string
}

impl GameStats {
    pub fn wins_for(&self, winner: Winner) -> u32 {
        match winner {
            Winner::Civil => self.civil_wins,
            Winner::Undercover => self.undercover_wins,
            Winner::MisterWhite => self.mister_white_wins,
        }
    }

    /// Share of finished rounds won by `winner`, 0.0 before any game.
    pub fn win_rate(&self, winner: Winner) -> f64 {
        if self.total_games == 0 {
            return 0.0;
        }
        f64::from(self.wins_for(winner)) / f64::from(self.total_games)
    }
}
