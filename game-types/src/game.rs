use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::{Player, PlayerId, Role};

pub const MIN_PLAYERS: usize = 3;
pub const MAX_PLAYERS: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "kebab-case")]
#[ts(export)]
pub enum GamePhase {
    Setup,
    WordDistribution,
    StartingPlayerSelection,
    Playing,
    /// Mister White has been voted out and gets one guess at the civilian word.
    Voting,
    /// One player is re-reading their card mid-discussion.
    AmnesicMode,
    GameOver,
}

impl GamePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::Setup => "setup",
            GamePhase::WordDistribution => "word-distribution",
            GamePhase::StartingPlayerSelection => "starting-player-selection",
            GamePhase::Playing => "playing",
            GamePhase::Voting => "voting",
            GamePhase::AmnesicMode => "amnesic-mode",
            GamePhase::GameOver => "game-over",
        }
    }
}

impl std::fmt::Display for GamePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "kebab-case")]
#[ts(export)]
pub enum Winner {
    Civil,
    Undercover,
    MisterWhite,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct WordPair {
    pub civilian: String,
    pub undercover: String,
}

impl WordPair {
    pub fn new(civilian: impl Into<String>, undercover: impl Into<String>) -> Self {
        Self {
            civilian: civilian.into(),
            undercover: undercover.into(),
        }
    }

    /// The word a given role receives on its card.
    pub fn word_for(&self, role: Role) -> Option<&str> {
        match role {
            Role::Civil => Some(&self.civilian),
            Role::Undercover => Some(&self.undercover),
            Role::MisterWhite => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct GameSettings {
    pub min_players: usize,
    pub max_players: usize,
    pub undercover_count: usize,
    pub mister_white_count: usize,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            min_players: MIN_PLAYERS,
            max_players: MAX_PLAYERS,
            undercover_count: 1,
            mister_white_count: 1,
        }
    }
}

/// Deferred phase changes the engine asks its host to fire after a delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "kebab-case")]
#[ts(export)]
pub enum ScheduledTransition {
    /// Every card has been seen, move on to picking who opens the discussion.
    BeginStartingPlayerSelection,
    /// The amnesic player has re-read their card.
    ReturnToPlaying,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct GameState {
    pub phase: GamePhase,
    /// Seating order, which is also the card distribution order.
    pub players: Vec<Player>,
    pub current_player_index: usize,
    pub starting_player_index: Option<usize>,
    pub civilian_word: String,
    pub undercover_word: String,
    pub round_number: u32,
    pub winner: Option<Winner>,
    pub winner_players: Option<Vec<Player>>,
    /// The eliminated Mister White whose guess is pending, only set in `Voting`.
    pub guessing_player_id: Option<PlayerId>,
    pub game_settings: GameSettings,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            phase: GamePhase::Setup,
            players: Vec::new(),
            current_player_index: 0,
            starting_player_index: None,
            civilian_word: String::new(),
            undercover_word: String::new(),
            round_number: 1,
            winner: None,
            winner_players: None,
            guessing_player_id: None,
            game_settings: GameSettings::default(),
        }
    }
}

impl GameState {
    pub fn word_pair(&self) -> WordPair {
        WordPair::new(self.civilian_word.clone(), self.undercover_word.clone())
    }

    pub fn current_player(&self) -> Option<&Player> {
        self.players.get(self.current_player_index)
    }

    pub fn player(&self, player_id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == player_id)
    }

    pub fn seat_of(&self, player_id: PlayerId) -> Option<usize> {
        self.players.iter().position(|p| p.id == player_id)
    }

    pub fn player_by_name(&self, name: &str) -> Option<&Player> {
        let wanted = name.trim().to_lowercase();
        self.players.iter().find(|p| p.name.to_lowercase() == wanted)
    }

    pub fn all_words_seen(&self) -> bool {
        !self.players.is_empty() && self.players.iter().all(|p| p.has_seen_word)
    }

    /// Living players per role, as `(civil, undercover, mister_white)`.
    pub fn alive_counts(&self) -> (usize, usize, usize) {
        alive_counts(&self.players)
    }
}

pub fn alive_counts(players: &[Player]) -> (usize, usize, usize) {
    players
        .iter()
        .filter(|p| p.is_alive())
        .fold((0, 0, 0), |(c, u, w), p| match p.role {
            Role::Civil => (c + 1, u, w),
            Role::Undercover => (c, u + 1, w),
            Role::MisterWhite => (c, u, w + 1),
        })
}
