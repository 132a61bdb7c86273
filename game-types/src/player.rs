use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::PlayerId;

/// Longest display name a player can have, in characters.
pub const MAX_NAME_LENGTH: usize = 16;

/// Number of seat colours the renderer cycles through.
pub const PALETTE_SIZE: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "kebab-case")]
#[ts(export)]
pub enum Role {
    Civil,
    Undercover,
    MisterWhite,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub role: Role,
    /// Absent for Mister White.
    pub word: Option<String>,
    /// Opaque image reference (data URI, path...), never interpreted by the engine.
    pub profile_image: Option<String>,
    pub score: u32,
    pub is_eliminated: bool,
    pub has_seen_word: bool,
    pub color_index: u8,
}

impl Player {
    pub fn is_alive(&self) -> bool {
        !self.is_eliminated
    }
}

/// What the setup screen hands over for each seat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PlayerConfig {
    pub name: String,
    pub profile_image: Option<String>,
}

impl PlayerConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            profile_image: None,
        }
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.profile_image = Some(image.into());
        self
    }
}

/// Trims surrounding whitespace and caps the name at [`MAX_NAME_LENGTH`] characters.
pub fn sanitize_name(raw: &str) -> String {
    raw.trim().chars().take(MAX_NAME_LENGTH).collect::<String>().trim_end().to_string()
}

/// Palette slot for a seat, 1-based.
pub fn color_index_for_seat(seat: usize) -> u8 {
    ((seat % PALETTE_SIZE) + 1) as u8
}
