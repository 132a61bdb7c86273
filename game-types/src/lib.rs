pub mod commands;
pub mod errors;
pub mod game;
pub mod player;
pub mod stats;

// Re-export all types
pub use commands::*;
pub use errors::*;
pub use game::*;
pub use player::*;
pub use stats::*;

pub type PlayerId = uuid::Uuid;
