pub mod config_validation;
pub mod deferred;
pub mod dictionary;
pub mod game_events;
pub mod game_state;
pub mod history;
pub mod invariants;
pub mod roles;
pub mod scoring;
pub mod session;

// Re-export main components
pub use config_validation::*;
pub use deferred::*;
pub use dictionary::*;
pub use game_events::*;
pub use game_state::*;
pub use history::*;
pub use invariants::*;
pub use roles::*;
pub use scoring::*;
pub use session::*;
