pub mod app;
pub mod config;
pub mod input;
pub mod render;

use anyhow::{Context, Result};
use game_core::GameSession;

use crate::app::App;
use crate::config::Config;

/// Wire the session, its history store and timings from `config`.
pub fn build_app(config: &Config) -> Result<App> {
    let history = game_persistence::connection::open_history_store(&config.history_path)
        .with_context(|| format!("Failed to open history at {}", config.history_path))?;

    let session = match config.seed {
        Some(seed) => {
            tracing::info!(seed, "using a fixed seed");
            GameSession::with_seed(history, seed)
        }
        None => GameSession::new(history),
    };

    Ok(App::new(session.with_timings(config.timings())))
}
