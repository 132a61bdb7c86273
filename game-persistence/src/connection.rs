use anyhow::Result;
use game_core::{HistoryStore, MemoryHistory};

use crate::HistoryManager;

pub const DEFAULT_HISTORY_PATH: &str = "undercover_history.json";

/// Location that keeps history in memory for the lifetime of the process.
pub const MEMORY_HISTORY: &str = ":memory:";

pub fn open_history_store(location: &str) -> Result<Box<dyn HistoryStore>> {
    if location == MEMORY_HISTORY {
        return Ok(Box::new(open_memory_history()));
    }

    let manager = HistoryManager::open(location)?;
    tracing::info!("Recording game history in {}", manager.path().display());
    Ok(Box::new(manager.repository()))
}

pub fn open_memory_history() -> MemoryHistory {
    MemoryHistory::new()
}
