pub mod connection;
pub mod repositories;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use repositories::JsonHistoryRepository;

/// Owns the location of the history file and hands out repositories over it.
pub struct HistoryManager {
    path: PathBuf,
}

impl HistoryManager {
    /// Make sure the history file's directory exists. An unreadable file is
    /// only reported; the next recorded round replaces it.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create history directory {}", parent.display()))?;
        }

        if let Err(e) = JsonHistoryRepository::new(&path).load() {
            tracing::warn!("Ignoring unreadable history: {:#}", e);
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn repository(&self) -> JsonHistoryRepository {
        JsonHistoryRepository::new(&self.path)
    }
}
