use anyhow::{Context, Result};
use game_core::{HistoryStore, apply_outcome};
use game_types::{GameStats, Winner, WordPair};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Game history kept as one JSON document, rewritten after every finished round.
pub struct JsonHistoryRepository {
    path: PathBuf,
}

impl JsonHistoryRepository {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored stats. A missing file is an empty history.
    pub fn load(&self) -> Result<GameStats> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(GameStats::default()),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {}", self.path.display()));
            }
        };

        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse history in {}", self.path.display()))
    }

    fn save(&self, stats: &GameStats) -> Result<()> {
        let json = serde_json::to_string_pretty(stats)?;

        // Write next to the target and rename so a crash never leaves half a file.
        let staging = self.path.with_extension("json.tmp");
        std::fs::write(&staging, json)
            .with_context(|| format!("Failed to write {}", staging.display()))?;
        std::fs::rename(&staging, &self.path)
            .with_context(|| format!("Failed to replace {}", self.path.display()))?;
        Ok(())
    }
}

impl HistoryStore for JsonHistoryRepository {
    fn used_word_pairs(&self) -> Result<Vec<WordPair>> {
        Ok(self.load()?.used_word_pairs)
    }

    fn record_outcome(&mut self, winner: Winner, word_pair: &WordPair) -> Result<()> {
        let mut stats = self.load().unwrap_or_else(|e| {
            tracing::warn!("Starting a fresh history: {:#}", e);
            GameStats::default()
        });
        apply_outcome(&mut stats, winner, word_pair);
        self.save(&stats)?;

        tracing::debug!(total_games = stats.total_games, "history saved");
        Ok(())
    }

    fn stats(&self) -> Result<GameStats> {
        self.load()
    }

    fn clear(&mut self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("Failed to remove {}", self.path.display())),
        }
    }
}
