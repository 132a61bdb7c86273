use anyhow::Result;
use game_types::{GameStats, HISTORY_CAPACITY, Winner, WordPair};

/// Best-effort record of finished rounds, used to vary word pairs and show win rates.
///
/// Not authoritative: the engine logs and ignores every error from a store.
pub trait HistoryStore {
    fn used_word_pairs(&self) -> Result<Vec<WordPair>>;
    fn record_outcome(&mut self, winner: Winner, word_pair: &WordPair) -> Result<()>;
    fn stats(&self) -> Result<GameStats>;
    fn clear(&mut self) -> Result<()>;
}

/// Count a finished round and append its pair, keeping the latest [`HISTORY_CAPACITY`].
pub fn apply_outcome(stats: &mut GameStats, winner: Winner, word_pair: &WordPair) {
    stats.total_games += 1;
    match winner {
        Winner::Civil => stats.civil_wins += 1,
        Winner::Undercover => stats.undercover_wins += 1,
        Winner::MisterWhite => stats.mister_white_wins += 1,
    }

    stats.used_word_pairs.push(word_pair.clone());
    if stats.used_word_pairs.len() > HISTORY_CAPACITY {
        let overflow = stats.used_word_pairs.len() - HISTORY_CAPACITY;
        stats.used_word_pairs.drain(..overflow);
    }

    stats.last_played_at = Some(chrono::Utc::now().to_rfc3339());
}

/// History kept for the lifetime of the process only.
#[derive(Debug, Default)]
pub struct MemoryHistory {
    stats: GameStats,
}

impl MemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HistoryStore for MemoryHistory {
    fn used_word_pairs(&self) -> Result<Vec<WordPair>> {
        Ok(self.stats.used_word_pairs.clone())
    }

    fn record_outcome(&mut self, winner: Winner, word_pair: &WordPair) -> Result<()> {
        apply_outcome(&mut self.stats, winner, word_pair);
        Ok(())
    }

    fn stats(&self) -> Result<GameStats> {
        Ok(self.stats.clone())
    }

    fn clear(&mut self) -> Result<()> {
        self.stats = GameStats::default();
        Ok(())
    }
}
