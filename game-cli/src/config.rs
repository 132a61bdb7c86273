use anyhow::{Context, Result};
use game_core::TransitionTimings;
use game_persistence::connection::DEFAULT_HISTORY_PATH;
use std::env;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// File for the round history, or `:memory:`.
    pub history_path: String,
    pub reveal_delay_ms: u64,
    pub amnesic_delay_ms: u64,
    pub seed: Option<u64>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        Ok(Self {
            history_path: lookup("UNDERCOVER_HISTORY_PATH")
                .unwrap_or_else(|| DEFAULT_HISTORY_PATH.to_string()),
            reveal_delay_ms: parse_var(&lookup, "REVEAL_DELAY_MS")?.unwrap_or(1500),
            amnesic_delay_ms: parse_var(&lookup, "AMNESIC_DELAY_MS")?.unwrap_or(1500),
            seed: parse_var(&lookup, "UNDERCOVER_SEED")?,
        })
    }

    pub fn timings(&self) -> TransitionTimings {
        TransitionTimings::new(
            Duration::from_millis(self.reveal_delay_ms),
            Duration::from_millis(self.amnesic_delay_ms),
        )
    }
}

fn parse_var(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<u64>> {
    lookup(key)
        .map(|value| {
            value
                .trim()
                .parse()
                .with_context(|| format!("Invalid {}: {:?}", key, value))
        })
        .transpose()
}
