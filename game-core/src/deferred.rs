use game_types::{GamePhase, GameState, ScheduledTransition};
use std::time::Duration;

/// How long the host waits before firing each deferred transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionTimings {
    pub reveal_delay: Duration,  // last card seen -> starting player selection
    pub amnesic_delay: Duration, // amnesic re-read -> back to playing
}

impl Default for TransitionTimings {
    fn default() -> Self {
        Self {
            reveal_delay: Duration::from_millis(1500),
            amnesic_delay: Duration::from_millis(1500),
        }
    }
}

impl TransitionTimings {
    pub fn new(reveal_delay: Duration, amnesic_delay: Duration) -> Self {
        Self {
            reveal_delay,
            amnesic_delay,
        }
    }

    /// Fire everything as soon as it is scheduled.
    pub fn immediate() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }

    pub fn delay_for(&self, transition: ScheduledTransition) -> Duration {
        match transition {
            ScheduledTransition::BeginStartingPlayerSelection => self.reveal_delay,
            ScheduledTransition::ReturnToPlaying => self.amnesic_delay,
        }
    }
}

/// Apply a deferred transition against whatever state exists when its timer fires.
///
/// Preconditions are checked again at fire time; `None` means the state moved on
/// (reset, skipped round, another command) and the transition is dropped.
pub fn apply_scheduled(state: &GameState, transition: ScheduledTransition) -> Option<GameState> {
    if !is_still_due(state, transition) {
        tracing::debug!(?transition, phase = ?state.phase, "dropping stale deferred transition");
        return None;
    }

    let phase = match transition {
        ScheduledTransition::BeginStartingPlayerSelection => GamePhase::StartingPlayerSelection,
        ScheduledTransition::ReturnToPlaying => GamePhase::Playing,
    };

    Some(GameState {
        phase,
        ..state.clone()
    })
}

fn is_still_due(state: &GameState, transition: ScheduledTransition) -> bool {
    match transition {
        ScheduledTransition::BeginStartingPlayerSelection => {
            state.phase == GamePhase::WordDistribution && state.all_words_seen()
        }
        ScheduledTransition::ReturnToPlaying => {
            state.phase == GamePhase::AmnesicMode
                && state.current_player().is_some_and(|p| p.has_seen_word)
        }
    }
}
