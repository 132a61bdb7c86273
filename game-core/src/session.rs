use game_types::{
    GameCommand, GameError, GameState, GameStats, Player, PlayerConfig, PlayerId,
    ScheduledTransition, WordPair,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, warn};

use crate::{
    GameEvent, GameEventBus, GameEventHandler, HistoryStore, RoundContext, ScoringEngine,
    Transition, TransitionTimings, WordDictionary, apply_command, apply_scheduled,
    pick_starting_player, verify_invariants,
};

/// One table's game: owns the state and everything commands need to run against it.
pub struct GameSession {
    state: GameState,
    dictionary: WordDictionary,
    history: Box<dyn HistoryStore>,
    rng: ChaCha8Rng,
    timings: TransitionTimings,
    event_bus: GameEventBus,
}

impl GameSession {
    pub fn new(history: Box<dyn HistoryStore>) -> Self {
        Self::with_rng(history, ChaCha8Rng::from_entropy())
    }

    /// Reproducible deals and draws for a given seed.
    pub fn with_seed(history: Box<dyn HistoryStore>, seed: u64) -> Self {
        Self::with_rng(history, ChaCha8Rng::seed_from_u64(seed))
    }

    fn with_rng(history: Box<dyn HistoryStore>, rng: ChaCha8Rng) -> Self {
        Self {
            state: GameState::default(),
            dictionary: WordDictionary::builtin(),
            history,
            rng,
            timings: TransitionTimings::default(),
            event_bus: GameEventBus::new(),
        }
    }

    pub fn with_timings(mut self, timings: TransitionTimings) -> Self {
        self.timings = timings;
        self
    }

    pub fn with_dictionary(mut self, dictionary: WordDictionary) -> Self {
        self.dictionary = dictionary;
        self
    }

    pub fn add_event_handler(&mut self, handler: Box<dyn GameEventHandler>) {
        self.event_bus.add_handler(handler);
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Owned copy for rendering or sending elsewhere.
    pub fn snapshot(&self) -> GameState {
        self.state.clone()
    }

    pub fn timings(&self) -> TransitionTimings {
        self.timings
    }

    /// Apply a command. On success returns the deferred transition the host
    /// should fire later with [`GameSession::fire`], if any. Zero delays fire
    /// before this returns.
    pub fn dispatch(&mut self, command: GameCommand) -> Result<Option<ScheduledTransition>, GameError> {
        debug!(command = command.name(), phase = %self.state.phase, "dispatching");
        let used_pairs = if command.deals_round() {
            self.used_pairs()
        } else {
            Vec::new()
        };
        let ctx = RoundContext {
            dictionary: &self.dictionary,
            used_pairs: &used_pairs,
        };

        let transition = apply_command(&self.state, &command, &ctx, &mut self.rng)?;
        Ok(self.commit(transition))
    }

    fn commit(&mut self, transition: Transition) -> Option<ScheduledTransition> {
        let Transition {
            state,
            scheduled,
            outcome,
            events,
        } = transition;
        debug_assert_eq!(verify_invariants(&state), Ok(()));
        self.state = state;

        if let Some(outcome) = outcome {
            if let Err(e) = self.history.record_outcome(outcome.winner, &outcome.word_pair) {
                warn!("Failed to record round outcome: {:#}", e);
            }
        }

        for event in events {
            self.event_bus.publish(event);
        }

        match scheduled {
            Some(transition) if self.timings.delay_for(transition).is_zero() => {
                self.fire(transition);
                None
            }
            other => other,
        }
    }

    /// Fire a deferred transition. Returns false when it no longer applies.
    pub fn fire(&mut self, transition: ScheduledTransition) -> bool {
        let Some(next) = apply_scheduled(&self.state, transition) else {
            return false;
        };

        debug_assert_eq!(verify_invariants(&next), Ok(()));
        let from = self.state.phase;
        self.state = next;
        self.event_bus.publish(GameEvent::PhaseChanged {
            from,
            to: self.state.phase,
        });
        true
    }

    /// Recent pairs to steer the next draw away from, including the round on the table.
    fn used_pairs(&self) -> Vec<WordPair> {
        let mut pairs = self.history.used_word_pairs().unwrap_or_else(|e| {
            warn!("Failed to read word pair history: {:#}", e);
            Vec::new()
        });

        if !self.state.civilian_word.is_empty() {
            let current = self.state.word_pair();
            if pairs.last() != Some(&current) {
                pairs.push(current);
            }
        }
        pairs
    }

    pub fn start_game(
        &mut self,
        players: Vec<PlayerConfig>,
        undercover_count: usize,
        mister_white_count: usize,
    ) -> Result<Option<ScheduledTransition>, GameError> {
        self.dispatch(GameCommand::StartGame {
            players,
            undercover_count,
            mister_white_count,
        })
    }

    pub fn reveal_word(&mut self, player_id: PlayerId) -> Result<Option<ScheduledTransition>, GameError> {
        self.dispatch(GameCommand::RevealWord { player_id })
    }

    pub fn select_starting_player(&mut self, index: usize) -> Result<Option<ScheduledTransition>, GameError> {
        self.dispatch(GameCommand::SelectStartingPlayer { index })
    }

    /// Random eligible seat, for tables that let the app choose.
    pub fn pick_starting_player(&mut self) -> Option<usize> {
        pick_starting_player(&self.state, &mut self.rng)
    }

    pub fn eliminate_player(&mut self, player_id: PlayerId) -> Result<Option<ScheduledTransition>, GameError> {
        self.dispatch(GameCommand::EliminatePlayer { player_id })
    }

    pub fn submit_mister_white_guess(
        &mut self,
        guess: impl Into<String>,
    ) -> Result<Option<ScheduledTransition>, GameError> {
        self.dispatch(GameCommand::SubmitMisterWhiteGuess { guess: guess.into() })
    }

    pub fn skip_round(&mut self) -> Result<Option<ScheduledTransition>, GameError> {
        self.dispatch(GameCommand::SkipRound)
    }

    pub fn start_new_round(&mut self) -> Result<Option<ScheduledTransition>, GameError> {
        self.dispatch(GameCommand::StartNewRound)
    }

    pub fn enable_amnesic_mode(&mut self, player_id: PlayerId) -> Result<Option<ScheduledTransition>, GameError> {
        self.dispatch(GameCommand::EnableAmnesicMode { player_id })
    }

    pub fn reset_game(&mut self) -> Result<Option<ScheduledTransition>, GameError> {
        self.dispatch(GameCommand::ResetGame)
    }

    /// Aggregate history; empty stats when the store cannot be read.
    pub fn stats(&self) -> GameStats {
        self.history.stats().unwrap_or_else(|e| {
            warn!("Failed to read game stats: {:#}", e);
            GameStats::default()
        })
    }

    pub fn clear_history(&mut self) {
        if let Err(e) = self.history.clear() {
            warn!("Failed to clear game history: {:#}", e);
        }
    }

    pub fn leaderboard(&self) -> Vec<Player> {
        ScoringEngine::leaderboard(&self.state.players)
    }
}
