use game_types::{GamePhase, PlayerId, Role, ScheduledTransition, Winner, WordPair};

#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    RoundDealt {
        round_number: u32,
        player_count: usize,
    },
    WordRevealed {
        player_id: PlayerId,
    },
    TransitionScheduled {
        transition: ScheduledTransition,
    },
    PhaseChanged {
        from: GamePhase,
        to: GamePhase,
    },
    StartingPlayerSelected {
        player_id: PlayerId,
    },
    PlayerEliminated {
        player_id: PlayerId,
        role: Role,
    },
    MisterWhiteGuessed {
        player_id: PlayerId,
        correct: bool,
    },
    RoundCompleted {
        round_number: u32,
        winner: Winner,
        winner_ids: Vec<PlayerId>,
        word_pair: WordPair,
    },
    RoundSkipped {
        round_number: u32,
    },
    AmnesicModeEnabled {
        player_id: PlayerId,
    },
    GameReset,
}

impl GameEvent {
    pub fn name(&self) -> &'static str {
        match self {
            GameEvent::RoundDealt { .. } => "round-dealt",
            GameEvent::WordRevealed { .. } => "word-revealed",
            GameEvent::TransitionScheduled { .. } => "transition-scheduled",
            GameEvent::PhaseChanged { .. } => "phase-changed",
            GameEvent::StartingPlayerSelected { .. } => "starting-player-selected",
            GameEvent::PlayerEliminated { .. } => "player-eliminated",
            GameEvent::MisterWhiteGuessed { .. } => "mister-white-guessed",
            GameEvent::RoundCompleted { .. } => "round-completed",
            GameEvent::RoundSkipped { .. } => "round-skipped",
            GameEvent::AmnesicModeEnabled { .. } => "amnesic-mode-enabled",
            GameEvent::GameReset => "game-reset",
        }
    }
}

/// Event handler trait for processing game events
pub trait GameEventHandler {
    fn handle_event(&mut self, event: GameEvent);
}

/// Simple event bus for distributing game events
pub struct GameEventBus {
    handlers: Vec<Box<dyn GameEventHandler>>,
}

impl GameEventBus {
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    pub fn add_handler(&mut self, handler: Box<dyn GameEventHandler>) {
        self.handlers.push(handler);
    }

    pub fn publish(&mut self, event: GameEvent) {
        tracing::trace!(event = event.name(), "publishing game event");
        for handler in &mut self.handlers {
            handler.handle_event(event.clone());
        }
    }
}

impl Default for GameEventBus {
    fn default() -> Self {
        Self::new()
    }
}
