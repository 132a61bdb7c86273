#![allow(dead_code)]

use game_core::{
    GameEvent, GameEventHandler, GameSession, MemoryHistory, TransitionTimings, WordDictionary,
};
use game_types::{GamePhase, GameState, Player, PlayerConfig, PlayerId, Role};
use std::sync::{Arc, Mutex};

/// Small table so draws are easy to reason about.
pub fn create_test_dictionary() -> WordDictionary {
    let pair_list = "Chat | Chien\nLion | Tigre\nPomme | Poire\nMer | Océan\nGuitare | Violon";
    WordDictionary::from_pair_list(pair_list).unwrap()
}

pub fn create_roster(names: &[&str]) -> Vec<PlayerConfig> {
    names.iter().map(|name| PlayerConfig::new(*name)).collect()
}

/// `Player1` .. `PlayerN`
pub fn create_numbered_roster(player_count: usize) -> Vec<PlayerConfig> {
    (1..=player_count)
        .map(|i| PlayerConfig::new(format!("Player{}", i)))
        .collect()
}

/// Seeded session with in-memory history where deferred transitions fire inline.
pub fn create_test_session(seed: u64) -> GameSession {
    GameSession::with_seed(Box::new(MemoryHistory::new()), seed)
        .with_timings(TransitionTimings::immediate())
}

/// Same, but deferred transitions are handed back to the test to fire.
pub fn create_delayed_session(seed: u64) -> GameSession {
    GameSession::with_seed(Box::new(MemoryHistory::new()), seed)
}

pub fn create_started_session(
    names: &[&str],
    undercover_count: usize,
    mister_white_count: usize,
    seed: u64,
) -> GameSession {
    let mut session = create_test_session(seed);
    session
        .start_game(create_roster(names), undercover_count, mister_white_count)
        .unwrap();
    session
}

/// Every player views their card in turn.
pub fn reveal_all(session: &mut GameSession) {
    while session.state().phase == GamePhase::WordDistribution && !session.state().all_words_seen() {
        let player_id = session.state().current_player().unwrap().id;
        session.reveal_word(player_id).unwrap();
    }
}

/// Deal, reveal, and let a random eligible player open. Needs immediate timings.
pub fn advance_to_playing(session: &mut GameSession) {
    reveal_all(session);
    assert_eq!(session.state().phase, GamePhase::StartingPlayerSelection);
    let seat = session.pick_starting_player().unwrap();
    session.select_starting_player(seat).unwrap();
    assert_eq!(session.state().phase, GamePhase::Playing);
}

pub fn ids_with_role(state: &GameState, role: Role) -> Vec<PlayerId> {
    state
        .players
        .iter()
        .filter(|p| p.role == role)
        .map(|p| p.id)
        .collect()
}

pub fn first_with_role(state: &GameState, role: Role) -> PlayerId {
    ids_with_role(state, role)[0]
}

pub fn get_player<'a>(state: &'a GameState, player_id: PlayerId) -> &'a Player {
    state.player(player_id).unwrap()
}

/// Event collector for testing event emissions
#[derive(Clone)]
pub struct EventCollector {
    events: Arc<Mutex<Vec<GameEvent>>>,
}

impl EventCollector {
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn get_events(&self) -> Vec<GameEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
    }

    pub fn event_names(&self) -> Vec<&'static str> {
        self.events.lock().unwrap().iter().map(|e| e.name()).collect()
    }

    pub fn has_event_type(&self, check_fn: impl Fn(&GameEvent) -> bool) -> bool {
        self.events.lock().unwrap().iter().any(check_fn)
    }
}

impl GameEventHandler for EventCollector {
    fn handle_event(&mut self, event: GameEvent) {
        self.events.lock().unwrap().push(event);
    }
}
