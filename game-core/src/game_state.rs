use game_types::{
    GameCommand, GameError, GamePhase, GameSettings, GameState, Player, PlayerConfig, PlayerId,
    Role, ScheduledTransition, Winner, WordPair, sanitize_name,
};
use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::HashSet;
use tracing::{debug, error, info};

use crate::{
    ConfigValidator, GameEvent, RoleAllocator, RoleCounts, ScoringEngine, WordDictionary,
    normalize_word,
};

/// What a round deal needs besides the current state.
pub struct RoundContext<'a> {
    pub dictionary: &'a WordDictionary,
    /// Pairs to avoid, oldest first.
    pub used_pairs: &'a [WordPair],
}

#[derive(Debug, Clone, PartialEq)]
pub struct RoundOutcome {
    pub winner: Winner,
    pub word_pair: WordPair,
}

/// The result of applying one command: the replacement state plus what the
/// host has to do about it.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: GameState,
    pub scheduled: Option<ScheduledTransition>,
    /// Set when this transition finished a round.
    pub outcome: Option<RoundOutcome>,
    pub events: Vec<GameEvent>,
}

impl Transition {
    fn to(state: GameState) -> Self {
        Self {
            state,
            scheduled: None,
            outcome: None,
            events: Vec::new(),
        }
    }

    fn unchanged(state: &GameState) -> Self {
        Self::to(state.clone())
    }

    fn with_event(mut self, event: GameEvent) -> Self {
        self.events.push(event);
        self
    }

    fn scheduling(mut self, transition: ScheduledTransition) -> Self {
        self.scheduled = Some(transition);
        self.events.push(GameEvent::TransitionScheduled { transition });
        self
    }
}

/// Apply one command to `state` without touching it, returning the state that
/// replaces it. On error the caller keeps the old state.
pub fn apply_command<R: Rng + ?Sized>(
    state: &GameState,
    command: &GameCommand,
    ctx: &RoundContext<'_>,
    rng: &mut R,
) -> Result<Transition, GameError> {
    let mut transition = match command {
        GameCommand::StartGame {
            players,
            undercover_count,
            mister_white_count,
        } => start_game(state, players, *undercover_count, *mister_white_count, ctx, rng)?,
        GameCommand::RevealWord { player_id } => reveal_word(state, *player_id)?,
        GameCommand::SelectStartingPlayer { index } => select_starting_player(state, *index)?,
        GameCommand::EliminatePlayer { player_id } => eliminate_player(state, *player_id)?,
        GameCommand::SubmitMisterWhiteGuess { guess } => submit_mister_white_guess(state, guess)?,
        GameCommand::SkipRound => next_round(state, ctx, rng, false)?,
        GameCommand::StartNewRound => next_round(state, ctx, rng, true)?,
        GameCommand::EnableAmnesicMode { player_id } => enable_amnesic_mode(state, *player_id)?,
        GameCommand::ResetGame => {
            info!("game reset");
            Transition::to(GameState::default()).with_event(GameEvent::GameReset)
        }
    };

    if transition.state.phase != state.phase {
        debug!(from = %state.phase, to = %transition.state.phase, "phase change");
        transition.events.push(GameEvent::PhaseChanged {
            from: state.phase,
            to: transition.state.phase,
        });
    }

    Ok(transition)
}

fn require_phase(state: &GameState, allowed: &[GamePhase]) -> Result<(), GameError> {
    if allowed.contains(&state.phase) {
        Ok(())
    } else {
        Err(GameError::InvalidGameState {
            current_state: state.phase.as_str().to_string(),
        })
    }
}

fn seat_of(state: &GameState, player_id: PlayerId) -> Result<usize, GameError> {
    state
        .seat_of(player_id)
        .ok_or(GameError::PlayerNotFound { player_id })
}

/// Copy of `players` with one seat patched.
fn with_player(players: &[Player], seat: usize, patch: impl FnOnce(&mut Player)) -> Vec<Player> {
    let mut players = players.to_vec();
    patch(&mut players[seat]);
    players
}

fn start_game<R: Rng + ?Sized>(
    state: &GameState,
    configs: &[PlayerConfig],
    undercover_count: usize,
    mister_white_count: usize,
    ctx: &RoundContext<'_>,
    rng: &mut R,
) -> Result<Transition, GameError> {
    require_phase(state, &[GamePhase::Setup])?;

    let roster = sanitize_roster(configs)?;
    let settings = GameSettings {
        undercover_count,
        mister_white_count,
        ..GameSettings::default()
    };
    let (players, word_pair) = deal_round(&roster, &settings, ctx, rng)?;

    info!(
        players = players.len(),
        undercover = undercover_count,
        mister_white = mister_white_count,
        "game started"
    );
    let player_count = players.len();
    let next = GameState {
        phase: GamePhase::WordDistribution,
        players,
        current_player_index: 0,
        starting_player_index: None,
        civilian_word: word_pair.civilian,
        undercover_word: word_pair.undercover,
        round_number: 1,
        winner: None,
        winner_players: None,
        guessing_player_id: None,
        game_settings: settings,
    };

    Ok(Transition::to(next).with_event(GameEvent::RoundDealt {
        round_number: 1,
        player_count,
    }))
}

/// Trim and cap names, rejecting blanks and duplicates since rounds match players by name.
fn sanitize_roster(configs: &[PlayerConfig]) -> Result<Vec<PlayerConfig>, GameError> {
    let mut seen = HashSet::new();
    let mut roster = Vec::with_capacity(configs.len());

    for config in configs {
        let name = sanitize_name(&config.name);
        if name.is_empty() {
            return Err(GameError::invalid_configuration("Player names cannot be empty"));
        }
        if !seen.insert(name.to_lowercase()) {
            return Err(GameError::invalid_configuration(format!(
                "Player name `{}` is used twice",
                name
            )));
        }
        roster.push(PlayerConfig {
            name,
            profile_image: config.profile_image.clone(),
        });
    }

    Ok(roster)
}

/// Validate the settings against the roster, draw a pair and deal shuffled roles.
fn deal_round<R: Rng + ?Sized>(
    roster: &[PlayerConfig],
    settings: &GameSettings,
    ctx: &RoundContext<'_>,
    rng: &mut R,
) -> Result<(Vec<Player>, WordPair), GameError> {
    let validation = ConfigValidator::validate(
        roster.len(),
        settings.undercover_count,
        settings.mister_white_count,
    );
    if !validation.is_valid {
        return Err(GameError::invalid_configuration(
            validation.error.unwrap_or_else(|| "Invalid configuration".to_string()),
        ));
    }

    let word_pair = ctx
        .dictionary
        .draw_word_pair(ctx.used_pairs, rng)
        .map_err(|e| GameError::RoleAllocation {
            reason: e.to_string(),
        })?;

    let counts = RoleCounts::new(settings.undercover_count, settings.mister_white_count);
    let dealt = RoleAllocator::allocate_roles(roster.len(), counts, rng)
        .and_then(|roles| RoleAllocator::assign_players(roster, &roles, &word_pair, rng));

    match dealt {
        Ok(players) => {
            debug!(civilian = %word_pair.civilian, undercover = %word_pair.undercover, "round dealt");
            Ok((players, word_pair))
        }
        Err(e) => {
            error!("validated configuration could not be dealt: {}", e);
            Err(e)
        }
    }
}

fn reveal_word(state: &GameState, player_id: PlayerId) -> Result<Transition, GameError> {
    require_phase(state, &[GamePhase::WordDistribution, GamePhase::AmnesicMode])?;

    let seat = state.current_player_index;
    let Some(current) = state.players.get(seat) else {
        return Ok(Transition::unchanged(state));
    };
    if current.id != player_id || current.has_seen_word {
        debug!(%player_id, "ignoring out-of-turn reveal");
        return Ok(Transition::unchanged(state));
    }

    let players = with_player(&state.players, seat, |p| p.has_seen_word = true);

    if state.phase == GamePhase::AmnesicMode {
        let next = GameState {
            players,
            ..state.clone()
        };
        return Ok(Transition::to(next)
            .with_event(GameEvent::WordRevealed { player_id })
            .scheduling(ScheduledTransition::ReturnToPlaying));
    }

    let all_seen = players.iter().all(|p| p.has_seen_word);
    let current_player_index = if all_seen {
        seat
    } else {
        next_unseen_seat(&players, seat)
    };
    let next = GameState {
        players,
        current_player_index,
        ..state.clone()
    };

    let transition = Transition::to(next).with_event(GameEvent::WordRevealed { player_id });
    if all_seen {
        Ok(transition.scheduling(ScheduledTransition::BeginStartingPlayerSelection))
    } else {
        Ok(transition)
    }
}

/// The next seat after `from`, wrapping around, whose card is still unseen.
fn next_unseen_seat(players: &[Player], from: usize) -> usize {
    let n = players.len();
    (1..n)
        .map(|offset| (from + offset) % n)
        .find(|&seat| !players[seat].has_seen_word)
        .unwrap_or(from)
}

/// Seats allowed to open the discussion: everyone except Mister White, who has no word.
pub fn eligible_starting_players(state: &GameState) -> Vec<usize> {
    state
        .players
        .iter()
        .enumerate()
        .filter(|(_, p)| p.role != Role::MisterWhite)
        .map(|(seat, _)| seat)
        .collect()
}

/// Draw the opening speaker uniformly among the eligible seats.
pub fn pick_starting_player<R: Rng + ?Sized>(state: &GameState, rng: &mut R) -> Option<usize> {
    eligible_starting_players(state).choose(rng).copied()
}

fn select_starting_player(state: &GameState, index: usize) -> Result<Transition, GameError> {
    require_phase(state, &[GamePhase::StartingPlayerSelection])?;

    let player = state
        .players
        .get(index)
        .filter(|p| p.role != Role::MisterWhite)
        .ok_or(GameError::InvalidStartingPlayer { index })?;

    info!(player = %player.name, "discussion opens");
    let player_id = player.id;
    let next = GameState {
        phase: GamePhase::Playing,
        starting_player_index: Some(index),
        ..state.clone()
    };
    Ok(Transition::to(next).with_event(GameEvent::StartingPlayerSelected { player_id }))
}

fn eliminate_player(state: &GameState, player_id: PlayerId) -> Result<Transition, GameError> {
    require_phase(state, &[GamePhase::Playing])?;

    let seat = seat_of(state, player_id)?;
    let target = &state.players[seat];
    if target.is_eliminated {
        return Ok(Transition::unchanged(state));
    }

    info!(player = %target.name, role = ?target.role, "player eliminated");
    let role = target.role;
    let players = with_player(&state.players, seat, |p| p.is_eliminated = true);
    let eliminated = GameEvent::PlayerEliminated { player_id, role };

    if role == Role::MisterWhite {
        let next = GameState {
            phase: GamePhase::Voting,
            players,
            guessing_player_id: Some(player_id),
            ..state.clone()
        };
        return Ok(Transition::to(next).with_event(eliminated));
    }

    let next = GameState {
        players,
        ..state.clone()
    };
    Ok(settle(next, vec![eliminated]))
}

fn submit_mister_white_guess(state: &GameState, guess: &str) -> Result<Transition, GameError> {
    require_phase(state, &[GamePhase::Voting])?;

    let guesser = state
        .guessing_player_id
        .ok_or_else(|| GameError::InvalidGameState {
            current_state: state.phase.as_str().to_string(),
        })?;
    let correct = normalize_word(guess) == normalize_word(&state.civilian_word);
    info!(correct, "Mister White guessed");

    let guessed = GameEvent::MisterWhiteGuessed {
        player_id: guesser,
        correct,
    };
    let next = GameState {
        guessing_player_id: None,
        ..state.clone()
    };

    if correct {
        return Ok(finish_round(next, Winner::MisterWhite, vec![guesser], Some(guesser), vec![guessed]));
    }
    Ok(settle(next, vec![guessed]))
}

/// Run the win check on a post-elimination state and either end the round or keep playing.
fn settle(state: GameState, events: Vec<GameEvent>) -> Transition {
    match ScoringEngine::check_win_condition(&state.players) {
        Some(win) => finish_round(state, win.winner, win.winner_ids, None, events),
        None => {
            let next = GameState {
                phase: GamePhase::Playing,
                ..state
            };
            Transition {
                events,
                ..Transition::to(next)
            }
        }
    }
}

fn finish_round(
    state: GameState,
    winner: Winner,
    winner_ids: Vec<PlayerId>,
    guesser: Option<PlayerId>,
    mut events: Vec<GameEvent>,
) -> Transition {
    let players = ScoringEngine::update_scores(&state.players, winner, guesser);
    let winner_players: Vec<Player> = winner_ids
        .iter()
        .filter_map(|id| players.iter().find(|p| p.id == *id).cloned())
        .collect();

    info!(?winner, round = state.round_number, "round over");
    let word_pair = state.word_pair();
    events.push(GameEvent::RoundCompleted {
        round_number: state.round_number,
        winner,
        winner_ids,
        word_pair: word_pair.clone(),
    });

    let next = GameState {
        phase: GamePhase::GameOver,
        players,
        winner: Some(winner),
        winner_players: Some(winner_players),
        guessing_player_id: None,
        ..state
    };

    Transition {
        outcome: Some(RoundOutcome { winner, word_pair }),
        events,
        ..Transition::to(next)
    }
}

/// Deal a fresh round to the same table.
///
/// Ids, scores and images follow each player by name. Only a new round (not a
/// skip) advances the round counter.
fn next_round<R: Rng + ?Sized>(
    state: &GameState,
    ctx: &RoundContext<'_>,
    rng: &mut R,
    advance_round: bool,
) -> Result<Transition, GameError> {
    require_phase(
        state,
        &[
            GamePhase::WordDistribution,
            GamePhase::StartingPlayerSelection,
            GamePhase::Playing,
            GamePhase::Voting,
            GamePhase::AmnesicMode,
            GamePhase::GameOver,
        ],
    )?;

    let roster: Vec<PlayerConfig> = state
        .players
        .iter()
        .map(|p| PlayerConfig {
            name: p.name.clone(),
            profile_image: p.profile_image.clone(),
        })
        .collect();
    let (dealt, word_pair) = deal_round(&roster, &state.game_settings, ctx, rng)?;

    let players = dealt
        .into_iter()
        .map(|player| match state.players.iter().find(|p| p.name == player.name) {
            Some(previous) => Player {
                id: previous.id,
                score: previous.score,
                profile_image: previous.profile_image.clone(),
                ..player
            },
            None => player,
        })
        .collect::<Vec<_>>();

    let round_number = if advance_round {
        state.round_number + 1
    } else {
        state.round_number
    };
    info!(round = round_number, skipped = !advance_round, "dealing next round");

    let player_count = players.len();
    let next = GameState {
        phase: GamePhase::WordDistribution,
        players,
        current_player_index: 0,
        starting_player_index: None,
        civilian_word: word_pair.civilian,
        undercover_word: word_pair.undercover,
        round_number,
        winner: None,
        winner_players: None,
        guessing_player_id: None,
        game_settings: state.game_settings.clone(),
    };

    let mut transition = Transition::to(next);
    if !advance_round {
        transition = transition.with_event(GameEvent::RoundSkipped {
            round_number: state.round_number,
        });
    }
    Ok(transition.with_event(GameEvent::RoundDealt {
        round_number,
        player_count,
    }))
}

fn enable_amnesic_mode(state: &GameState, player_id: PlayerId) -> Result<Transition, GameError> {
    require_phase(state, &[GamePhase::Playing])?;

    let seat = seat_of(state, player_id)?;
    debug!(player = %state.players[seat].name, "re-reading card");
    let next = GameState {
        phase: GamePhase::AmnesicMode,
        players: with_player(&state.players, seat, |p| p.has_seen_word = false),
        current_player_index: seat,
        ..state.clone()
    };
    Ok(Transition::to(next).with_event(GameEvent::AmnesicModeEnabled { player_id }))
}
