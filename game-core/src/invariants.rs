use game_types::{GamePhase, GameState, MAX_PLAYERS, MIN_PLAYERS, Role};
use std::collections::HashSet;

use crate::normalize_word;

/// Check the rules every observable state must satisfy.
///
/// A failure here is a bug in the engine, never a user mistake.
pub fn verify_invariants(state: &GameState) -> Result<(), String> {
    if state.phase == GamePhase::Setup {
        if !state.players.is_empty() {
            return Err("setup phase with a seated roster".to_string());
        }
        return Ok(());
    }

    let n = state.players.len();
    if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&n) {
        return Err(format!("{} players seated", n));
    }
    if state.current_player_index >= n {
        return Err(format!("current player index {} out of {}", state.current_player_index, n));
    }

    let ids: HashSet<_> = state.players.iter().map(|p| p.id).collect();
    if ids.len() != n {
        return Err("duplicate player ids".to_string());
    }

    let undercover = state.players.iter().filter(|p| p.role == Role::Undercover).count();
    let mister_white = state.players.iter().filter(|p| p.role == Role::MisterWhite).count();
    let civil = n - undercover - mister_white;
    if undercover != state.game_settings.undercover_count
        || mister_white != state.game_settings.mister_white_count
    {
        return Err(format!(
            "dealt {} undercover / {} Mister White, settings ask {} / {}",
            undercover,
            mister_white,
            state.game_settings.undercover_count,
            state.game_settings.mister_white_count
        ));
    }
    if civil < undercover + 1 {
        return Err(format!("{} civilians do not outnumber {} undercovers", civil, undercover));
    }
    if undercover + mister_white > n / 2 {
        return Err(format!("{} special roles at a table of {}", undercover + mister_white, n));
    }

    if normalize_word(&state.civilian_word) == normalize_word(&state.undercover_word) {
        return Err("civilian and undercover words are the same".to_string());
    }
    for player in &state.players {
        let expected = match player.role {
            Role::Civil => Some(state.civilian_word.as_str()),
            Role::Undercover => Some(state.undercover_word.as_str()),
            Role::MisterWhite => None,
        };
        if player.word.as_deref() != expected {
            return Err(format!("{} holds the wrong card", player.name));
        }
    }

    let game_over = state.phase == GamePhase::GameOver;
    if state.winner.is_some() != game_over || state.winner_players.is_some() != game_over {
        return Err(format!("winner recorded in phase {}", state.phase));
    }

    match (state.phase, state.guessing_player_id) {
        (GamePhase::Voting, Some(id)) => {
            let guesser = state.player(id).ok_or("guessing player is not seated")?;
            if guesser.role != Role::MisterWhite || !guesser.is_eliminated {
                return Err(format!("{} cannot be guessing", guesser.name));
            }
        }
        (GamePhase::Voting, None) => return Err("voting without a guessing player".to_string()),
        (_, Some(_)) => return Err(format!("guessing player set in phase {}", state.phase)),
        (_, None) => {}
    }

    Ok(())
}
