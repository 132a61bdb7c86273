use game_core::{ValidationResult, eligible_starting_players};
use game_types::{GamePhase, GameState, GameStats, Player, Role, Winner};
use std::fmt::Write;

pub fn role_label(role: Role) -> &'static str {
    match role {
        Role::Civil => "civilian",
        Role::Undercover => "undercover",
        Role::MisterWhite => "Mister White",
    }
}

pub fn winner_label(winner: Winner) -> &'static str {
    match winner {
        Winner::Civil => "Civilians",
        Winner::Undercover => "Undercovers",
        Winner::MisterWhite => "Mister White",
    }
}

/// What the table may see. Roles and words stay hidden until the round is over.
pub fn render_state(state: &GameState) -> String {
    let mut out = String::new();

    if state.phase == GamePhase::Setup {
        out.push_str("No game yet. Type `start <name, name, ...> [undercovers mister-whites]`.\n");
        return out;
    }

    let _ = writeln!(out, "Round {} - {}", state.round_number, state.phase);
    for (seat, player) in state.players.iter().enumerate() {
        let _ = writeln!(out, "  {}", seat_line(state, seat, player));
    }

    let current = state.current_player().map(|p| p.name.as_str()).unwrap_or("?");
    match state.phase {
        GamePhase::Setup => {}
        GamePhase::WordDistribution if state.all_words_seen() => {
            out.push_str("Everyone has seen their word.\n");
        }
        GamePhase::WordDistribution => {
            let _ = writeln!(out, "Pass the phone to {}, then `reveal {}`.", current, current);
        }
        GamePhase::StartingPlayerSelection => {
            let seats: Vec<String> = eligible_starting_players(state)
                .iter()
                .map(|seat| (seat + 1).to_string())
                .collect();
            let _ = writeln!(
                out,
                "Who opens the discussion? `start-player <{}>` or `start-player random`.",
                seats.join("|")
            );
        }
        GamePhase::Playing => {
            if let Some(opener) = state.starting_player_index.and_then(|i| state.players.get(i)) {
                let _ = writeln!(out, "{} speaks first.", opener.name);
            }
            out.push_str("Give your clues, then `eliminate <name>`. Forgot your word? `amnesic <name>`.\n");
        }
        GamePhase::Voting => {
            let guesser = state
                .guessing_player_id
                .and_then(|id| state.player(id))
                .map(|p| p.name.as_str())
                .unwrap_or("Mister White");
            let _ = writeln!(out, "{} was Mister White! One guess at the civilian word: `guess <word>`.", guesser);
        }
        GamePhase::AmnesicMode => {
            let _ = writeln!(out, "Pass the phone to {}, then `reveal {}`.", current, current);
        }
        GamePhase::GameOver => {
            if let Some(winner) = state.winner {
                let _ = writeln!(out, "{} win!", winner_label(winner));
            }
            if let Some(winners) = &state.winner_players {
                let names: Vec<&str> = winners.iter().map(|p| p.name.as_str()).collect();
                let _ = writeln!(out, "Winners: {}", names.join(", "));
            }
            let _ = writeln!(
                out,
                "Civilian word: {}  |  Undercover word: {}",
                state.civilian_word, state.undercover_word
            );
            out.push_str("`next` deals another round, `reset` starts over.\n");
        }
    }

    out
}

fn seat_line(state: &GameState, seat: usize, player: &Player) -> String {
    let mut line = format!("{:>2}. {:<16} {:>3} pts", seat + 1, player.name, player.score);
    if player.is_eliminated {
        let _ = write!(line, "  out ({})", role_label(player.role));
    } else if state.phase == GamePhase::GameOver {
        let _ = write!(line, "  {}", role_label(player.role));
    } else if state.phase == GamePhase::WordDistribution && player.has_seen_word {
        line.push_str("  seen");
    }
    line
}

/// Private card shown to the player holding the phone.
pub fn render_card(player: &Player) -> String {
    match &player.word {
        Some(word) => format!("{}, your word is: {}\n(hide the screen and pass the phone)", player.name, word),
        None => format!(
            "{}, you are Mister White. You have no word, listen and blend in.\n(hide the screen and pass the phone)",
            player.name
        ),
    }
}

pub fn render_leaderboard(players: &[Player]) -> String {
    let mut out = String::from("Leaderboard\n");
    for (rank, player) in players.iter().enumerate() {
        let _ = writeln!(out, "  {}. {} - {} pts", rank + 1, player.name, player.score);
    }
    out
}

pub fn render_stats(stats: &GameStats) -> String {
    let mut out = format!("Games played: {}\n", stats.total_games);
    for winner in [Winner::Civil, Winner::Undercover, Winner::MisterWhite] {
        let _ = writeln!(
            out,
            "  {:<13} {:>3} wins ({:.0}%)",
            winner_label(winner),
            stats.wins_for(winner),
            stats.win_rate(winner) * 100.0
        );
    }
    if let Some(last) = &stats.last_played_at {
        let _ = writeln!(out, "Last game: {}", last);
    }
    out
}

pub fn render_validation(players: usize, undercover: usize, mister_white: usize, result: &ValidationResult) -> String {
    match &result.error {
        None => format!("{} players, {} undercover, {} Mister White: OK", players, undercover, mister_white),
        Some(error) => format!("{} players, {} undercover, {} Mister White: {}", players, undercover, mister_white, error),
    }
}

pub fn help_text() -> &'static str {
    "\
Commands
  start <name, name, ...> [u w]  seat players and deal round 1
  adjust <players> <u> <w>        check a setup, suggesting a valid one
  reveal <name>                   show the word to the player holding the phone
  start-player <seat|random>      choose who speaks first
  eliminate <name>                vote a player out
  guess <word>                    Mister White's guess after being voted out
  amnesic <name>                  let a player re-read their word
  skip                            redeal without counting this round
  next                            deal the next round
  reset                           back to setup
  show                            print the table
  stats [clear]                   win statistics
  help                            this text
  quit                            leave"
}
