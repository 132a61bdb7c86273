use game_types::{Player, PlayerId, Role, Winner, alive_counts};

pub const CIVIL_WIN: u32 = 5;
pub const UNDERCOVER_WIN: u32 = 10;
pub const MISTER_WHITE_WIN: u32 = 12;
pub const MISTER_WHITE_GUESS: u32 = 6;

#[derive(Debug, Clone, PartialEq)]
pub struct WinResult {
    pub winner: Winner,
    /// Living members of the winning side.
    pub winner_ids: Vec<PlayerId>,
}

pub struct ScoringEngine;

impl ScoringEngine {
    /// Decide whether the round is over given who is still alive.
    ///
    /// The undercover side wins as soon as it reaches parity with the civilians.
    pub fn check_win_condition(players: &[Player]) -> Option<WinResult> {
        let (alive_civil, alive_undercover, alive_mister_white) = alive_counts(players);
        let suspicious = alive_undercover + alive_mister_white;

        if suspicious == 0 {
            return Some(WinResult {
                winner: Winner::Civil,
                winner_ids: living_ids(players, |role| role == Role::Civil),
            });
        }

        if suspicious >= alive_civil {
            return Some(WinResult {
                winner: Winner::Undercover,
                winner_ids: living_ids(players, |role| role != Role::Civil),
            });
        }

        None
    }

    /// Pay out the round. Eliminated players get nothing, except the Mister White
    /// who won by guessing after being voted out.
    pub fn update_scores(players: &[Player], winner: Winner, guesser: Option<PlayerId>) -> Vec<Player> {
        let (_, alive_undercover, _) = alive_counts(players);

        players
            .iter()
            .map(|player| {
                let points = match winner {
                    Winner::MisterWhite => {
                        if Some(player.id) == guesser {
                            MISTER_WHITE_GUESS
                        } else {
                            0
                        }
                    }
                    _ if player.is_eliminated => 0,
                    Winner::Civil if player.role == Role::Civil => CIVIL_WIN,
                    Winner::Undercover => match player.role {
                        Role::Undercover => UNDERCOVER_WIN,
                        // Mister Whites who carried the win without an undercover alive
                        Role::MisterWhite if alive_undercover == 0 => MISTER_WHITE_WIN,
                        Role::MisterWhite => UNDERCOVER_WIN,
                        Role::Civil => 0,
                    },
                    Winner::Civil => 0,
                };

                Player {
                    score: player.score + points,
                    ..player.clone()
                }
            })
            .collect()
    }

    /// Players by descending score; ties keep seating order.
    pub fn leaderboard(players: &[Player]) -> Vec<Player> {
        let mut sorted = players.to_vec();
        sorted.sort_by(|a, b| b.score.cmp(&a.score));
        sorted
    }
}

fn living_ids(players: &[Player], on_side: impl Fn(Role) -> bool) -> Vec<PlayerId> {
    players
        .iter()
        .filter(|p| p.is_alive() && on_side(p.role))
        .map(|p| p.id)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(name: &str, role: Role, is_eliminated: bool) -> Player {
        Player {
            id: PlayerId::new_v4(),
            name: name.to_string(),
            role,
            word: None,
            profile_image: None,
            score: 0,
            is_eliminated,
            has_seen_word: true,
            color_index: 1,
        }
    }

    fn scores(players: &[Player]) -> Vec<u32> {
        players.iter().map(|p| p.score).collect()
    }

    #[test]
    fn test_no_winner_while_civilians_lead() {
        let players = vec![
            player("Alice", Role::Civil, false),
            player("Bob", Role::Civil, false),
            player("Carol", Role::Civil, false),
            player("Dave", Role::Undercover, false),
            player("Eve", Role::MisterWhite, true),
        ];
        assert_eq!(ScoringEngine::check_win_condition(&players), None);
    }

    #[test]
    fn test_civil_win_lists_living_civilians_only() {
        let players = vec![
            player("Alice", Role::Civil, false),
            player("Bob", Role::Civil, true),
            player("Carol", Role::Civil, false),
            player("Dave", Role::Undercover, true),
        ];
        let result = ScoringEngine::check_win_condition(&players).unwrap();
        assert_eq!(result.winner, Winner::Civil);
        assert_eq!(result.winner_ids, vec![players[0].id, players[2].id]);
    }

    #[test]
    fn test_undercover_wins_at_parity() {
        let players = vec![
            player("Alice", Role::Civil, false),
            player("Bob", Role::Civil, true),
            player("Carol", Role::Civil, true),
            player("Dave", Role::Undercover, false),
        ];
        let result = ScoringEngine::check_win_condition(&players).unwrap();
        assert_eq!(result.winner, Winner::Undercover);
        assert_eq!(result.winner_ids, vec![players[3].id]);
    }

    #[test]
    fn test_coalition_counts_mister_white() {
        let players = vec![
            player("Alice", Role::Civil, false),
            player("Bob", Role::Civil, false),
            player("Carol", Role::Civil, true),
            player("Dave", Role::Undercover, false),
            player("Eve", Role::MisterWhite, false),
        ];
        let result = ScoringEngine::check_win_condition(&players).unwrap();
        assert_eq!(result.winner, Winner::Undercover);
        assert_eq!(result.winner_ids, vec![players[3].id, players[4].id]);
    }

    #[test]
    fn test_civil_scoring_skips_eliminated() {
        let players = vec![
            player("Alice", Role::Civil, false),
            player("Bob", Role::Civil, true),
            player("Carol", Role::Undercover, true),
        ];
        let scored = ScoringEngine::update_scores(&players, Winner::Civil, None);
        assert_eq!(scores(&scored), vec![CIVIL_WIN, 0, 0]);
    }

    #[test]
    fn test_undercover_scoring_pays_coalition() {
        let players = vec![
            player("Alice", Role::Civil, false),
            player("Bob", Role::Civil, true),
            player("Carol", Role::Undercover, false),
            player("Dave", Role::MisterWhite, false),
            player("Eve", Role::Undercover, true),
        ];
        let scored = ScoringEngine::update_scores(&players, Winner::Undercover, None);
        assert_eq!(scores(&scored), vec![0, 0, UNDERCOVER_WIN, UNDERCOVER_WIN, 0]);
    }

    #[test]
    fn test_solo_mister_white_natural_win() {
        let players = vec![
            player("Alice", Role::Civil, false),
            player("Bob", Role::Civil, true),
            player("Carol", Role::Undercover, true),
            player("Dave", Role::MisterWhite, false),
        ];
        let scored = ScoringEngine::update_scores(&players, Winner::Undercover, None);
        assert_eq!(scores(&scored), vec![0, 0, 0, MISTER_WHITE_WIN]);
    }

    #[test]
    fn test_guess_win_pays_eliminated_guesser_only() {
        let mut players = vec![
            player("Alice", Role::Civil, false),
            player("Bob", Role::Undercover, false),
            player("Carol", Role::MisterWhite, true),
            player("Dave", Role::MisterWhite, false),
        ];
        players[2].score = 4;
        let guesser = players[2].id;
        let scored = ScoringEngine::update_scores(&players, Winner::MisterWhite, Some(guesser));
        assert_eq!(scores(&scored), vec![0, 0, 4 + MISTER_WHITE_GUESS, 0]);
    }

    #[test]
    fn test_scores_accumulate() {
        let mut players = vec![player("Alice", Role::Civil, false)];
        players[0].score = 17;
        let scored = ScoringEngine::update_scores(&players, Winner::Civil, None);
        assert_eq!(scored[0].score, 22);
    }

    #[test]
    fn test_leaderboard_is_stable() {
        let mut players = vec![
            player("Alice", Role::Civil, false),
            player("Bob", Role::Civil, false),
            player("Carol", Role::Civil, false),
        ];
        players[0].score = 5;
        players[1].score = 10;
        players[2].score = 5;
        let board = ScoringEngine::leaderboard(&players);
        let names: Vec<_> = board.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Bob", "Alice", "Carol"]);
    }
}
