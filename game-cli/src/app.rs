use anyhow::{Result, anyhow};
use game_core::{ConfigValidator, GameSession};
use game_types::{PlayerConfig, PlayerId, ScheduledTransition};

use crate::input::{CliCommand, StartingPick, parse_command};
use crate::render::{
    help_text, render_card, render_leaderboard, render_state, render_stats, render_validation,
    role_label,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// What to print after a line, and what to schedule.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub text: String,
    pub scheduled: Option<ScheduledTransition>,
    pub flow: Flow,
}

impl Reply {
    fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            scheduled: None,
            flow: Flow::Continue,
        }
    }
}

/// Terminal front end over one session. Holds no state of its own.
pub struct App {
    session: GameSession,
}

impl App {
    pub fn new(session: GameSession) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn execute(&mut self, line: &str) -> Reply {
        let outcome = parse_command(line).and_then(|command| self.run(command));
        match outcome {
            Ok(reply) => reply,
            Err(e) => {
                tracing::debug!("rejected `{}`: {:#}", line.trim(), e);
                Reply::text(format!("error: {:#}", e))
            }
        }
    }

    /// Fire a deferred transition once its timer is up. `None` if it went stale.
    pub fn fire(&mut self, transition: ScheduledTransition) -> Option<String> {
        self.session
            .fire(transition)
            .then(|| render_state(self.session.state()))
    }

    fn run(&mut self, command: CliCommand) -> Result<Reply> {
        let mut preamble = String::new();

        let scheduled = match command {
            CliCommand::Start { names, counts } => {
                let (undercover, mister_white) = counts.unwrap_or_else(|| {
                    let suggested = ConfigValidator::auto_adjust(names.len(), 1, 1);
                    (suggested.undercover, suggested.mister_white)
                });
                let players = names.into_iter().map(PlayerConfig::new).collect();
                self.session.start_game(players, undercover, mister_white)?
            }
            CliCommand::Adjust {
                players,
                undercover,
                mister_white,
            } => return Ok(Reply::text(adjust_report(players, undercover, mister_white))),
            CliCommand::Reveal { name } => {
                let player_id = self.player_id(&name)?;
                let had_seen = self.has_seen(player_id);
                let scheduled = self.session.reveal_word(player_id)?;

                let player = self.session.state().player(player_id);
                match player {
                    Some(player) if !had_seen && player.has_seen_word => {
                        preamble = format!("{}\n\n", render_card(player));
                    }
                    _ => preamble = format!("It is not {}'s turn to look.\n", name.trim()),
                }
                scheduled
            }
            CliCommand::StartPlayer(pick) => {
                let seat = match pick {
                    StartingPick::Seat(seat) => seat - 1,
                    StartingPick::Random => self
                        .session
                        .pick_starting_player()
                        .ok_or_else(|| anyhow!("nobody can open the discussion"))?,
                };
                self.session.select_starting_player(seat)?
            }
            CliCommand::Eliminate { name } => {
                let player_id = self.player_id(&name)?;
                let scheduled = self.session.eliminate_player(player_id)?;
                if let Some(player) = self.session.state().player(player_id) {
                    preamble = format!("{} was {}.\n", player.name, role_label(player.role));
                }
                scheduled
            }
            CliCommand::Guess { word } => self.session.submit_mister_white_guess(word)?,
            CliCommand::Amnesic { name } => {
                let player_id = self.player_id(&name)?;
                self.session.enable_amnesic_mode(player_id)?
            }
            CliCommand::Skip => self.session.skip_round()?,
            CliCommand::Next => self.session.start_new_round()?,
            CliCommand::Reset => self.session.reset_game()?,
            CliCommand::Show => None,
            CliCommand::Stats => {
                let mut text = render_stats(&self.session.stats());
                if !self.session.state().players.is_empty() {
                    text.push('\n');
                    text.push_str(&render_leaderboard(&self.session.leaderboard()));
                }
                return Ok(Reply::text(text));
            }
            CliCommand::ClearStats => {
                self.session.clear_history();
                return Ok(Reply::text("Statistics cleared."));
            }
            CliCommand::Help => return Ok(Reply::text(help_text())),
            CliCommand::Quit => {
                return Ok(Reply {
                    flow: Flow::Quit,
                    ..Reply::text("Bye!")
                });
            }
        };

        Ok(Reply {
            text: format!("{}{}", preamble, render_state(self.session.state())),
            scheduled,
            flow: Flow::Continue,
        })
    }

    fn player_id(&self, name: &str) -> Result<PlayerId> {
        self.session
            .state()
            .player_by_name(name.trim())
            .map(|p| p.id)
            .ok_or_else(|| anyhow!("no player named `{}`", name.trim()))
    }

    fn has_seen(&self, player_id: PlayerId) -> bool {
        self.session
            .state()
            .player(player_id)
            .is_some_and(|p| p.has_seen_word)
    }
}

fn adjust_report(players: usize, undercover: usize, mister_white: usize) -> String {
    let result = ConfigValidator::validate(players, undercover, mister_white);
    let mut text = render_validation(players, undercover, mister_white, &result);
    if !result.is_valid {
        let suggested = ConfigValidator::auto_adjust(players, undercover, mister_white);
        text.push_str(&format!(
            "\nSuggested: {} undercover, {} Mister White (at most {} undercover with {} Mister White)",
            suggested.undercover,
            suggested.mister_white,
            ConfigValidator::max_undercovers(players, mister_white),
            mister_white
        ));
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_core::{MemoryHistory, TransitionTimings};
    use game_types::{GamePhase, Role};

    fn app(timings: TransitionTimings) -> App {
        App::new(GameSession::with_seed(Box::new(MemoryHistory::new()), 99).with_timings(timings))
    }

    fn reveal_everyone(app: &mut App) -> Reply {
        let mut reply = Reply::text("");
        while !app.session().state().all_words_seen() {
            let name = app.session().state().current_player().unwrap().name.clone();
            reply = app.execute(&format!("reveal {}", name));
        }
        reply
    }

    fn name_with_role(app: &App, role: Role) -> String {
        app.session()
            .state()
            .players
            .iter()
            .find(|p| p.role == role)
            .unwrap()
            .name
            .clone()
    }

    #[test]
    fn test_full_round_from_the_prompt() {
        let mut app = app(TransitionTimings::immediate());
        let reply = app.execute("start Alice, Bob, Carol, Dave, Eve 1 1");
        assert!(reply.text.contains("Pass the phone to Alice"), "{}", reply.text);

        let first = app.execute("reveal Alice");
        assert!(first.text.contains("Alice, your") || first.text.contains("Alice, you are Mister White"));
        reveal_everyone(&mut app);
        assert_eq!(app.session().state().phase, GamePhase::StartingPlayerSelection);

        app.execute("start-player random");
        assert_eq!(app.session().state().phase, GamePhase::Playing);

        let undercover = name_with_role(&app, Role::Undercover);
        let mister_white = name_with_role(&app, Role::MisterWhite);
        let reply = app.execute(&format!("eliminate {}", mister_white));
        assert!(reply.text.contains("was Mister White"));
        app.execute("guess surely-wrong");
        let reply = app.execute(&format!("eliminate {}", undercover));
        assert!(reply.text.contains("Civilians win!"), "{}", reply.text);

        let stats = app.execute("stats");
        assert!(stats.text.contains("Games played: 1"));
        assert!(stats.text.contains("Leaderboard"));
    }

    #[test]
    fn test_out_of_turn_reveal_shows_no_card() {
        let mut app = app(TransitionTimings::immediate());
        app.execute("start Alice, Bob, Carol 1 0");
        let reply = app.execute("reveal carol");
        assert!(reply.text.contains("It is not carol's turn"));
        assert!(!reply.text.contains("your word"));
    }

    #[test]
    fn test_delayed_reveal_hands_back_a_transition() {
        let mut app = app(TransitionTimings::default());
        app.execute("start Alice, Bob, Carol");
        let reply = reveal_everyone(&mut app);
        assert_eq!(reply.scheduled, Some(ScheduledTransition::BeginStartingPlayerSelection));

        let text = app.fire(ScheduledTransition::BeginStartingPlayerSelection).unwrap();
        assert!(text.contains("Who opens the discussion?"));
        assert!(app.fire(ScheduledTransition::BeginStartingPlayerSelection).is_none());
    }

    #[test]
    fn test_errors_are_reported_not_fatal() {
        let mut app = app(TransitionTimings::immediate());
        assert!(app.execute("eliminate Bob").text.starts_with("error:"));
        assert!(app.execute("start Alice, Bob 1 0").text.contains("At least 3"));
        assert!(app.execute("frobnicate").text.contains("unknown command"));

        app.execute("start Alice, Bob, Carol 1 0");
        assert!(app.execute("eliminate Zed").text.contains("no player named `Zed`"));
        assert!(app.execute("start-player 9").text.starts_with("error:"));
    }

    #[test]
    fn test_adjust_suggests_a_valid_setup() {
        let mut app = app(TransitionTimings::immediate());
        let reply = app.execute("adjust 6 2 2");
        assert!(reply.text.contains("Suggested: 1 undercover, 2 Mister White"), "{}", reply.text);
        assert!(reply.text.contains("at most 1 undercover with 2 Mister White"));
        assert!(app.execute("adjust 5 1 1").text.ends_with("OK"));
    }

    #[test]
    fn test_quit() {
        let mut app = app(TransitionTimings::immediate());
        assert_eq!(app.execute("quit").flow, Flow::Quit);
        assert_eq!(app.execute("help").flow, Flow::Continue);
    }
}
