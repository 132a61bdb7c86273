use anyhow::{Context, Result, anyhow, bail};
use std::io::ErrorKind;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc::UnboundedSender;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartingPick {
    /// 1-based seat as shown on screen.
    Seat(usize),
    Random,
}

/// One line typed at the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliCommand {
    Start {
        names: Vec<String>,
        /// Undercover and Mister White counts; auto-adjusted from the table size when omitted.
        counts: Option<(usize, usize)>,
    },
    Adjust {
        players: usize,
        undercover: usize,
        mister_white: usize,
    },
    Reveal { name: String },
    StartPlayer(StartingPick),
    Eliminate { name: String },
    Guess { word: String },
    Amnesic { name: String },
    Skip,
    Next,
    Reset,
    Show,
    Stats,
    ClearStats,
    Help,
    Quit,
}

pub fn parse_command(line: &str) -> Result<CliCommand> {
    let line = line.trim();
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let command = match verb.to_lowercase().as_str() {
        "start" => parse_start(rest)?,
        "adjust" => {
            let numbers = parse_numbers(rest)?;
            let [players, undercover, mister_white] = numbers[..] else {
                bail!("usage: adjust <players> <undercovers> <mister whites>");
            };
            CliCommand::Adjust {
                players,
                undercover,
                mister_white,
            }
        }
        "reveal" => CliCommand::Reveal {
            name: required(rest, "reveal <name>")?,
        },
        "start-player" => {
            let pick = required(rest, "start-player <seat|random>")?;
            if pick.eq_ignore_ascii_case("random") {
                CliCommand::StartPlayer(StartingPick::Random)
            } else {
                let seat: usize = pick.parse().with_context(|| format!("`{}` is not a seat number", pick))?;
                if seat == 0 {
                    bail!("seats are numbered from 1");
                }
                CliCommand::StartPlayer(StartingPick::Seat(seat))
            }
        }
        "eliminate" => CliCommand::Eliminate {
            name: required(rest, "eliminate <name>")?,
        },
        "guess" => CliCommand::Guess {
            word: required(rest, "guess <word>")?,
        },
        "amnesic" => CliCommand::Amnesic {
            name: required(rest, "amnesic <name>")?,
        },
        "skip" => CliCommand::Skip,
        "next" => CliCommand::Next,
        "reset" => CliCommand::Reset,
        "" | "show" => CliCommand::Show,
        "stats" if rest.eq_ignore_ascii_case("clear") => CliCommand::ClearStats,
        "stats" => CliCommand::Stats,
        "help" | "?" => CliCommand::Help,
        "quit" | "exit" => CliCommand::Quit,
        other => return Err(anyhow!("unknown command `{}`, try `help`", other)),
    };

    Ok(command)
}

/// Forward typed lines until end of input. A line that is not UTF-8 is dropped, not fatal.
pub async fn forward_lines<R>(reader: R, tx: UnboundedSender<String>)
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                if tx.send(line).is_err() {
                    break;
                }
            }
            Ok(None) => break,
            Err(e) if e.kind() == ErrorKind::InvalidData => {
                tracing::warn!("Ignoring unreadable input line: {}", e);
            }
            Err(e) => {
                tracing::warn!("Failed to read input: {}", e);
                break;
            }
        }
    }
}

/// `start Alice, Bob, Carol [undercovers mister-whites]`. The two counts come together or not at all.
fn parse_start(rest: &str) -> Result<CliCommand> {
    let tokens: Vec<&str> = rest.split_whitespace().collect();
    let trailing: Vec<usize> = tokens
        .iter()
        .rev()
        .take(2)
        .map_while(|t| t.parse().ok())
        .collect();

    let (name_tokens, counts) = match trailing[..] {
        [mister_white, undercover] => (&tokens[..tokens.len() - 2], Some((undercover, mister_white))),
        [_] => bail!("give both counts: start <name, name, ...> <undercovers> <mister-whites>"),
        _ => (&tokens[..], None),
    };

    let names: Vec<String> = name_tokens
        .join(" ")
        .split(',')
        .map(|name| name.trim().to_string())
        .collect();
    if names.iter().all(|name| name.is_empty()) {
        bail!("usage: start <name, name, ...> [undercovers mister-whites]");
    }

    Ok(CliCommand::Start { names, counts })
}

fn parse_numbers(rest: &str) -> Result<Vec<usize>> {
    rest.split_whitespace()
        .map(|t| t.parse().with_context(|| format!("`{}` is not a number", t)))
        .collect()
}

fn required(rest: &str, usage: &str) -> Result<String> {
    if rest.is_empty() {
        bail!("usage: {}", usage);
    }
    Ok(rest.to_string())
}
