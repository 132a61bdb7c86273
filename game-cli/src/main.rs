use std::io::Write;
use tokio::io::BufReader;
use tokio::sync::mpsc;
use tracing::info;

use game_cli::{app::Flow, build_app, config::Config, input::forward_lines, render::render_state};
use game_types::ScheduledTransition;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so they never land in the middle of the table.
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let config = Config::from_env()?;
    info!("Starting Undercover...");
    let mut app = build_app(&config)?;
    let timings = config.timings();

    let (line_tx, mut line_rx) = mpsc::unbounded_channel::<String>();
    tokio::spawn(forward_lines(BufReader::new(tokio::io::stdin()), line_tx));

    let (timer_tx, mut timer_rx) = mpsc::unbounded_channel::<ScheduledTransition>();

    println!("{}", render_state(app.session().state()));
    prompt();

    loop {
        tokio::select! {
            line = line_rx.recv() => {
                let Some(line) = line else {
                    info!("stdin closed");
                    break;
                };

                let reply = app.execute(&line);
                println!("{}", reply.text);
                if reply.flow == Flow::Quit {
                    break;
                }

                if let Some(transition) = reply.scheduled {
                    let delay = timings.delay_for(transition);
                    let timer_tx = timer_tx.clone();
                    tokio::spawn(async move {
                        tokio::time::sleep(delay).await;
                        let _ = timer_tx.send(transition);
                    });
                }
                prompt();
            }
            Some(transition) = timer_rx.recv() => {
                if let Some(text) = app.fire(transition) {
                    println!("\n{}", text);
                    prompt();
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Received Ctrl+C, shutting down...");
                break;
            }
        }
    }

    Ok(())
}

fn prompt() {
    print!("> ");
    let _ = std::io::stdout().flush();
}
