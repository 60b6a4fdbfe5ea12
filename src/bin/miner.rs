//! Terminal front end for the reward simulator.
//!
//! Reads one command per line from stdin. Every second the countdown and
//! balance are redrawn as a single status line on stderr; when stdout is a
//! terminal the countdown also goes into the window title.

use std::io::IsTerminal;
use std::time::Duration;

use minerush::{
    config::MinerConfig,
    simulator::{
        command::HELP,
        console::{Console, Flow},
        Countdown,
    },
    telemetry,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

const TICK: Duration = Duration::from_secs(1);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    telemetry::init("minerush=info");

    let config = MinerConfig::from_env()?;
    let countdown = Countdown::new(config.countdown_target);
    let stdout = std::io::stdout();
    let title = stdout.is_terminal();
    let mut console = Console::new(countdown, stdout, std::io::stderr(), title);
    let mut rng = rand::thread_rng();

    info!(target_date = %countdown.target(), title, "miner started");
    println!("{HELP}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut ticker = tokio::time::interval(TICK);

    loop {
        tokio::select! {
            _ = ticker.tick() => console.tick()?,
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if console.handle_line(&line, &mut rng)? == Flow::Quit {
                    break;
                }
            }
        }
    }

    eprintln!();
    info!(balance = console.session().balance(), "miner stopped");
    Ok(())
}
