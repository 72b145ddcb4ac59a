//! Console driver for the booking agent.
//!
//! Prints the agent instructions, then reads one JSON tool call per line from
//! stdin (`{"tool":"save_time","arguments":{"time":"Friday 9 AM"}}`) and
//! prints the reply the model would receive, until the booking completes.

use anyhow::Context;
use chrono::Local;
use log::{info, warn};
use tokio::io::{AsyncBufReadExt, BufReader};

use voiceroom::agent::{self, BookingSession, BookingState, ToolCall};
use voiceroom::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env().context("failed to load configuration")?;
    let notifier = agent::notifier_from_config(&config).context("failed to set up mail sender")?;
    let mut session = BookingSession::new(&config.room_name, notifier);

    println!("{}", agent::agent_instructions(&Local::now()));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match serde_json::from_str::<ToolCall>(line) {
            Ok(call) => println!("{}", session.dispatch(call).await),
            Err(e) => warn!("ignoring malformed tool call: {}", e),
        }

        if session.state() == BookingState::Terminal {
            break;
        }
    }

    info!("session {} ended in {}", session.id(), session.state());
    Ok(())
}
