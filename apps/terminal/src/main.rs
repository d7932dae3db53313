use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use client_core::{FlowSession, HttpSubmissionClient, SilentAudio};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod input;
mod render;

/// Walks through the birthday flow in a terminal, posting the wish and the
/// grade table to a running server.
#[derive(Parser, Debug)]
struct Args {
    #[arg(long, default_value = "http://127.0.0.1:5000")]
    server_url: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let client = HttpSubmissionClient::new(&args.server_url)?;
    info!(server_url = %client.server_url(), "starting flow");
    let mut session = FlowSession::new(Arc::new(client), Arc::new(SilentAudio));
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        println!("{}", render::screen(session.controller()));
        if session.screen().is_terminal() {
            break;
        }

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let events = match input::parse(session.controller(), &line) {
            Ok(events) => events,
            Err(hint) => {
                println!("{hint}");
                continue;
            }
        };
        for event in events {
            if let Err(error) = session.dispatch(event) {
                println!("{error}");
            }
        }

        if let Some(waiting) = render::waiting(session.controller()) {
            println!("{waiting}");
        }
        session.settle().await?;
        for notice in session.take_notices() {
            println!("✨ {notice}");
        }
    }

    session.shutdown();
    Ok(())
}
