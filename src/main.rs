mod api;
mod config;
mod error;
mod handler;
mod models;

use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::handler::Gateway;
use crate::models::Event;

/// Relay one stock or currency lookup to its upstream provider and print the
/// response envelope.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Read the invocation event ({"body": "..."}) from this file instead of stdin
    #[arg(long, conflicts_with = "body")]
    event: Option<PathBuf>,

    /// Raw request body, e.g. '{"action":"quote","symbol":"AAPL"}'
    #[arg(long)]
    body: Option<String>,

    /// Pretty-print the response envelope
    #[arg(long)]
    pretty: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Logs go to stderr; stdout carries only the envelope
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;
    let event = read_event(&cli)?;

    let gateway = Gateway::new(config);
    let response = gateway.handle(&event).await;

    let output = if cli.pretty {
        serde_json::to_string_pretty(&response)?
    } else {
        serde_json::to_string(&response)?
    };
    println!("{}", output);

    Ok(())
}

fn read_event(cli: &Cli) -> Result<Event> {
    if let Some(body) = &cli.body {
        return Ok(Event::with_body(body.clone()));
    }

    let raw = match &cli.event {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read event file {}", path.display()))?,
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read event from stdin")?;
            buf
        }
    };

    parse_event(&raw)
}

fn parse_event(raw: &str) -> Result<Event> {
    serde_json::from_str(raw).context("Invocation event must be a JSON object with a string `body`")
}
