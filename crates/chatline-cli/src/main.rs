//! Chatline console entry point.
//!
//! # Usage
//!
//! ```bash
//! # Connect to localhost:5555 as alice
//! chatline alice
//!
//! # Connect to a specific server
//! chatline alice chat.example.org 7000
//! ```

use std::process::ExitCode;

use chatline_app::Exit;
use chatline_cli::{Args, ClientConfig};
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let config = ClientConfig::from(Args::parse());

    // Logs on stderr, chat on stdout
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    tracing::info!(identity = %config.identity, "Chatline client starting");

    let exit = chatline_cli::run(config).await?;
    tracing::info!(?exit, "Chatline client exiting");

    Ok(match exit {
        Exit::Quit | Exit::EndOfInput => ExitCode::SUCCESS,
        Exit::SendFailed => ExitCode::FAILURE,
    })
}
