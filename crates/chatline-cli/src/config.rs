//! Command-line arguments and client configuration.

use chatline_client::{DEFAULT_HOST, DEFAULT_PORT, Endpoint};
use clap::Parser;

/// Chatline console client
#[derive(Parser, Debug)]
#[command(name = "chatline")]
#[command(about = "Console client for a line-based chat server")]
#[command(version)]
pub struct Args {
    /// Login ID presented to the server on every connect
    pub login_id: String,

    /// Server host
    #[arg(default_value = DEFAULT_HOST)]
    pub host: String,

    /// Server port
    #[arg(default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Log level (trace, debug, info, warn, error). `RUST_LOG` takes precedence.
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

/// Resolved client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Login identity.
    pub identity: String,
    /// Server to connect to.
    pub endpoint: Endpoint,
    /// Log filter used when `RUST_LOG` is unset.
    pub log_level: String,
}

impl From<Args> for ClientConfig {
    fn from(args: Args) -> Self {
        Self {
            identity: args.login_id,
            endpoint: Endpoint::new(args.host, args.port),
            log_level: args.log_level,
        }
    }
}
