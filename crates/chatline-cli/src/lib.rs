//! Console frontend for Chatline
//!
//! A thin shell over [`chatline_app::Runtime`] that provides console I/O:
//! stdin lines in, `> `-prefixed messages out, TCP to the server. All session
//! and dispatch logic lives in the library crates.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod config;
pub mod console;

use std::{io, sync::Arc};

use chatline_app::{Exit, Runtime};
use chatline_client::{Presenter, Session, transport::TcpTransport};
use tokio::sync::mpsc;

pub use config::{Args, ClientConfig};
pub use console::{ConsolePresenter, StdinLines};

/// Capacity of the inbound event channel between transport and session.
const INBOUND_CAPACITY: usize = 64;

/// Connect with `config` and run the console loop until it ends.
///
/// A failed initial connect is not fatal: the user can retry with `#login`.
///
/// # Errors
///
/// Returns an error if reading stdin fails.
pub async fn run(config: ClientConfig) -> io::Result<Exit> {
    let (inbound_tx, inbound_rx) = mpsc::channel(INBOUND_CAPACITY);
    let presenter: Arc<dyn Presenter> = Arc::new(ConsolePresenter::new());
    let transport = TcpTransport::new(inbound_tx);

    let session = Arc::new(Session::new(transport, config.endpoint.clone(), presenter));
    session.set_identity(config.identity).await;

    tracing::info!(endpoint = %config.endpoint, "connecting");
    if let Err(e) = session.connect().await {
        tracing::debug!(error = %e, "initial connect failed");
    }

    Runtime::new(session, inbound_rx, StdinLines::new()).run().await
}
