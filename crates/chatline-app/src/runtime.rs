//! Client runtime.
//!
//! The [`Runtime`] drives the client loop, coordinating between:
//! - [`LineSource`]: local input, processed one line at a time
//! - [`CommandDispatcher`]: line classification and session operations
//! - the inbound pump: transport events delivered to the [`Session`] on a
//!   separate task, concurrently with local processing

use std::sync::Arc;

use chatline_client::{Inbound, Session, Transport};
use tokio::sync::mpsc;

use crate::{CommandDispatcher, Exit, Flow, LineSource};

/// Generic runtime over a transport and a line source.
///
/// # Type Parameters
///
/// - `T`: transport owned by the session
/// - `L`: where input lines come from
pub struct Runtime<T, L>
where
    T: Transport + 'static,
    L: LineSource,
{
    session: Arc<Session<T>>,
    inbound: mpsc::Receiver<Inbound>,
    lines: L,
}

impl<T, L> Runtime<T, L>
where
    T: Transport + 'static,
    L: LineSource,
{
    /// Create a runtime for `session`, fed by `lines`.
    ///
    /// `inbound` must be the receiving end of the channel the session's
    /// transport delivers to.
    pub fn new(session: Arc<Session<T>>, inbound: mpsc::Receiver<Inbound>, lines: L) -> Self {
        Self { session, inbound, lines }
    }

    /// Run until the session ends or input runs out.
    ///
    /// The session is terminated on every exit path, so the transport is
    /// released before this returns.
    ///
    /// # Errors
    ///
    /// Returns the line source's error if reading input fails.
    pub async fn run(self) -> Result<Exit, L::Error> {
        let Self { session, inbound, mut lines } = self;

        let pump = tokio::spawn(pump_inbound(Arc::clone(&session), inbound));
        let dispatcher = CommandDispatcher::new(Arc::clone(&session));

        let result = drive(&dispatcher, &mut lines).await;
        match &result {
            Ok(exit) => tracing::debug!(?exit, "client loop finished"),
            Err(e) => tracing::warn!(error = %e, "input failed, shutting down"),
        }

        session.terminate().await;
        pump.abort();
        result
    }
}

/// Read and dispatch lines until the dispatcher or the source says stop.
async fn drive<T, L>(dispatcher: &CommandDispatcher<T>, lines: &mut L) -> Result<Exit, L::Error>
where
    T: Transport,
    L: LineSource,
{
    loop {
        let Some(line) = lines.next_line().await? else {
            return Ok(Exit::EndOfInput);
        };

        if let Flow::Exit(exit) = dispatcher.dispatch(&line).await {
            return Ok(exit);
        }
    }
}

/// Deliver inbound transport events to `session` until the channel closes.
pub async fn pump_inbound<T: Transport>(
    session: Arc<Session<T>>,
    mut inbound: mpsc::Receiver<Inbound>,
) {
    while let Some(event) = inbound.recv().await {
        session.handle_inbound(event).await;
    }
    tracing::debug!("inbound channel closed");
}
