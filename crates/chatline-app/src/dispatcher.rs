//! Command dispatch.
//!
//! The [`CommandDispatcher`] applies one classified input line to the
//! [`Session`]. Parsing lives in [`crate::directive`]; this module only maps
//! each [`Directive`] to its session operation.

use std::sync::Arc;

use chatline_client::{Session, SessionError, Transport};

use crate::directive::{self, Directive, Input};

/// Why the client loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    /// User asked to quit (or the session was already over).
    Quit,
    /// An outbound send failed and the session terminated itself.
    SendFailed,
    /// The line source ran out of input.
    EndOfInput,
}

/// What the owner of the dispatcher should do after a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Read the next line.
    Continue,
    /// The session has terminated; stop.
    Exit(Exit),
}

/// Routes input lines to a [`Session`].
///
/// Holds nothing but the shared session; every message it produces goes
/// through the session's presenter.
pub struct CommandDispatcher<T: Transport> {
    session: Arc<Session<T>>,
}

impl<T: Transport> CommandDispatcher<T> {
    /// Create a dispatcher driving `session`.
    pub fn new(session: Arc<Session<T>>) -> Self {
        Self { session }
    }

    /// The session this dispatcher drives.
    pub fn session(&self) -> &Arc<Session<T>> {
        &self.session
    }

    /// Process one input line to completion.
    ///
    /// Parse errors and rejected operations are shown to the user and never
    /// stop the dispatcher; only a terminated session does.
    pub async fn dispatch(&self, line: &str) -> Flow {
        match directive::parse(line) {
            Ok(Input::Payload(text)) => match self.session.send_payload(text).await {
                Ok(()) => Flow::Continue,
                Err(SessionError::Transmit(_)) => Flow::Exit(Exit::SendFailed),
                Err(e) => flow_after(Err(e)),
            },
            Ok(Input::Directive(directive)) => self.apply(directive).await,
            Err(e) => {
                tracing::debug!(error = ?e, "directive rejected");
                self.session.display(&e.to_string());
                Flow::Continue
            },
        }
    }

    /// Apply a parsed directive.
    pub async fn apply(&self, directive: Directive) -> Flow {
        let result = match directive {
            Directive::Quit => {
                self.session.terminate().await;
                return Flow::Exit(Exit::Quit);
            },
            Directive::Logoff => self.session.disconnect().await,
            Directive::Login => self.session.connect().await,
            Directive::SetHost { host } => self.session.set_endpoint(Some(host), None).await,
            Directive::SetPort { port } => self.session.set_endpoint(None, Some(port)).await,
            Directive::GetHost => {
                let endpoint = self.session.endpoint().await;
                self.session.display(&format!("Current host: {}", endpoint.host));
                Ok(())
            },
            Directive::GetPort => {
                let endpoint = self.session.endpoint().await;
                self.session.display(&format!("Current port: {}", endpoint.port));
                Ok(())
            },
        };

        flow_after(result)
    }
}

/// Map a session result to a flow decision.
///
/// The session has already shown the failure; it is only logged here.
fn flow_after(result: Result<(), SessionError>) -> Flow {
    match result {
        Ok(()) => Flow::Continue,
        Err(SessionError::Terminated) => Flow::Exit(Exit::Quit),
        Err(e) => {
            tracing::debug!(error = %e, "session operation failed");
            Flow::Continue
        },
    }
}
