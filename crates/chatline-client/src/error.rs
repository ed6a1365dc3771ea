//! Client error types.

use thiserror::Error;

/// Errors reported by a [`crate::Transport`].
#[derive(Debug, Error)]
pub enum TransportError {
    /// Opening the connection failed.
    #[error("connection failed: {0}")]
    Connect(#[source] std::io::Error),

    /// Reading or writing the open connection failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Operation requires an open connection.
    #[error("not connected")]
    NotConnected,

    /// `open` was called on a transport that is already open.
    #[error("connection already open")]
    AlreadyOpen,

    /// The peer closed the connection.
    #[error("connection closed by peer")]
    Closed,
}

/// Errors returned by [`crate::Session`] operations.
///
/// The session has already shown the matching message to the presenter by the
/// time one of these is returned; callers inspect them for control flow only.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Transport open failed. Recoverable, state stays disconnected.
    #[error("could not connect: {0}")]
    Connect(#[source] TransportError),

    /// Transport close failed. State is disconnected regardless.
    #[error("could not close connection: {0}")]
    Close(#[source] TransportError),

    /// Outbound send failed.
    #[error("could not send: {0}")]
    Transmit(#[source] TransportError),

    /// Endpoint mutation attempted while connected.
    #[error("must be logged off before changing {field}")]
    InvalidState {
        /// Endpoint field the caller tried to change.
        field: &'static str,
    },

    /// The session has been terminated.
    #[error("session terminated")]
    Terminated,
}
