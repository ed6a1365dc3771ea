//! Inbound transport events.

use std::fmt;

/// Identifies one successful `open` of a transport.
///
/// Events tagged with an id other than the live connection's are stale and
/// belong to a connection that has already been replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(pub u64);

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Events a transport delivers from the server side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    /// One inbound message.
    Message {
        /// Connection the message arrived on.
        connection: ConnectionId,
        /// Message text.
        payload: String,
    },

    /// The connection ended (EOF or read error).
    Closed {
        /// Connection that ended.
        connection: ConnectionId,
    },
}
