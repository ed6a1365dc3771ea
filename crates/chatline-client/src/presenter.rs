//! User-visible output.

/// Sink for user-visible messages.
///
/// One call per event. Implementations must be cheap and must not call back
/// into the session.
pub trait Presenter: Send + Sync {
    /// Display one message to the user.
    fn display(&self, text: &str);
}

/// Messages the session shows to the user.
///
/// Kept as constants so frontends and tests match them exactly.
pub mod messages {
    /// Successful connect.
    pub const CONNECTED: &str = "Connected to server.";
    /// Connect skipped because the session is already connected.
    pub const ALREADY_CONNECTED: &str = "Already connected.";
    /// Transport open failed.
    pub const CONNECT_FAILED: &str = "Could not connect to server.";
    /// Connection closed on request.
    pub const CLOSED: &str = "Connection closed.";
    /// Transport close failed.
    pub const CLOSE_FAILED: &str = "Error closing connection.";
    /// Outbound send failed.
    pub const SEND_FAILED: &str = "Could not send message to server.";
    /// Server side went away.
    pub const CONNECTION_LOST: &str = "Connection to server lost.";
    /// Host change rejected while connected.
    pub const HOST_WHILE_CONNECTED: &str = "Error: Must be logged off before changing host.";
    /// Port change rejected while connected.
    pub const PORT_WHILE_CONNECTED: &str = "Error: Must be logged off before changing port.";
}
