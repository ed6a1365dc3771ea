//! In-memory transport for deterministic tests.
//!
//! [`SimNetwork`] is the test's handle on a simulated link: it decides whether
//! opens, closes and sends succeed, records everything the client sends, and
//! injects inbound traffic. [`SimTransport`] is the half handed to the
//! session. Both share one state, so the test observes exactly what the
//! session did to its transport.

use std::{
    io,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use chatline_client::{ConnectionId, Endpoint, Inbound, Transport, TransportError};
use tokio::sync::mpsc;

/// Capacity of the inbound channel created by [`SimNetwork::new`].
const INBOUND_CAPACITY: usize = 256;

/// Link state shared by the network handle and its transports.
#[derive(Debug, Default)]
struct LinkState {
    live: Option<ConnectionId>,
    next_id: u64,
    fail_open: bool,
    fail_close: bool,
    fail_send: bool,
    opened: Vec<Endpoint>,
    closes: usize,
    drops: usize,
    sent: Vec<String>,
}

/// Test-side handle on a simulated server link.
///
/// Holds the only sender of the inbound channel: dropping the network closes
/// the channel, which ends an inbound pump reading from it.
#[derive(Debug)]
pub struct SimNetwork {
    state: Arc<Mutex<LinkState>>,
    inbound: mpsc::Sender<Inbound>,
}

impl SimNetwork {
    /// Create a link and the receiver for its inbound events.
    pub fn new() -> (Self, mpsc::Receiver<Inbound>) {
        let (inbound, rx) = mpsc::channel(INBOUND_CAPACITY);
        (Self { state: Arc::default(), inbound }, rx)
    }

    /// Transport bound to this link.
    pub fn transport(&self) -> SimTransport {
        SimTransport { state: Arc::clone(&self.state) }
    }

    fn lock(&self) -> MutexGuard<'_, LinkState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Make subsequent opens fail (refused) or succeed.
    pub fn fail_opens(&self, fail: bool) {
        self.lock().fail_open = fail;
    }

    /// Make subsequent closes report an error. The link still closes.
    pub fn fail_closes(&self, fail: bool) {
        self.lock().fail_close = fail;
    }

    /// Make subsequent sends fail as if the connection broke.
    pub fn fail_sends(&self, fail: bool) {
        self.lock().fail_send = fail;
    }

    /// Payloads delivered to the server, in order, across all connections.
    pub fn sent(&self) -> Vec<String> {
        self.lock().sent.clone()
    }

    /// Endpoints of every successful open, in order.
    pub fn opened(&self) -> Vec<Endpoint> {
        self.lock().opened.clone()
    }

    /// Number of successful opens.
    pub fn opens(&self) -> usize {
        self.lock().opened.len()
    }

    /// Number of close calls on an open link (failed or not).
    pub fn closes(&self) -> usize {
        self.lock().closes
    }

    /// Number of transports dropped.
    pub fn drops(&self) -> usize {
        self.lock().drops
    }

    /// Live connection. `None` if closed.
    pub fn live(&self) -> Option<ConnectionId> {
        self.lock().live
    }

    /// Deliver a server message on the live connection.
    ///
    /// Returns `false` if there is no live connection or the receiver is gone.
    pub fn deliver(&self, payload: impl Into<String>) -> bool {
        let Some(connection) = self.live() else {
            return false;
        };
        self.inbound.try_send(Inbound::Message { connection, payload: payload.into() }).is_ok()
    }

    /// Simulate the server dropping the live connection.
    ///
    /// Emits [`Inbound::Closed`] for it, as a transport reader would on EOF.
    /// The transport itself stays open until the session closes it.
    pub fn hang_up(&self) -> Option<ConnectionId> {
        let connection = self.live()?;
        self.inbound.try_send(Inbound::Closed { connection }).ok()?;
        Some(connection)
    }

    /// Emit a close notice for an arbitrary connection id.
    pub fn report_closed(&self, connection: ConnectionId) -> bool {
        self.inbound.try_send(Inbound::Closed { connection }).is_ok()
    }
}

/// Session-side half of a [`SimNetwork`].
#[derive(Debug)]
pub struct SimTransport {
    state: Arc<Mutex<LinkState>>,
}

impl SimTransport {
    fn lock(&self) -> MutexGuard<'_, LinkState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Transport for SimTransport {
    async fn open(&mut self, endpoint: &Endpoint) -> Result<ConnectionId, TransportError> {
        let mut state = self.lock();
        if state.live.is_some() {
            return Err(TransportError::AlreadyOpen);
        }
        if state.fail_open {
            let refused = io::Error::new(io::ErrorKind::ConnectionRefused, "simulated refusal");
            return Err(TransportError::Connect(refused));
        }

        state.next_id = state.next_id.saturating_add(1);
        let id = ConnectionId(state.next_id);
        state.live = Some(id);
        state.opened.push(endpoint.clone());
        Ok(id)
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        let mut state = self.lock();
        if state.live.take().is_none() {
            return Ok(());
        }

        state.closes = state.closes.saturating_add(1);
        if state.fail_close {
            return Err(TransportError::Io(io::Error::other("simulated close failure")));
        }
        Ok(())
    }

    async fn send(&mut self, payload: &str) -> Result<(), TransportError> {
        let mut state = self.lock();
        if state.live.is_none() {
            return Err(TransportError::NotConnected);
        }
        if state.fail_send {
            return Err(TransportError::Io(io::Error::from(io::ErrorKind::BrokenPipe)));
        }

        state.sent.push(payload.to_owned());
        Ok(())
    }

    fn connection_id(&self) -> Option<ConnectionId> {
        self.lock().live
    }
}

impl Drop for SimTransport {
    fn drop(&mut self) {
        let mut state = self.lock();
        state.drops = state.drops.saturating_add(1);
    }
}
