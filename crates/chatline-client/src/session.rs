//! Connection/session state machine.
//!
//! The [`Session`] owns the connection lifecycle: the server [`Endpoint`], the
//! login identity, the [`ConnectionState`] and the [`Transport`] handle. All of
//! them live behind one async mutex, so local operations and inbound
//! notifications delivered from another task observe a consistent state.
//!
//! # State machine
//!
//! ```text
//!                 connect()
//!   Disconnected ───────────▶ Connected
//!        ▲   ◀───────────────────┘
//!        │    disconnect() / connection lost
//!        │
//!        └── set_endpoint() (self-loop, disconnected only)
//!
//!   any state ── terminate() ──▶ Terminated (absorbing)
//! ```
//!
//! Every user-visible outcome is reported to the [`Presenter`]; the returned
//! [`SessionError`] is for control flow only.

use std::{future::Future, sync::Arc};

use tokio::sync::Mutex;

use crate::{ConnectionId, Endpoint, Inbound, Presenter, SessionError, TransportError, messages};

/// Directive sent to the server to present the login identity.
pub const LOGIN_DIRECTIVE: &str = "#login";

/// Opaque connection primitive driven by the [`Session`].
///
/// Inbound traffic is not part of this trait: implementations push
/// [`Inbound`] events onto a channel handed to them at construction, and the
/// owner of the session forwards those events to
/// [`Session::handle_inbound`].
///
/// # Implementations
///
/// - **TCP**: [`crate::transport::TcpTransport`] (feature `transport`)
/// - **Simulation**: in-memory transport used by the test harness
pub trait Transport: Send {
    /// Open a connection to `endpoint`.
    ///
    /// Returns the id that tags inbound events for this connection.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established or is already
    /// open.
    fn open(
        &mut self,
        endpoint: &Endpoint,
    ) -> impl Future<Output = Result<ConnectionId, TransportError>> + Send;

    /// Close the open connection. Closing a closed transport succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying shutdown fails. The transport counts
    /// as closed afterwards either way.
    fn close(&mut self) -> impl Future<Output = Result<(), TransportError>> + Send;

    /// Send one payload over the open connection.
    ///
    /// # Errors
    ///
    /// Returns an error if the transport is closed or the write fails.
    fn send(&mut self, payload: &str) -> impl Future<Output = Result<(), TransportError>> + Send;

    /// Id of the live connection. `None` if closed.
    fn connection_id(&self) -> Option<ConnectionId>;
}

/// Connection state of a [`Session`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// No open connection. Endpoint may be changed.
    Disconnected,
    /// Connection open; identity has been presented if set.
    Connected,
    /// Session ended. The transport has been released.
    Terminated,
}

/// State guarded by the session lock.
///
/// `transport` is `None` exactly when `state` is `Terminated`.
struct Inner<T> {
    state: ConnectionState,
    endpoint: Endpoint,
    identity: Option<String>,
    transport: Option<T>,
}

impl<T: Transport> Inner<T> {
    /// Close and release the transport, then enter `Terminated`.
    ///
    /// Safe to call repeatedly; the transport is dropped on the first call.
    async fn shutdown(&mut self) {
        let Some(mut transport) = self.transport.take() else {
            return;
        };

        if transport.connection_id().is_some()
            && let Err(e) = transport.close().await
        {
            tracing::debug!(error = %e, "close during terminate failed");
        }

        drop(transport);
        self.state = ConnectionState::Terminated;
        tracing::debug!(endpoint = %self.endpoint, "session terminated");
    }
}

/// Chat session over a single outbound connection.
///
/// Generic over the [`Transport`] so production and simulation share the same
/// session logic. Share it between the input loop and the inbound pump with
/// an [`Arc`].
pub struct Session<T: Transport> {
    inner: Mutex<Inner<T>>,
    presenter: Arc<dyn Presenter>,
}

impl<T: Transport> Session<T> {
    /// Create a disconnected session.
    ///
    /// The session takes exclusive ownership of `transport`.
    pub fn new(transport: T, endpoint: Endpoint, presenter: Arc<dyn Presenter>) -> Self {
        let inner = Inner {
            state: ConnectionState::Disconnected,
            endpoint,
            identity: None,
            transport: Some(transport),
        };
        Self { inner: Mutex::new(inner), presenter }
    }

    /// Connect to the current endpoint and present the identity.
    ///
    /// Skipped when already connected. On success the login directive is sent
    /// first if an identity is set, then "Connected to server." is shown.
    ///
    /// # Errors
    ///
    /// - [`SessionError::Connect`] if the transport cannot be opened
    /// - [`SessionError::Transmit`] if the login directive cannot be sent; the
    ///   new connection is closed again
    /// - [`SessionError::Terminated`] after [`Session::terminate`]
    pub async fn connect(&self) -> Result<(), SessionError> {
        let mut guard = self.inner.lock().await;
        let inner = &mut *guard;

        match inner.state {
            ConnectionState::Terminated => return Err(SessionError::Terminated),
            ConnectionState::Connected => {
                tracing::debug!(endpoint = %inner.endpoint, "already connected, skipping open");
                self.presenter.display(messages::ALREADY_CONNECTED);
                return Ok(());
            },
            ConnectionState::Disconnected => {},
        }

        let transport = inner.transport.as_mut().ok_or(SessionError::Terminated)?;
        let connection = match transport.open(&inner.endpoint).await {
            Ok(connection) => connection,
            Err(e) => {
                tracing::warn!(endpoint = %inner.endpoint, error = %e, "connect failed");
                self.presenter.display(messages::CONNECT_FAILED);
                return Err(SessionError::Connect(e));
            },
        };

        if let Some(identity) = inner.identity.as_deref() {
            let login = format!("{LOGIN_DIRECTIVE} {identity}");
            if let Err(e) = transport.send(&login).await {
                tracing::warn!(%connection, error = %e, "login directive not delivered");
                if let Err(close_err) = transport.close().await {
                    tracing::debug!(error = %close_err, "close after failed login failed");
                }
                self.presenter.display(messages::CONNECT_FAILED);
                return Err(SessionError::Transmit(e));
            }
        }

        inner.state = ConnectionState::Connected;
        tracing::debug!(endpoint = %inner.endpoint, %connection, "connected");
        self.presenter.display(messages::CONNECTED);
        Ok(())
    }

    /// Close the connection.
    ///
    /// The state is `Disconnected` afterwards even if the close fails.
    ///
    /// # Errors
    ///
    /// - [`SessionError::Close`] if the transport reports a close failure
    /// - [`SessionError::Terminated`] after [`Session::terminate`]
    pub async fn disconnect(&self) -> Result<(), SessionError> {
        let mut guard = self.inner.lock().await;
        let inner = &mut *guard;

        let transport = inner.transport.as_mut().ok_or(SessionError::Terminated)?;
        let result = match transport.connection_id() {
            Some(_) => transport.close().await,
            None => Ok(()),
        };
        inner.state = ConnectionState::Disconnected;

        match result {
            Ok(()) => {
                tracing::debug!(endpoint = %inner.endpoint, "disconnected");
                self.presenter.display(messages::CLOSED);
                Ok(())
            },
            Err(e) => {
                tracing::warn!(endpoint = %inner.endpoint, error = %e, "close failed");
                self.presenter.display(messages::CLOSE_FAILED);
                Err(SessionError::Close(e))
            },
        }
    }

    /// Store the login identity presented on every successful connect.
    ///
    /// Nothing is transmitted until the next connect.
    pub async fn set_identity(&self, identity: impl Into<String>) {
        self.inner.lock().await.identity = Some(identity.into());
    }

    /// Change the endpoint. Only permitted while disconnected.
    ///
    /// `None` leaves the corresponding field unchanged.
    ///
    /// # Errors
    ///
    /// - [`SessionError::InvalidState`] while connected; nothing changes
    /// - [`SessionError::Terminated`] after [`Session::terminate`]
    pub async fn set_endpoint(
        &self,
        host: Option<String>,
        port: Option<u16>,
    ) -> Result<(), SessionError> {
        let mut guard = self.inner.lock().await;
        let inner = &mut *guard;

        match inner.state {
            ConnectionState::Terminated => Err(SessionError::Terminated),
            ConnectionState::Connected => {
                let (field, message) = if host.is_some() {
                    ("host", messages::HOST_WHILE_CONNECTED)
                } else {
                    ("port", messages::PORT_WHILE_CONNECTED)
                };
                self.presenter.display(message);
                Err(SessionError::InvalidState { field })
            },
            ConnectionState::Disconnected => {
                if let Some(host) = host {
                    inner.endpoint.host = host;
                }
                if let Some(port) = port {
                    inner.endpoint.port = port;
                }
                tracing::debug!(endpoint = %inner.endpoint, "endpoint changed");
                Ok(())
            },
        }
    }

    /// Current endpoint. Always permitted.
    pub async fn endpoint(&self) -> Endpoint {
        self.inner.lock().await.endpoint.clone()
    }

    /// Current connection state.
    pub async fn state(&self) -> ConnectionState {
        self.inner.lock().await.state
    }

    /// Stored login identity. `None` if never set.
    pub async fn identity(&self) -> Option<String> {
        self.inner.lock().await.identity.clone()
    }

    /// Whether [`Session::terminate`] has run.
    pub async fn is_terminated(&self) -> bool {
        self.state().await == ConnectionState::Terminated
    }

    /// Send an application payload verbatim.
    ///
    /// A failed send is unrecoverable: "Could not send message to server." is
    /// shown and the session terminates.
    ///
    /// # Errors
    ///
    /// - [`SessionError::Transmit`] if the transport rejects the payload
    /// - [`SessionError::Terminated`] after [`Session::terminate`]
    pub async fn send_payload(&self, text: &str) -> Result<(), SessionError> {
        let mut guard = self.inner.lock().await;

        let transport = guard.transport.as_mut().ok_or(SessionError::Terminated)?;
        let result = transport.send(text).await;
        match result {
            Ok(()) => {
                tracing::trace!(len = text.len(), "payload sent");
                Ok(())
            },
            Err(e) => {
                tracing::warn!(error = %e, "payload not delivered, terminating session");
                self.presenter.display(messages::SEND_FAILED);
                guard.shutdown().await;
                Err(SessionError::Transmit(e))
            },
        }
    }

    /// Close the transport (errors swallowed) and end the session for good.
    ///
    /// Idempotent: later calls do nothing.
    pub async fn terminate(&self) {
        self.inner.lock().await.shutdown().await;
    }

    /// Show a message through the session's presenter.
    pub fn display(&self, text: &str) {
        self.presenter.display(text);
    }

    /// Forward an inbound message to the presenter verbatim.
    pub fn on_receive(&self, payload: &str) {
        tracing::trace!(len = payload.len(), "payload received");
        self.presenter.display(payload);
    }

    /// Transport-failure notification for `connection`.
    ///
    /// Ignored unless `connection` is the live connection; a late notice from
    /// a connection that was already closed or replaced changes nothing.
    pub async fn on_connection_lost(&self, connection: ConnectionId) {
        let mut guard = self.inner.lock().await;
        let inner = &mut *guard;

        let Some(transport) = inner.transport.as_mut() else {
            return;
        };
        if transport.connection_id() != Some(connection) {
            tracing::debug!(%connection, "ignoring close of stale connection");
            return;
        }

        if let Err(e) = transport.close().await {
            tracing::debug!(%connection, error = %e, "close after connection loss failed");
        }
        inner.state = ConnectionState::Disconnected;
        tracing::warn!(endpoint = %inner.endpoint, %connection, "connection lost");
        self.presenter.display(messages::CONNECTION_LOST);
    }

    /// Apply one inbound transport event.
    ///
    /// Messages from a connection other than the live one are dropped.
    pub async fn handle_inbound(&self, event: Inbound) {
        match event {
            Inbound::Message { connection, payload } => {
                if self.is_live(connection).await {
                    self.on_receive(&payload);
                } else {
                    tracing::debug!(%connection, "dropping message from stale connection");
                }
            },
            Inbound::Closed { connection } => self.on_connection_lost(connection).await,
        }
    }

    async fn is_live(&self, connection: ConnectionId) -> bool {
        let guard = self.inner.lock().await;
        guard.transport.as_ref().and_then(T::connection_id) == Some(connection)
    }
}
