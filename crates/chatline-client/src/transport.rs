//! TCP transport for the client.
//!
//! Provides [`TcpTransport`], a thin layer that writes payloads as
//! newline-terminated UTF-8 lines and reads inbound lines on a background
//! task. Session logic stays in [`crate::Session`].

use tokio::{
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader},
    net::{
        TcpStream,
        tcp::{OwnedReadHalf, OwnedWriteHalf},
    },
    sync::mpsc,
    task::AbortHandle,
};

use crate::{ConnectionId, Endpoint, Inbound, Transport, TransportError};

/// An open TCP connection.
struct Connection {
    id: ConnectionId,
    writer: OwnedWriteHalf,
    reader: AbortHandle,
}

impl Drop for Connection {
    fn drop(&mut self) {
        self.reader.abort();
    }
}

/// Line-delimited TCP transport.
///
/// Each successful [`Transport::open`] spawns a reader task that pushes
/// [`Inbound`] events onto the channel given to [`TcpTransport::new`]. Must be
/// used from within a tokio runtime.
pub struct TcpTransport {
    inbound: mpsc::Sender<Inbound>,
    connection: Option<Connection>,
    next_id: u64,
}

impl TcpTransport {
    /// Create a closed transport delivering inbound events to `inbound`.
    pub fn new(inbound: mpsc::Sender<Inbound>) -> Self {
        Self { inbound, connection: None, next_id: 0 }
    }
}

impl Transport for TcpTransport {
    async fn open(&mut self, endpoint: &Endpoint) -> Result<ConnectionId, TransportError> {
        if self.connection.is_some() {
            return Err(TransportError::AlreadyOpen);
        }

        let stream = TcpStream::connect((endpoint.host.as_str(), endpoint.port))
            .await
            .map_err(TransportError::Connect)?;
        if let Err(e) = stream.set_nodelay(true) {
            tracing::debug!(error = %e, "failed to set TCP_NODELAY");
        }

        self.next_id = self.next_id.wrapping_add(1);
        let id = ConnectionId(self.next_id);

        let (read_half, writer) = stream.into_split();
        let handle = tokio::spawn(read_lines(id, read_half, self.inbound.clone()));

        tracing::debug!(%endpoint, connection = %id, "tcp connection open");
        self.connection = Some(Connection { id, writer, reader: handle.abort_handle() });
        Ok(id)
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        let Some(mut connection) = self.connection.take() else {
            return Ok(());
        };

        connection.reader.abort();
        connection.writer.shutdown().await?;
        tracing::debug!(connection = %connection.id, "tcp connection closed");
        Ok(())
    }

    async fn send(&mut self, payload: &str) -> Result<(), TransportError> {
        let connection = self.connection.as_mut().ok_or(TransportError::NotConnected)?;

        let mut line = String::with_capacity(payload.len().saturating_add(1));
        line.push_str(payload);
        line.push('\n');

        connection.writer.write_all(line.as_bytes()).await?;
        connection.writer.flush().await?;
        Ok(())
    }

    fn connection_id(&self) -> Option<ConnectionId> {
        self.connection.as_ref().map(|c| c.id)
    }
}

/// Read inbound lines until EOF or error, then report the close once.
async fn read_lines(id: ConnectionId, read_half: OwnedReadHalf, inbound: mpsc::Sender<Inbound>) {
    let mut lines = BufReader::new(read_half).lines();

    loop {
        match lines.next_line().await {
            Ok(Some(mut payload)) => {
                if payload.ends_with('\r') {
                    payload.pop();
                }
                if inbound.send(Inbound::Message { connection: id, payload }).await.is_err() {
                    // Receiver gone; nobody is listening for this connection.
                    return;
                }
            },
            Ok(None) => {
                tracing::debug!(connection = %id, "server closed connection");
                break;
            },
            Err(e) => {
                tracing::warn!(connection = %id, error = %e, "read failed");
                break;
            },
        }
    }

    let _ = inbound.send(Inbound::Closed { connection: id }).await;
}
