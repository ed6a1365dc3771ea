//! Client
//!
//! Connection/session state machine for the Chatline chat client. Owns the
//! single outbound connection, the server endpoint and the login identity,
//! and decides what may happen while connected or disconnected.
//!
//! # Architecture
//!
//! The [`Session`] drives an opaque [`Transport`] and reports every
//! user-visible event to a [`Presenter`]. Inbound traffic arrives as
//! [`Inbound`] events on a channel owned by the caller, who feeds them back
//! into [`Session::on_receive`] and [`Session::on_connection_lost`].
//!
//! # Components
//!
//! - [`Session`]: connection lifecycle and identity resend
//! - [`Transport`]: open/close/send abstraction over the wire
//! - [`Presenter`]: sink for user-visible messages
//! - [`Endpoint`]: server host and port
//!
//! # Transport (optional)
//!
//! With the `transport` feature enabled, this crate also provides
//! [`transport::TcpTransport`], a line-delimited TCP implementation.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod endpoint;
mod error;
mod event;
mod presenter;
mod session;

#[cfg(feature = "transport")]
pub mod transport;

pub use endpoint::{DEFAULT_HOST, DEFAULT_PORT, Endpoint};
pub use error::{SessionError, TransportError};
pub use event::{ConnectionId, Inbound};
pub use presenter::{Presenter, messages};
pub use session::{ConnectionState, LOGIN_DIRECTIVE, Session, Transport};
