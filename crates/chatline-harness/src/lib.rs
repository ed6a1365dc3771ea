//! Deterministic simulation harness for Chatline client testing.
//!
//! In-memory implementations of the [`chatline_client::Transport`],
//! [`chatline_client::Presenter`] and [`chatline_app::LineSource`] traits, so
//! session and runtime behavior can be exercised without sockets or a
//! terminal.
//!
//! # Components
//!
//! - [`SimNetwork`]: shared view of a simulated server link; injects inbound
//!   traffic and failures, records what was sent
//! - [`SimTransport`]: the transport half handed to the session
//! - [`RecordingPresenter`]: captures every displayed message
//! - [`ScriptedLines`]: replays a fixed list of input lines

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod presenter;
pub mod script;
pub mod sim_transport;

pub use presenter::RecordingPresenter;
pub use script::{ScriptedLines, ScriptedLinesError};
pub use sim_transport::{SimNetwork, SimTransport};
