//! Application layer for Chatline
//!
//! Turns raw input lines into session operations and runs the client loop,
//! independent of where the lines come from or how the transport works.
//!
//! # Components
//!
//! - [`directive`]: parses a line into a [`Directive`] or a payload
//! - [`CommandDispatcher`]: applies parsed lines to a [`chatline_client::Session`]
//! - [`LineSource`]: trait for the input side (console, script, ...)
//! - [`Runtime`]: reads lines, dispatches them and pumps inbound events

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod directive;
mod dispatcher;
mod runtime;
mod source;

pub use directive::{DIRECTIVE_MARKER, Directive, Input, ParseError};
pub use dispatcher::{CommandDispatcher, Exit, Flow};
pub use runtime::{Runtime, pump_inbound};
pub use source::LineSource;
