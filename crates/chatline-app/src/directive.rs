//! Directive parsing.
//!
//! A line starting with [`DIRECTIVE_MARKER`] is a directive interpreted by the
//! client itself; any other line is a payload for the server. The keyword
//! follows the marker immediately and is case-sensitive. Arguments are
//! whitespace-separated; only the first one is used.

use std::num::ParseIntError;

use thiserror::Error;

/// Marks a line as a local directive.
pub const DIRECTIVE_MARKER: char = '#';

const SETHOST_USAGE: &str = "#sethost <hostname>";
const SETPORT_USAGE: &str = "#setport <port>";

/// Locally interpreted command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// `#quit`: terminate the session and exit.
    Quit,
    /// `#logoff`: disconnect but keep running.
    Logoff,
    /// `#login`: connect and present the identity.
    Login,
    /// `#sethost <host>`: change the server host.
    SetHost {
        /// New hostname.
        host: String,
    },
    /// `#setport <port>`: change the server port.
    SetPort {
        /// New port.
        port: u16,
    },
    /// `#gethost`: show the current host.
    GetHost,
    /// `#getport`: show the current port.
    GetPort,
}

/// A classified input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input<'a> {
    /// Local directive.
    Directive(Directive),
    /// Text to forward to the server verbatim.
    Payload(&'a str),
}

/// Rejected directive line.
///
/// The `Display` output is the message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Marker present but no directive matches.
    #[error("Unknown command.")]
    Unknown {
        /// The rejected line.
        input: String,
    },

    /// Directive requires an argument that was not given.
    #[error("Usage: {usage}")]
    MissingArgument {
        /// Expected syntax.
        usage: &'static str,
    },

    /// Port argument is not an integer in 0..=65535.
    #[error("Invalid port: {input}")]
    InvalidPort {
        /// The rejected argument.
        input: String,
        /// Why it did not parse.
        #[source]
        source: ParseIntError,
    },
}

/// Classify one input line.
///
/// # Errors
///
/// Returns [`ParseError`] for a marker-prefixed line that is not a valid
/// directive. Lines without the marker never fail.
pub fn parse(line: &str) -> Result<Input<'_>, ParseError> {
    let Some(rest) = line.strip_prefix(DIRECTIVE_MARKER) else {
        return Ok(Input::Payload(line));
    };

    let (keyword, args) = rest.split_at(rest.find(char::is_whitespace).unwrap_or(rest.len()));
    let mut args = args.split_whitespace();

    let directive = match (keyword, args.next()) {
        ("quit", None) => Directive::Quit,
        ("logoff", None) => Directive::Logoff,
        ("login", None) => Directive::Login,
        ("gethost", None) => Directive::GetHost,
        ("getport", None) => Directive::GetPort,
        ("sethost", Some(host)) => Directive::SetHost { host: host.to_owned() },
        ("sethost", None) => return Err(ParseError::MissingArgument { usage: SETHOST_USAGE }),
        ("setport", Some(arg)) => {
            let port = arg
                .parse()
                .map_err(|source| ParseError::InvalidPort { input: arg.to_owned(), source })?;
            Directive::SetPort { port }
        },
        ("setport", None) => return Err(ParseError::MissingArgument { usage: SETPORT_USAGE }),
        _ => return Err(ParseError::Unknown { input: line.to_owned() }),
    };

    Ok(Input::Directive(directive))
}
