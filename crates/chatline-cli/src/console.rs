//! Console I/O: stdout presenter and stdin line source.

use std::io::{self, Write};

use chatline_app::LineSource;
use chatline_client::Presenter;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

/// Prints each message on its own line, prefixed with `> `.
#[derive(Debug, Default)]
pub struct ConsolePresenter;

impl ConsolePresenter {
    /// Create a console presenter.
    pub fn new() -> Self {
        Self
    }
}

impl Presenter for ConsolePresenter {
    fn display(&self, text: &str) {
        let mut out = io::stdout().lock();
        if let Err(e) = writeln!(out, "> {text}").and_then(|()| out.flush()) {
            tracing::debug!(error = %e, "failed to write to stdout");
        }
    }
}

/// Reads lines from stdin.
pub struct StdinLines {
    lines: Lines<BufReader<Stdin>>,
}

impl StdinLines {
    /// Wrap the process's stdin.
    pub fn new() -> Self {
        Self { lines: BufReader::new(tokio::io::stdin()).lines() }
    }
}

impl Default for StdinLines {
    fn default() -> Self {
        Self::new()
    }
}

impl LineSource for StdinLines {
    type Error = io::Error;

    async fn next_line(&mut self) -> Result<Option<String>, Self::Error> {
        self.lines.next_line().await
    }
}
