//! Scripted input lines.

use std::{collections::VecDeque, fmt};

use chatline_app::LineSource;

/// Error injected at the end of a failing script.
#[derive(Debug, Clone)]
pub struct ScriptedLinesError(pub String);

impl fmt::Display for ScriptedLinesError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ScriptedLinesError: {}", self.0)
    }
}

impl std::error::Error for ScriptedLinesError {}

/// Replays a fixed list of lines, then reports end of input (or an error).
#[derive(Debug, Default)]
pub struct ScriptedLines {
    lines: VecDeque<String>,
    fail_at_end: bool,
}

impl ScriptedLines {
    /// Script that ends normally after `lines`.
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { lines: lines.into_iter().map(Into::into).collect(), fail_at_end: false }
    }

    /// Script that fails with a read error after `lines`.
    pub fn failing<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { fail_at_end: true, ..Self::new(lines) }
    }
}

impl LineSource for ScriptedLines {
    type Error = ScriptedLinesError;

    async fn next_line(&mut self) -> Result<Option<String>, Self::Error> {
        match self.lines.pop_front() {
            Some(line) => Ok(Some(line)),
            None if self.fail_at_end => Err(ScriptedLinesError("input closed unexpectedly".into())),
            None => Ok(None),
        }
    }
}
