//! Presenter that records instead of printing.

use std::sync::{Mutex, PoisonError};

use chatline_client::Presenter;

/// Captures displayed messages in order.
#[derive(Debug, Default)]
pub struct RecordingPresenter {
    messages: Mutex<Vec<String>>,
}

impl RecordingPresenter {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// All messages displayed so far.
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Whether `text` was displayed at least once.
    pub fn contains(&self, text: &str) -> bool {
        self.count(text) > 0
    }

    /// How many times `text` was displayed.
    pub fn count(&self, text: &str) -> usize {
        let messages = self.messages.lock().unwrap_or_else(PoisonError::into_inner);
        messages.iter().filter(|m| *m == text).count()
    }

    /// Most recent message. `None` if nothing was displayed.
    pub fn last(&self) -> Option<String> {
        self.messages.lock().unwrap_or_else(PoisonError::into_inner).last().cloned()
    }

    /// Forget everything recorded so far.
    pub fn clear(&self) {
        self.messages.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }
}

impl Presenter for RecordingPresenter {
    fn display(&self, text: &str) {
        tracing::trace!(text, "display");
        self.messages.lock().unwrap_or_else(PoisonError::into_inner).push(text.to_owned());
    }
}
