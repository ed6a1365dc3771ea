//! Line source trait for abstracting the input side.
//!
//! The [`LineSource`] trait decouples the [`crate::Runtime`] from where input
//! lines come from. The console binary reads stdin; tests feed a script.

use std::future::Future;

/// Produces input lines, one at a time.
///
/// # Implementations
///
/// - **Console**: tokio stdin reader in the `chatline` binary
/// - **Simulation**: scripted lines from the test harness
pub trait LineSource: Send {
    /// Source-specific error type.
    type Error: std::error::Error + Send + 'static;

    /// Wait for the next line, without its line terminator.
    ///
    /// Returns `None` at end of input.
    ///
    /// # Errors
    ///
    /// Returns an error if reading fails.
    fn next_line(&mut self) -> impl Future<Output = Result<Option<String>, Self::Error>> + Send;
}
