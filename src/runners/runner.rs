//! # Runner abstraction.
//!
//! A [`Runner`] is one long-running unit of work owned by a [`Group`](crate::Group)
//! for the duration of a run: an HTTP server, a signal listener, a queue watcher.
//! The common handle type is [`RunnerRef`], an `Arc<dyn Runner>`.
//!
//! ## Contract
//! - [`execute`](Runner::execute) returns when the unit's own work is done **or**
//!   when the [`StopSignal`] fires, whichever comes first. It must return promptly
//!   once the signal fired; the group waits for it without a timeout.
//! - Returning before the signal fired is the "I am done" case: it triggers
//!   group-wide shutdown.
//! - [`interrupt`](Runner::interrupt) is for runners that block on something that
//!   does not watch the signal. The group calls it once, after firing the signal.
//!   It must be idempotent, must not block, and may be called after `execute`
//!   already returned. Errors are logged by the group, never propagated.

use std::sync::Arc;

use async_trait::async_trait;

use crate::core::StopSignal;
use crate::error::RunnerError;

/// Shared handle to a runner.
pub type RunnerRef = Arc<dyn Runner>;

/// # Long-running unit of work with start/stop semantics.
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use nuwa::{Runner, RunnerError, StopSignal};
///
/// struct Ticker;
///
/// #[async_trait]
/// impl Runner for Ticker {
///     fn name(&self) -> &str { "ticker" }
///
///     async fn execute(&self, stop: StopSignal) -> Result<(), RunnerError> {
///         loop {
///             tokio::select! {
///                 _ = stop.fired() => return Ok(()),
///                 _ = tokio::time::sleep(std::time::Duration::from_secs(1)) => {}
///             }
///         }
///     }
/// }
/// ```
#[async_trait]
pub trait Runner: Send + Sync + 'static {
    /// Returns a stable, human-readable runner name.
    fn name(&self) -> &str;

    /// Runs until the work completes or `stop` fires.
    ///
    /// `Err(RunnerError::Canceled)` is treated like `Ok(())` by the group.
    async fn execute(&self, stop: StopSignal) -> Result<(), RunnerError>;

    /// Asks a runner that does not watch the stop signal to unblock.
    ///
    /// `cause` is the error of the runner that triggered shutdown, `None` if it
    /// exited cleanly. The default does nothing.
    fn interrupt(&self, cause: Option<&RunnerError>) -> Result<(), RunnerError> {
        let _ = cause;
        Ok(())
    }
}
