//! # Lifecycle events emitted by the run group.
//!
//! The [`EventKind`] enum classifies event types across two categories:
//! - **Group events**: the group as a whole (starting, stop fired, drained)
//! - **Runner events**: a single runner (starting, exited, failed, interrupt failed)
//!
//! The [`Event`] struct carries additional metadata such as timestamps,
//! runner name and registration index, and error text.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//! Use `seq` to restore the exact order when events are delivered out of order.
//!
//! ## Example
//! ```rust
//! use nuwa::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::RunnerFailed)
//!     .with_runner("web")
//!     .with_index(0)
//!     .with_reason("boom");
//!
//! assert_eq!(ev.kind, EventKind::RunnerFailed);
//! assert_eq!(ev.runner.as_deref(), Some("web"));
//! assert_eq!(ev.reason.as_deref(), Some("boom"));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of group events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Group events ===
    /// Group is about to spawn its runners.
    ///
    /// Sets:
    /// - `runners`: number of registered runners
    GroupStarting,

    /// The first runner exited and the stop signal fired. Published exactly once per run.
    ///
    /// Sets:
    /// - `runner`: name of the runner that triggered shutdown
    /// - `index`: its registration index
    /// - `reason`: its error, if it failed
    StopFired,

    /// Every runner has returned.
    ///
    /// Sets:
    /// - `runners`: number of runners drained
    /// - `reason`: the outcome error, if any
    GroupDrained,

    // === Runner events ===
    /// Runner task spawned.
    ///
    /// Sets:
    /// - `runner`, `index`
    RunnerStarting,

    /// Runner returned `Ok(())` or `Canceled`.
    ///
    /// Sets:
    /// - `runner`, `index`
    /// - `shutdown`: true if it exited after the stop signal fired
    RunnerExited,

    /// Runner returned an error.
    ///
    /// Sets:
    /// - `runner`, `index`
    /// - `reason`: error text
    /// - `shutdown`: true if it failed after the stop signal fired
    RunnerFailed,

    /// `interrupt` returned an error or panicked. Never affects the outcome.
    ///
    /// Sets:
    /// - `runner`, `index`
    /// - `reason`: error text
    InterruptFailed,
}

/// Group event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Name of the runner, if applicable.
    pub runner: Option<Arc<str>>,
    /// Registration index of the runner.
    pub index: Option<usize>,
    /// Human-readable reason (error text).
    pub reason: Option<Arc<str>>,
    /// Number of runners in the group.
    pub runners: Option<usize>,
    /// Whether a runner exit happened after the stop signal fired.
    pub shutdown: bool,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            runner: None,
            index: None,
            reason: None,
            runners: None,
            shutdown: false,
        }
    }

    /// Attaches a runner name.
    #[inline]
    pub fn with_runner(mut self, runner: impl Into<Arc<str>>) -> Self {
        self.runner = Some(runner.into());
        self
    }

    /// Attaches a registration index.
    #[inline]
    pub fn with_index(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches the group size.
    #[inline]
    pub fn with_runners(mut self, n: usize) -> Self {
        self.runners = Some(n);
        self
    }

    /// Marks the event as happening during shutdown.
    #[inline]
    pub fn during_shutdown(mut self) -> Self {
        self.shutdown = true;
        self
    }
}
