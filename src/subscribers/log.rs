//! # LogWriter: renders group events through `tracing`
//!
//! A subscriber that turns each [`Event`] into a `tracing` record with
//! structured fields. Whether the output is JSON or human-readable, and which
//! levels are shown, is decided by the installed subscriber (see
//! [`logging::init`](crate::logging::init)).
//!
//! ## Example output (development format)
//! ```text
//! DEBUG nuwa: group starting runners=2
//! DEBUG nuwa: runner starting runner="http" index=0
//!  INFO nuwa: runner exited runner="signals" index=1 shutdown=false
//!  INFO nuwa: stop fired runner="signals" index=1
//! DEBUG nuwa: runner exited runner="http" index=0 shutdown=true
//!  INFO nuwa: group drained runners=2
//! ```

use async_trait::async_trait;
use tracing::{debug, error, info, warn};

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Event writer subscriber.
#[derive(Default, Debug)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let runner = e.runner.as_deref().unwrap_or("");
        let reason = e.reason.as_deref().unwrap_or("");
        match e.kind {
            EventKind::GroupStarting => {
                debug!(target: "nuwa", seq = e.seq, runners = ?e.runners, "group starting");
            }
            EventKind::RunnerStarting => {
                debug!(target: "nuwa", seq = e.seq, runner, index = ?e.index, "runner starting");
            }
            EventKind::RunnerExited if e.shutdown => {
                debug!(target: "nuwa", seq = e.seq, runner, index = ?e.index, shutdown = true, "runner exited");
            }
            EventKind::RunnerExited => {
                info!(target: "nuwa", seq = e.seq, runner, index = ?e.index, shutdown = false, "runner exited");
            }
            EventKind::RunnerFailed if e.shutdown => {
                warn!(target: "nuwa", seq = e.seq, runner, index = ?e.index, error = reason, "runner failed during shutdown");
            }
            EventKind::RunnerFailed => {
                error!(target: "nuwa", seq = e.seq, runner, index = ?e.index, error = reason, "runner failed");
            }
            EventKind::StopFired => {
                info!(target: "nuwa", seq = e.seq, runner, index = ?e.index, cause = reason, "stop fired");
            }
            EventKind::InterruptFailed => {
                warn!(target: "nuwa", seq = e.seq, runner, index = ?e.index, error = reason, "interrupt failed");
            }
            EventKind::GroupDrained => {
                info!(target: "nuwa", seq = e.seq, runners = ?e.runners, error = reason, "group drained");
            }
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
