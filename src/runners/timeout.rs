//! # Caller-side timeout for a runner.
//!
//! The group never times out a runner on its own. [`WithTimeout`] bounds one
//! runner's `execute`: if the inner future does not finish within the
//! duration, it is dropped and the wrapper returns [`RunnerError::Timeout`],
//! which the group treats like any other runner error.
//!
//! ```text
//! execute(stop) ──► tokio::time::timeout(dur, inner.execute(stop))
//!                      ├─ Ok(res)      ─► res
//!                      └─ Err(elapsed) ─► Err(Timeout { dur })
//! ```
//!
//! A zero duration disables the timeout.

use std::time::Duration;

use async_trait::async_trait;
use tokio::time;

use crate::core::StopSignal;
use crate::error::RunnerError;
use crate::runners::{Runner, RunnerRef};

/// Wraps a runner with an execution deadline.
pub struct WithTimeout {
    inner: RunnerRef,
    timeout: Duration,
}

impl WithTimeout {
    /// Wraps `inner`; `Duration::ZERO` means no timeout.
    pub fn new(inner: RunnerRef, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    /// Returns the configured timeout, `None` if disabled.
    pub fn timeout(&self) -> Option<Duration> {
        Some(self.timeout).filter(|d| *d > Duration::ZERO)
    }
}

#[async_trait]
impl Runner for WithTimeout {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn execute(&self, stop: StopSignal) -> Result<(), RunnerError> {
        let Some(dur) = self.timeout() else {
            return self.inner.execute(stop).await;
        };
        match time::timeout(dur, self.inner.execute(stop)).await {
            Ok(res) => res,
            Err(_elapsed) => Err(RunnerError::Timeout { timeout: dur }),
        }
    }

    fn interrupt(&self, cause: Option<&RunnerError>) -> Result<(), RunnerError> {
        self.inner.interrupt(cause)
    }
}
