//! # One-shot stop latch.
//!
//! [`StopLatch`] is the group's only piece of state shared with runners. It
//! wraps a [`CancellationToken`] with an atomic flag so that
//! [`fire`](StopLatch::fire) succeeds for exactly one caller, however many
//! runners finish at the same instant. Runners only ever see the read side,
//! [`StopSignal`].
//!
//! ```text
//! coordinator ── fire() ──► swap(fired, true)
//!                              ├─ was false ─► token.cancel() ─► true  (winner)
//!                              └─ was true  ─► false                  (no-op)
//!
//! runner N ── stop.fired().await ◄── token.cancelled()
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio_util::sync::CancellationToken;

/// Write-once broadcast owned by the group coordinator.
#[derive(Debug, Default)]
pub(crate) struct StopLatch {
    fired: AtomicBool,
    token: CancellationToken,
}

impl StopLatch {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Fires the latch. Returns `true` only for the call that actually fired it.
    pub(crate) fn fire(&self) -> bool {
        if self.fired.swap(true, Ordering::AcqRel) {
            return false;
        }
        self.token.cancel();
        true
    }

    /// Read-only view handed to runners.
    pub(crate) fn signal(&self) -> StopSignal {
        StopSignal {
            token: self.token.clone(),
        }
    }
}

/// Read side of the group's stop latch.
///
/// Cheap to clone. Once fired it stays fired, so a runner that checks after
/// the fact still observes it.
#[derive(Clone, Debug)]
pub struct StopSignal {
    token: CancellationToken,
}

impl StopSignal {
    /// A signal that never fires. Handy for running a runner outside a group.
    #[must_use]
    pub fn never() -> Self {
        Self {
            token: CancellationToken::new(),
        }
    }

    /// True once the group fired its stop signal.
    #[inline]
    pub fn is_fired(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Completes when the stop signal fires (immediately if it already did).
    pub async fn fired(&self) {
        self.token.cancelled().await
    }

    /// Owned variant of [`fired`](Self::fired), for APIs that take a `'static` future
    /// (graceful shutdown hooks, spawned tasks).
    pub fn fired_owned(&self) -> impl Future<Output = ()> + Send + 'static {
        self.token.clone().cancelled_owned()
    }

    /// A child token that is cancelled when the signal fires.
    ///
    /// Cancelling the child does not fire the group's signal.
    #[must_use]
    pub fn token(&self) -> CancellationToken {
        self.token.child_token()
    }
}
