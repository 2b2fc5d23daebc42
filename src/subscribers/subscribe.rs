//! # Core subscriber trait
//!
//! `Subscribe` is the extension point for plugging custom event handlers into a
//! [`Group`](crate::Group). Each subscriber is driven by a dedicated worker loop
//! fed by a bounded queue owned by the [`SubscriberSet`](crate::SubscriberSet).
//!
//! ## Contract
//! - Implementations may be slow; they do **not** block the group coordinator
//!   nor other subscribers.
//! - Each subscriber declares its preferred queue capacity via
//!   [`Subscribe::queue_capacity`]. If a queue overflows, events for that
//!   subscriber are **dropped** (warn).
//! - [`Subscribe::accepts`] filters by [`EventKind`] before anything is queued,
//!   so a narrow subscriber never fills its queue with events it ignores.
//!
//! ## Example
//! ```rust
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use nuwa::{Event, EventKind, Subscribe};
//!
//! #[derive(Default)]
//! struct StopCounter(AtomicUsize);
//!
//! #[async_trait::async_trait]
//! impl Subscribe for StopCounter {
//!     async fn on_event(&self, _ev: &Event) {
//!         self.0.fetch_add(1, Ordering::SeqCst);
//!     }
//!     fn accepts(&self, kind: EventKind) -> bool {
//!         kind == EventKind::StopFired
//!     }
//!     fn name(&self) -> &'static str { "stop-counter" }
//! }
//! ```

use async_trait::async_trait;

use crate::events::{Event, EventKind};

/// Contract for event subscribers.
///
/// Called from a subscriber-dedicated worker task. Implementations should avoid
/// blocking the async runtime (prefer async I/O and cooperative waits).
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Handle a single event for this subscriber.
    async fn on_event(&self, event: &Event);

    /// Whether events of `kind` should reach [`on_event`](Self::on_event).
    ///
    /// Checked on the coordinator side; keep it cheap. Accepts everything by default.
    fn accepts(&self, kind: EventKind) -> bool {
        let _ = kind;
        true
    }

    /// Human-readable name (for logs).
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Preferred capacity of this subscriber's queue.
    ///
    /// On overflow, events for this subscriber are **dropped** (warn).
    fn queue_capacity(&self) -> usize {
        1024
    }
}
