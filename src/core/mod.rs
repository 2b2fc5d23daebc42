//! Group core: orchestration and lifecycle.
//!
//! Internal modules:
//! - [`group`]: starts runners, detects the first exit, drains the rest;
//! - [`builder`]: assembles a group from runners and subscribers;
//! - [`stop`]: the one-shot stop latch and its read side;
//! - [`state`]: lifecycle states of one run.

mod builder;
mod group;
mod state;
mod stop;

pub use builder::GroupBuilder;
pub use group::Group;
pub use state::GroupState;
pub use stop::StopSignal;

use std::any::Any;

/// Renders a caught panic payload as text.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
