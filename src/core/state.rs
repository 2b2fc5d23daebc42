//! # Group lifecycle states.
//!
//! ```text
//! Idle ──run()──► Running ──first exit──► ShuttingDown ──last exit──► Drained
//! ```
//!
//! A run with no runners goes `Idle → Running → Drained`.

use std::fmt;

/// State of one group execution. Observable through [`Group::state`](crate::Group::state).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GroupState {
    /// Built, runners may still be added.
    #[default]
    Idle,
    /// Runners spawned; waiting for the first exit.
    Running,
    /// Stop fired; waiting for the remaining runners.
    ShuttingDown,
    /// Every runner returned; the outcome has been produced.
    Drained,
}

impl GroupState {
    /// Returns a short stable label for logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            GroupState::Idle => "idle",
            GroupState::Running => "running",
            GroupState::ShuttingDown => "shutting_down",
            GroupState::Drained => "drained",
        }
    }

    /// True if `next` is a legal successor of `self`.
    pub fn can_advance_to(&self, next: GroupState) -> bool {
        matches!(
            (self, next),
            (GroupState::Idle, GroupState::Running)
                | (GroupState::Running, GroupState::ShuttingDown)
                | (GroupState::Running, GroupState::Drained)
                | (GroupState::ShuttingDown, GroupState::Drained)
        )
    }
}

impl fmt::Display for GroupState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_forward_transitions_are_legal() {
        use GroupState::*;
        assert!(Idle.can_advance_to(Running));
        assert!(Running.can_advance_to(ShuttingDown));
        assert!(Running.can_advance_to(Drained));
        assert!(ShuttingDown.can_advance_to(Drained));

        assert!(!Idle.can_advance_to(ShuttingDown));
        assert!(!Drained.can_advance_to(Running));
        assert!(!ShuttingDown.can_advance_to(Running));
        assert!(!Drained.can_advance_to(Drained));
    }

    #[test]
    fn default_is_idle() {
        assert_eq!(GroupState::default(), GroupState::Idle);
        assert_eq!(GroupState::ShuttingDown.to_string(), "shutting_down");
    }
}
