use std::sync::Arc;

use crate::runners::RunnerRef;
use crate::subscribers::Subscribe;

use super::group::Group;

/// Builder for constructing a [`Group`] with runners and subscribers.
#[derive(Default)]
pub struct GroupBuilder {
    runners: Vec<RunnerRef>,
    subscribers: Vec<Arc<dyn Subscribe>>,
}

impl GroupBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one runner.
    pub fn with_runner(mut self, runner: RunnerRef) -> Self {
        self.runners.push(runner);
        self
    }

    /// Appends runners, keeping their order.
    pub fn with_runners(mut self, runners: impl IntoIterator<Item = RunnerRef>) -> Self {
        self.runners.extend(runners);
        self
    }

    /// Sets event subscribers for observability.
    ///
    /// Subscribers receive group events through dedicated workers with bounded
    /// queues; they are flushed before [`Group::run`] returns.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Appends one subscriber.
    pub fn with_subscriber(mut self, subscriber: Arc<dyn Subscribe>) -> Self {
        self.subscribers.push(subscriber);
        self
    }

    /// Builds the group. Nothing is spawned until [`Group::run`].
    pub fn build(self) -> Group {
        Group::from_parts(self.runners, self.subscribers)
    }
}
