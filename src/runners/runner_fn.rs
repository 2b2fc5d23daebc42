//! # Function-backed runner (`RunnerFn`)
//!
//! [`RunnerFn`] wraps a closure `F: Fn(StopSignal) -> Fut`, producing a fresh
//! future per `execute`. An interrupt callback can be attached with
//! [`RunnerFn::with_interrupt`] for work that blocks on something other than
//! the stop signal.
//!
//! ## Example
//! ```rust
//! use nuwa::{RunnerFn, RunnerRef, RunnerError, StopSignal};
//!
//! let r: RunnerRef = RunnerFn::arc("worker", |stop: StopSignal| async move {
//!     stop.fired().await;
//!     Ok::<_, RunnerError>(())
//! });
//!
//! assert_eq!(r.name(), "worker");
//! ```

use std::borrow::Cow;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::core::StopSignal;
use crate::error::RunnerError;
use crate::runners::runner::Runner;

type InterruptFn = Box<dyn Fn(Option<&RunnerError>) -> Result<(), RunnerError> + Send + Sync>;

/// Function-backed runner implementation.
pub struct RunnerFn<F> {
    name: Cow<'static, str>,
    f: F,
    interrupt: Option<InterruptFn>,
}

impl<F> RunnerFn<F> {
    /// Creates a new function-backed runner.
    ///
    /// Prefer [`RunnerFn::arc`] when you immediately need a [`RunnerRef`](crate::RunnerRef).
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
            interrupt: None,
        }
    }

    /// Creates the runner and returns it as a shared handle.
    pub fn arc(name: impl Into<Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }

    /// Attaches an interrupt callback, called once by the group after it fires
    /// the stop signal.
    pub fn with_interrupt<I>(mut self, interrupt: I) -> Self
    where
        I: Fn(Option<&RunnerError>) -> Result<(), RunnerError> + Send + Sync + 'static,
    {
        self.interrupt = Some(Box::new(interrupt));
        self
    }
}

impl<F> fmt::Debug for RunnerFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunnerFn")
            .field("name", &self.name)
            .field("interrupt", &self.interrupt.is_some())
            .finish()
    }
}

#[async_trait]
impl<F, Fut> Runner for RunnerFn<F>
where
    F: Fn(StopSignal) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), RunnerError>> + Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn execute(&self, stop: StopSignal) -> Result<(), RunnerError> {
        (self.f)(stop).await
    }

    fn interrupt(&self, cause: Option<&RunnerError>) -> Result<(), RunnerError> {
        match &self.interrupt {
            Some(interrupt) => interrupt(cause),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[tokio::test]
    async fn executes_closure_with_signal() {
        let r = RunnerFn::new("once", |stop: StopSignal| async move {
            assert!(!stop.is_fired());
            Err::<(), _>(RunnerError::fail("done"))
        });
        let err = r.execute(StopSignal::never()).await.unwrap_err();
        assert!(matches!(err, RunnerError::Fail { error } if error == "done"));
    }

    #[test]
    fn interrupt_defaults_to_noop_and_forwards_cause() {
        let calls = Arc::new(AtomicUsize::new(0));
        let plain = RunnerFn::new("plain", |_stop: StopSignal| async { Ok::<(), RunnerError>(()) });
        assert!(plain.interrupt(None).is_ok());

        let seen = Arc::clone(&calls);
        let hooked = RunnerFn::new("hooked", |_stop: StopSignal| async { Ok::<(), RunnerError>(()) })
            .with_interrupt(move |cause| {
                seen.fetch_add(1, Ordering::SeqCst);
                match cause {
                    Some(RunnerError::Fail { error }) if error == "boom" => Ok(()),
                    other => Err(RunnerError::fail(format!("unexpected cause: {other:?}"))),
                }
            });
        assert!(hooked.interrupt(Some(&RunnerError::fail("boom"))).is_ok());
        assert!(hooked.interrupt(None).is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(format!("{hooked:?}"), r#"RunnerFn { name: "hooked", interrupt: true }"#);
    }
}
