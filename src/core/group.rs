//! # Group: start everything, stop everything when one stops.
//!
//! The [`Group`] owns a list of [`Runner`](crate::Runner)s. [`Group::run`]
//! starts all of them concurrently, waits for the first one to return, fires the
//! shared stop signal exactly once, interrupts every runner, waits for all of
//! them to return, and yields the error of the runner that returned first.
//!
//! ## High-level architecture
//! ```text
//! Inputs to run():
//!   runners[0..N]  ──►  launch list: (index, RunnerRef, StopSignal)   (built before any spawn)
//!
//! Start:                                                     state: Idle → Running
//!   launch[0]  launch[1]  ...  launch[N-1]
//!       └──► JoinSet::spawn(catch_unwind(runner.execute(stop)))
//!
//! First exit:                                                state: Running → ShuttingDown
//!   join_next() ──► latch.fire()               (exactly once) ─► StopFired
//!               ──► runner.interrupt(cause)    (registration order, errors logged)
//!               ──► outcome.record(exit)       (first writer decides the outcome)
//!
//! Drain:                                                     state: ShuttingDown → Drained
//!   while join_next() ─► outcome.record(exit)  (ignored: shutdown exits never win)
//!   subscribers.shutdown()                     (flush queued events)
//!   return outcome
//! ```
//!
//! ## Rules
//! - The coordinator looks at completions only after every runner is spawned.
//! - `run` returns only after every `execute` returned; there is no grace
//!   timeout, a runner that ignores the stop signal blocks the group.
//! - `Err(RunnerError::Canceled)` counts as a clean exit.
//! - A run with no runners returns `Ok(())` without firing the stop signal.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use nuwa::{Group, RunnerError, RunnerFn, RunnerRef, StopSignal};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let mut group = Group::new();
//!
//!     let job: RunnerRef = RunnerFn::arc("job", |_stop: StopSignal| async move {
//!         tokio::time::sleep(Duration::from_millis(10)).await;
//!         Ok::<(), RunnerError>(())
//!     });
//!     let server: RunnerRef = RunnerFn::arc("server", |stop: StopSignal| async move {
//!         stop.fired().await;
//!         Ok::<(), RunnerError>(())
//!     });
//!     group.add(job);
//!     group.add(server);
//!
//!     assert!(group.run().await.is_ok());
//! }
//! ```

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tokio::sync::watch;
use tokio::task::JoinSet;

use crate::core::builder::GroupBuilder;
use crate::core::panic_message;
use crate::core::state::GroupState;
use crate::core::stop::{StopLatch, StopSignal};
use crate::error::{GroupError, RunnerError};
use crate::events::{Event, EventKind};
use crate::runners::RunnerRef;
use crate::subscribers::{Subscribe, SubscriberSet};

/// Runs a set of runners with all-stop-on-first-exit semantics.
pub struct Group {
    runners: Vec<RunnerRef>,
    subscribers: Vec<Arc<dyn Subscribe>>,
    state: watch::Sender<GroupState>,
}

impl Group {
    /// Creates an empty group without subscribers.
    pub fn new() -> Self {
        GroupBuilder::new().build()
    }

    /// Starts a [`GroupBuilder`].
    pub fn builder() -> GroupBuilder {
        GroupBuilder::new()
    }

    pub(crate) fn from_parts(
        runners: Vec<RunnerRef>,
        subscribers: Vec<Arc<dyn Subscribe>>,
    ) -> Self {
        let (state, _rx) = watch::channel(GroupState::Idle);
        Self {
            runners,
            subscribers,
            state,
        }
    }

    /// Registers a runner. Runners start, and are interrupted, in registration order.
    ///
    /// [`run`](Self::run) consumes the group, so nothing can be added once it started.
    pub fn add(&mut self, runner: RunnerRef) -> &mut Self {
        self.runners.push(runner);
        self
    }

    /// Number of registered runners.
    pub fn len(&self) -> usize {
        self.runners.len()
    }

    /// True if no runner is registered.
    pub fn is_empty(&self) -> bool {
        self.runners.is_empty()
    }

    /// Names of the registered runners, in registration order.
    pub fn runner_names(&self) -> Vec<String> {
        self.runners.iter().map(|r| r.name().to_string()).collect()
    }

    /// Watches the lifecycle state of this group.
    ///
    /// Take the receiver before calling [`run`](Self::run); it keeps working
    /// after the group is consumed and ends on [`GroupState::Drained`].
    pub fn state(&self) -> watch::Receiver<GroupState> {
        self.state.subscribe()
    }

    /// Runs every registered runner until all of them returned.
    ///
    /// ### Flow
    /// 1. Spawn every runner with a clone of the shared [`StopSignal`]
    /// 2. Wait for the first runner to return; its result decides the outcome
    /// 3. Fire the stop signal once, then call `interrupt` on every runner
    /// 4. Wait for the remaining runners; their errors are published, not returned
    ///
    /// ### Returns
    /// - `Ok(())` if the first runner to return exited cleanly (or with `Canceled`)
    /// - `Err(GroupError::Runner)` carrying the first runner's error otherwise
    pub async fn run(self) -> Result<(), GroupError> {
        let Group {
            runners,
            subscribers,
            state,
        } = self;
        let mut life = Lifecycle {
            state,
            subs: SubscriberSet::new(subscribers),
        };

        life.advance(GroupState::Running);
        life.emit(Event::new(EventKind::GroupStarting).with_runners(runners.len()));

        if runners.is_empty() {
            return life.finish(0, Outcome::default()).await;
        }

        let latch = StopLatch::new();
        let launches: Vec<Launch> = runners
            .iter()
            .enumerate()
            .map(|(index, runner)| Launch {
                index,
                runner: Arc::clone(runner),
                stop: latch.signal(),
            })
            .collect();

        let mut set = JoinSet::new();
        for launch in launches {
            life.emit(
                Event::new(EventKind::RunnerStarting)
                    .with_runner(launch.runner.name())
                    .with_index(launch.index),
            );
            set.spawn(launch.execute());
        }

        let mut outcome = Outcome::default();

        if let Some(first) = next_exit(&mut set).await {
            life.emit(first.event(false));
            life.advance(GroupState::ShuttingDown);
            broadcast_stop(&latch, &runners, &first, &life);
            outcome.record(first);
        }

        while let Some(exit) = next_exit(&mut set).await {
            life.emit(exit.event(true));
            outcome.record(exit);
        }

        life.finish(runners.len(), outcome).await
    }
}

impl Default for Group {
    fn default() -> Self {
        Self::new()
    }
}

/// Fires the latch and, if this call won, interrupts every runner.
fn broadcast_stop(latch: &StopLatch, runners: &[RunnerRef], trigger: &Exit, life: &Lifecycle) {
    if !latch.fire() {
        return;
    }

    let mut fired = Event::new(EventKind::StopFired).with_runner(Arc::clone(&trigger.runner));
    if let Some(index) = trigger.index {
        fired = fired.with_index(index);
    }
    if let Err(e) = &trigger.result {
        fired = fired.with_reason(e.to_string());
    }
    life.emit(fired);

    let cause = trigger.result.as_ref().err();
    for (index, runner) in runners.iter().enumerate() {
        let res = std::panic::catch_unwind(AssertUnwindSafe(|| runner.interrupt(cause)))
            .unwrap_or_else(|panic| {
                Err(RunnerError::Panicked {
                    message: panic_message(panic.as_ref()),
                })
            });
        if let Err(e) = res {
            life.emit(
                Event::new(EventKind::InterruptFailed)
                    .with_runner(runner.name())
                    .with_index(index)
                    .with_reason(e.to_string()),
            );
        }
    }
}

/// Awaits the next runner completion.
async fn next_exit(set: &mut JoinSet<Exit>) -> Option<Exit> {
    match set.join_next().await? {
        Ok(exit) => Some(exit),
        // Panics are caught inside the task; this only happens when the runtime shuts down.
        Err(join_err) => Some(Exit {
            index: None,
            runner: Arc::from("unknown"),
            result: Err(RunnerError::Panicked {
                message: join_err.to_string(),
            }),
        }),
    }
}

/// One runner bound to its own index and signal before anything is spawned.
struct Launch {
    index: usize,
    runner: RunnerRef,
    stop: StopSignal,
}

impl Launch {
    async fn execute(self) -> Exit {
        let Launch {
            index,
            runner,
            stop,
        } = self;

        let result = match AssertUnwindSafe(runner.execute(stop)).catch_unwind().await {
            Ok(res) => res,
            Err(panic) => Err(RunnerError::Panicked {
                message: panic_message(panic.as_ref()),
            }),
        };

        Exit {
            index: Some(index),
            runner: Arc::from(runner.name()),
            result,
        }
    }
}

/// Result of one runner's `execute`.
struct Exit {
    index: Option<usize>,
    runner: Arc<str>,
    result: Result<(), RunnerError>,
}

impl Exit {
    fn event(&self, shutdown: bool) -> Event {
        let kind = match &self.result {
            Ok(()) | Err(RunnerError::Canceled) => EventKind::RunnerExited,
            Err(_) => EventKind::RunnerFailed,
        };
        let mut ev = Event::new(kind).with_runner(Arc::clone(&self.runner));
        if let Some(index) = self.index {
            ev = ev.with_index(index);
        }
        if let (EventKind::RunnerFailed, Err(e)) = (kind, &self.result) {
            ev = ev.with_reason(e.to_string());
        }
        if shutdown {
            ev = ev.during_shutdown();
        }
        ev
    }
}

/// First-writer-wins outcome slot.
///
/// The first recorded exit decides the outcome, clean or not; later exits
/// never change it.
#[derive(Default)]
struct Outcome {
    decided: bool,
    error: Option<GroupError>,
}

impl Outcome {
    /// Returns `true` if this exit decided the outcome.
    fn record(&mut self, exit: Exit) -> bool {
        if self.decided {
            return false;
        }
        self.decided = true;
        self.error = match exit.result {
            Ok(()) | Err(RunnerError::Canceled) => None,
            Err(source) => Some(GroupError::Runner {
                runner: exit.runner.to_string(),
                source,
            }),
        };
        true
    }

    fn into_result(self) -> Result<(), GroupError> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

/// State publisher and event sink for one run.
struct Lifecycle {
    state: watch::Sender<GroupState>,
    subs: SubscriberSet,
}

impl Lifecycle {
    fn advance(&mut self, next: GroupState) {
        let prev = *self.state.borrow();
        debug_assert!(prev.can_advance_to(next), "illegal transition {prev} -> {next}");
        tracing::trace!(from = %prev, to = %next, "group state");
        self.state.send_replace(next);
    }

    fn emit(&self, ev: Event) {
        self.subs.emit(&ev);
    }

    async fn finish(mut self, runners: usize, outcome: Outcome) -> Result<(), GroupError> {
        self.advance(GroupState::Drained);
        let mut drained = Event::new(EventKind::GroupDrained).with_runners(runners);
        if let Some(e) = &outcome.error {
            drained = drained.with_reason(e.to_string());
        }
        self.emit(drained);
        self.subs.shutdown().await;
        outcome.into_result()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;

    use super::*;
    use crate::runners::{Runner, RunnerFn};

    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<Event>>,
    }

    impl Recorder {
        fn kinds(&self) -> Vec<EventKind> {
            self.events.lock().unwrap().iter().map(|e| e.kind).collect()
        }

        fn count(&self, kind: EventKind) -> usize {
            self.kinds().into_iter().filter(|k| *k == kind).count()
        }

        fn find(&self, kind: EventKind, runner: &str) -> Option<Event> {
            self.events
                .lock()
                .unwrap()
                .iter()
                .find(|e| e.kind == kind && e.runner.as_deref() == Some(runner))
                .cloned()
        }
    }

    #[async_trait]
    impl Subscribe for Recorder {
        async fn on_event(&self, ev: &Event) {
            self.events.lock().unwrap().push(ev.clone());
        }

        fn name(&self) -> &'static str {
            "recorder"
        }
    }

    /// Waits for the stop signal, then returns cleanly.
    fn waiter(name: &'static str) -> RunnerRef {
        RunnerFn::arc(name, |stop: StopSignal| async move {
            stop.fired().await;
            Ok::<(), RunnerError>(())
        })
    }

    /// Returns `err` right away.
    fn failing(name: &'static str, err: &'static str) -> RunnerRef {
        RunnerFn::arc(name, move |_stop: StopSignal| async move {
            Err::<(), _>(RunnerError::fail(err))
        })
    }

    struct Panicking;

    #[async_trait]
    impl Runner for Panicking {
        fn name(&self) -> &str {
            "panicking"
        }

        async fn execute(&self, _stop: StopSignal) -> Result<(), RunnerError> {
            let explode = true;
            if explode {
                panic!("kaboom");
            }
            Ok(())
        }
    }

    fn recorded(runners: Vec<RunnerRef>) -> (Group, Arc<Recorder>) {
        let rec = Arc::new(Recorder::default());
        let group = Group::builder()
            .with_runners(runners)
            .with_subscriber(rec.clone())
            .build();
        (group, rec)
    }

    #[tokio::test(start_paused = true)]
    async fn finished_job_stops_blocking_server() {
        let observed = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&observed);

        let job: RunnerRef = RunnerFn::arc("job", |_stop: StopSignal| async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            Ok::<(), RunnerError>(())
        });
        let server: RunnerRef = RunnerFn::arc("server", move |stop: StopSignal| {
            let seen = Arc::clone(&seen);
            async move {
                stop.fired().await;
                seen.fetch_add(1, Ordering::SeqCst);
                Ok::<(), RunnerError>(())
            }
        });

        let (group, rec) = recorded(vec![job, server]);
        let started = tokio::time::Instant::now();
        assert!(group.run().await.is_ok());
        assert_eq!(started.elapsed(), Duration::from_millis(10));
        assert_eq!(observed.load(Ordering::SeqCst), 1);

        let fired = rec.find(EventKind::StopFired, "job").expect("stop fired by job");
        assert_eq!(fired.index, Some(0));
        assert!(fired.reason.is_none());
        assert!(rec.find(EventKind::RunnerExited, "server").unwrap().shutdown);
    }

    #[tokio::test]
    async fn failing_runner_decides_outcome_and_interrupts_others() {
        let stops = Arc::new(AtomicUsize::new(0));
        let interrupts = Arc::new(AtomicUsize::new(0));

        let stop_seen = Arc::clone(&stops);
        let interrupted = Arc::clone(&interrupts);
        let b = RunnerFn::new("b", move |stop: StopSignal| {
            let stop_seen = Arc::clone(&stop_seen);
            async move {
                stop.fired().await;
                stop_seen.fetch_add(1, Ordering::SeqCst);
                Ok::<(), RunnerError>(())
            }
        })
        .with_interrupt(move |cause| {
            interrupted.fetch_add(1, Ordering::SeqCst);
            match cause {
                Some(RunnerError::Fail { error }) if error == "boom" => Ok(()),
                other => Err(RunnerError::fail(format!("unexpected cause {other:?}"))),
            }
        });

        let b: RunnerRef = Arc::new(b);
        let (group, rec) = recorded(vec![failing("a", "boom"), b]);
        let err = group.run().await.unwrap_err();

        assert_eq!(err.runner(), "a");
        assert!(matches!(err.source_error(), RunnerError::Fail { error } if error == "boom"));
        assert_eq!(stops.load(Ordering::SeqCst), 1);
        assert_eq!(interrupts.load(Ordering::SeqCst), 1);
        assert_eq!(rec.count(EventKind::InterruptFailed), 0);

        let fired = rec.find(EventKind::StopFired, "a").unwrap();
        assert_eq!(fired.reason.as_deref(), Some("execution failed: boom"));
    }

    #[tokio::test]
    async fn shutdown_errors_never_replace_the_first() {
        let b: RunnerRef = RunnerFn::arc("b", |stop: StopSignal| async move {
            stop.fired().await;
            Err::<(), _>(RunnerError::fail("E2"))
        });

        let (group, rec) = recorded(vec![failing("a", "E1"), b]);
        let err = group.run().await.unwrap_err();

        assert_eq!(err.runner(), "a");
        assert_eq!(err.to_string(), r#"runner "a" failed: execution failed: E1"#);

        let first = rec.find(EventKind::RunnerFailed, "a").unwrap();
        assert!(!first.shutdown);
        let late = rec.find(EventKind::RunnerFailed, "b").unwrap();
        assert!(late.shutdown);
        assert_eq!(late.reason.as_deref(), Some("execution failed: E2"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn simultaneous_exits_fire_stop_once() {
        let runners: Vec<RunnerRef> = (0..16)
            .map(|i| {
                RunnerFn::arc(format!("r{i}"), move |_stop: StopSignal| async move {
                    Err::<(), _>(RunnerError::fail(format!("e{i}")))
                }) as RunnerRef
            })
            .collect();

        let (group, rec) = recorded(runners);
        let err = group.run().await.unwrap_err();

        assert_eq!(rec.count(EventKind::StopFired), 1);
        assert_eq!(rec.count(EventKind::RunnerFailed), 16);
        let winner = rec
            .kinds()
            .iter()
            .position(|k| *k == EventKind::StopFired)
            .map(|at| rec.events.lock().unwrap()[at].clone())
            .unwrap();
        assert_eq!(winner.runner.as_deref(), Some(err.runner()));
    }

    #[tokio::test]
    async fn every_runner_returns_before_run_does() {
        let done = Arc::new(AtomicUsize::new(0));
        let mut group = Group::new();
        for i in 0..5u64 {
            let done = Arc::clone(&done);
            group.add(RunnerFn::arc(format!("slow{i}"), move |stop: StopSignal| {
                let done = Arc::clone(&done);
                async move {
                    stop.fired().await;
                    tokio::time::sleep(Duration::from_millis(5 * i)).await;
                    done.fetch_add(1, Ordering::SeqCst);
                    Ok::<(), RunnerError>(())
                }
            }));
        }
        group.add(RunnerFn::arc("trigger", |_stop: StopSignal| async {
            Ok::<(), RunnerError>(())
        }));
        assert_eq!(group.len(), 6);

        group.run().await.unwrap();
        assert_eq!(done.load(Ordering::SeqCst), 5);
    }

    #[tokio::test]
    async fn empty_group_is_ok_without_stop() {
        let (group, rec) = recorded(Vec::new());
        assert!(group.is_empty());
        let state = group.state();

        assert!(group.run().await.is_ok());
        assert_eq!(*state.borrow(), GroupState::Drained);
        assert_eq!(
            rec.kinds(),
            vec![EventKind::GroupStarting, EventKind::GroupDrained]
        );
    }

    #[tokio::test]
    async fn panicking_runner_is_reported() {
        let panicking: RunnerRef = Arc::new(Panicking);
        let (group, rec) = recorded(vec![panicking, waiter("other")]);
        let err = group.run().await.unwrap_err();

        assert_eq!(err.runner(), "panicking");
        assert!(
            matches!(err.source_error(), RunnerError::Panicked { message } if message == "kaboom")
        );
        assert!(rec.find(EventKind::RunnerExited, "other").is_some());
    }

    #[tokio::test]
    async fn interrupt_failures_are_published_not_returned() {
        let order = Arc::new(Mutex::new(Vec::new()));

        let log = Arc::clone(&order);
        let refuses = RunnerFn::new("refuses", |stop: StopSignal| async move {
            stop.fired().await;
            Ok::<(), RunnerError>(())
        })
        .with_interrupt(move |_cause| {
            log.lock().unwrap().push("refuses");
            Err(RunnerError::fail("no"))
        });

        let log = Arc::clone(&order);
        let explodes = RunnerFn::new("explodes", |stop: StopSignal| async move {
            stop.fired().await;
            Ok::<(), RunnerError>(())
        })
        .with_interrupt(move |_cause| {
            log.lock().unwrap().push("explodes");
            panic!("interrupt exploded")
        });

        let done: RunnerRef = RunnerFn::arc("done", |_stop: StopSignal| async {
            Ok::<(), RunnerError>(())
        });

        let runners: Vec<RunnerRef> = vec![Arc::new(refuses), Arc::new(explodes), done];
        let (group, rec) = recorded(runners);
        assert!(group.run().await.is_ok());

        assert_eq!(*order.lock().unwrap(), vec!["refuses", "explodes"]);
        assert_eq!(rec.count(EventKind::InterruptFailed), 2);
        assert_eq!(
            rec.find(EventKind::InterruptFailed, "refuses").unwrap().reason.as_deref(),
            Some("execution failed: no")
        );

        let kinds = rec.kinds();
        let fired = kinds.iter().position(|k| *k == EventKind::StopFired).unwrap();
        let failed = kinds.iter().position(|k| *k == EventKind::InterruptFailed).unwrap();
        assert!(fired < failed);
    }

    #[tokio::test]
    async fn canceled_counts_as_clean_exit() {
        let canceled: RunnerRef = RunnerFn::arc("canceled", |_stop: StopSignal| async {
            Err::<(), _>(RunnerError::Canceled)
        });
        let (group, rec) = recorded(vec![canceled, waiter("server")]);

        assert!(group.run().await.is_ok());
        assert!(rec.find(EventKind::RunnerExited, "canceled").is_some());
        assert_eq!(rec.count(EventKind::RunnerFailed), 0);
    }

    #[tokio::test]
    async fn state_walks_through_the_lifecycle() {
        let (group, _rec) = recorded(vec![waiter("w"), failing("f", "x")]);
        let mut state = group.state();
        assert_eq!(*state.borrow_and_update(), GroupState::Idle);

        let run = tokio::spawn(group.run());
        let mut last = GroupState::Idle;
        while state.changed().await.is_ok() {
            let next = *state.borrow_and_update();
            assert_ne!(next, GroupState::Idle, "state went back to idle");
            last = next;
        }
        assert!(run.await.unwrap().is_err());
        assert_eq!(last, GroupState::Drained);
    }

    #[test]
    fn add_keeps_registration_order() {
        let mut added = Group::default();
        added.add(waiter("a")).add(waiter("b"));
        assert_eq!(added.runner_names(), vec!["a", "b"]);

        let group = Group::builder()
            .with_runners([waiter("x")])
            .with_runner(waiter("y"))
            .build();
        assert_eq!(group.runner_names(), vec!["x", "y"]);
        assert_eq!(group.len(), 2);
    }

    #[test]
    fn outcome_is_decided_by_first_record() {
        let mut outcome = Outcome::default();
        let exit = |runner: &str, result| Exit {
            index: Some(0),
            runner: Arc::from(runner),
            result,
        };
        assert!(outcome.record(exit("clean", Ok(()))));
        assert!(!outcome.record(exit("late", Err(RunnerError::fail("ignored")))));
        assert!(outcome.into_result().is_ok());
    }
}
