//! # nuwa
//!
//! **nuwa** is meant to cordon and drain cluster nodes that match supplied
//! conditions. Today it ships the process skeleton: a health endpoint, signal
//! handling, and the piece everything else plugs into, the run [`Group`].
//!
//! A [`Group`] starts several independent [`Runner`]s concurrently, waits for
//! any one of them to return, tells all the others to stop, waits for them to
//! finish, and reports the error of the runner that returned first.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │  HttpRunner  │   │ SignalRunner │   │   RunnerFn   │
//!     │  (/healthz)  │   │ (SIGTERM...) │   │ (user work)  │
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!            ▼                  ▼                  ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Group (run coordinator)                                          │
//! │  - StopLatch (one-shot stop signal, fired exactly once)           │
//! │  - JoinSet (one tokio task per runner)                            │
//! │  - Outcome (first exit decides the result)                        │
//! │  - SubscriberSet (fans events out to subscribers)                 │
//! └──────┬──────────────────┬──────────────────┬───────────────┬──────┘
//!        ▼                  ▼                  ▼               │
//!   execute(stop)      execute(stop)      execute(stop)        │ Event
//!        │                  │                  │               ▼
//!        └──── first return ┴─► fire stop ─► interrupt all   LogWriter
//!                                           ─► drain all      (tracing)
//! ```
//!
//! ### Lifecycle
//! ```text
//! Idle ──run()──► Running ──first exit──► ShuttingDown ──last exit──► Drained
//!
//! run():
//!   ├─► spawn every runner with a clone of the StopSignal
//!   ├─► first = join_next()                  (any runner, clean or failed)
//!   ├─► latch.fire()                         (exactly once) ─► StopFired
//!   ├─► runner.interrupt(cause) for all      (errors logged, never returned)
//!   ├─► while join_next() { log shutdown exits }
//!   └─► return first's error (or Ok)
//! ```
//!
//! ## Features
//! | Area              | Description                                               | Key types / traits                       |
//! |-------------------|-----------------------------------------------------------|------------------------------------------|
//! | **Orchestration** | Start-all, stop-all-on-first-exit, drain, first error.    | [`Group`], [`GroupBuilder`], [`GroupState`] |
//! | **Runners**       | Contract and ready-made adapters.                         | [`Runner`], [`RunnerFn`], [`WithTimeout`], [`HttpRunner`], [`SignalRunner`] |
//! | **Stop signal**   | One-shot broadcast observed by every runner.              | [`StopSignal`]                           |
//! | **Events**        | Lifecycle events fanned out to subscribers.               | [`Event`], [`EventKind`], [`Subscribe`], `LogWriter` |
//! | **Errors**        | Typed errors for runners, the group and startup.          | [`RunnerError`], [`GroupError`], [`ConfigError`] |
//! | **Process**       | CLI flags, validated config, logging setup.               | [`Cli`], [`Config`], [`logging`]         |
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use nuwa::{Group, RunnerError, RunnerFn, RunnerRef, StopSignal};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Returns on its own after a short while: this triggers shutdown.
//!     let job: RunnerRef = RunnerFn::arc("job", |_stop: StopSignal| async move {
//!         tokio::time::sleep(Duration::from_millis(10)).await;
//!         Ok::<(), RunnerError>(())
//!     });
//!
//!     // Runs until told to stop.
//!     let server: RunnerRef = RunnerFn::arc("server", |stop: StopSignal| async move {
//!         stop.fired().await;
//!         Ok::<(), RunnerError>(())
//!     });
//!
//!     let builder = Group::builder().with_runner(job).with_runner(server);
//!
//!     #[cfg(feature = "logging")]
//!     let builder = builder.with_subscriber(Arc::new(nuwa::LogWriter::new()));
//!
//!     let group = builder.build();
//!
//!     group.run().await?;
//!     Ok(())
//! }
//! ```

mod cli;
mod config;
mod core;
mod error;
mod events;
pub mod logging;
mod runners;
mod subscribers;

// ---- Public re-exports ----

pub use cli::{Cli, DEFAULT_LISTEN};
pub use config::{Config, parse_listen};
pub use core::{Group, GroupBuilder, GroupState, StopSignal};
pub use error::{ConfigError, GroupError, RunnerError};
pub use events::{Event, EventKind};
pub use runners::{
    HEALTHZ_PATH, HttpRunner, Runner, RunnerFn, RunnerRef, SignalRunner, WithTimeout,
    health_router, wait_for_shutdown_signal,
};
pub use subscribers::{Subscribe, SubscriberSet};

// Built-in subscriber that writes group events through `tracing`.
// Enabled by default; disable with `default-features = false`.
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
