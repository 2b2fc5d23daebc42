//! # Runner abstraction and adapters.
//!
//! This module provides the runner-related types:
//! - [`Runner`] - trait for long-running units that honour a stop signal
//! - [`RunnerRef`] - shared reference to a runner (`Arc<dyn Runner>`)
//! - [`RunnerFn`] - closure-backed runner with an optional interrupt hook
//! - [`WithTimeout`] - caller-side execution deadline
//! - [`HttpRunner`] / [`health_router`] - axum server with `GET /healthz`
//! - [`SignalRunner`] - exits on process termination signals

mod http;
mod runner;
mod runner_fn;
mod signal;
mod timeout;

pub use http::{HEALTHZ_PATH, HttpRunner, health_router};
pub use runner::{Runner, RunnerRef};
pub use runner_fn::RunnerFn;
pub use signal::{SignalRunner, wait_for_shutdown_signal};
pub use timeout::WithTimeout;
