//! Error types used by the run group, its runners and the binary.
//!
//! This module defines three enums:
//!
//! - [`RunnerError`] errors returned by a single runner's `execute`/`interrupt`.
//! - [`GroupError`] the aggregated outcome of a group run (first error wins).
//! - [`ConfigError`] startup failures that happen before any group is built.
//!
//! All of them provide `as_label` (stable snake_case label) and `as_message`
//! helpers for logs.

use std::time::Duration;
use thiserror::Error;

/// # Errors produced by a runner.
///
/// Returned from [`Runner::execute`](crate::Runner::execute) and
/// [`Runner::interrupt`](crate::Runner::interrupt).
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RunnerError {
    /// The runner's own work failed.
    #[error("execution failed: {error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },

    /// The runner did not finish within the timeout set by [`WithTimeout`](crate::WithTimeout).
    #[error("timed out after {timeout:?}")]
    Timeout {
        /// The timeout duration that was exceeded.
        timeout: Duration,
    },

    /// The runner stopped because the group's stop signal fired.
    ///
    /// Treated as a graceful exit when the group computes its outcome.
    #[error("stopped by group")]
    Canceled,

    /// `execute` or `interrupt` panicked; the panic was caught by the group.
    #[error("panicked: {message}")]
    Panicked {
        /// Panic payload rendered as text.
        message: String,
    },

    /// I/O failure (bind, accept, signal registration).
    #[error("io error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },
}

impl RunnerError {
    /// Shorthand for [`RunnerError::Fail`].
    ///
    /// # Example
    /// ```
    /// use nuwa::RunnerError;
    ///
    /// let err = RunnerError::fail("boom");
    /// assert_eq!(err.to_string(), "execution failed: boom");
    /// ```
    pub fn fail(error: impl Into<String>) -> Self {
        RunnerError::Fail {
            error: error.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            RunnerError::Fail { .. } => "runner_failed",
            RunnerError::Timeout { .. } => "runner_timeout",
            RunnerError::Canceled => "runner_canceled",
            RunnerError::Panicked { .. } => "runner_panicked",
            RunnerError::Io { .. } => "runner_io",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            RunnerError::Fail { error } => format!("error: {error}"),
            RunnerError::Timeout { timeout } => format!("timeout: {timeout:?}"),
            RunnerError::Canceled => "stopped by group".to_string(),
            RunnerError::Panicked { message } => format!("panic: {message}"),
            RunnerError::Io { source } => format!("io: {source}"),
        }
    }

    /// True for [`RunnerError::Canceled`], which the group counts as a clean exit.
    pub fn is_canceled(&self) -> bool {
        matches!(self, RunnerError::Canceled)
    }
}

/// # Aggregated outcome of a group run.
///
/// Carries the error of the **first** runner to exit; errors raised by other
/// runners while shutting down are logged but never replace it.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum GroupError {
    /// The runner that triggered shutdown exited with an error.
    #[error("runner {runner:?} failed: {source}")]
    Runner {
        /// Name of the runner that exited first.
        runner: String,
        /// Its error.
        #[source]
        source: RunnerError,
    },
}

impl GroupError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use nuwa::{GroupError, RunnerError};
    ///
    /// let err = GroupError::Runner { runner: "web".into(), source: RunnerError::fail("boom") };
    /// assert_eq!(err.as_label(), "group_runner_failed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            GroupError::Runner { .. } => "group_runner_failed",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            GroupError::Runner { runner, source } => {
                format!("runner={runner} {}", source.as_message())
            }
        }
    }

    /// Name of the runner whose error became the outcome.
    pub fn runner(&self) -> &str {
        match self {
            GroupError::Runner { runner, .. } => runner,
        }
    }

    /// The runner error that became the outcome.
    pub fn source_error(&self) -> &RunnerError {
        match self {
            GroupError::Runner { source, .. } => source,
        }
    }
}

/// # Startup errors.
///
/// Raised before the group is built; the process reports them and exits.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The `--listen` value is not a usable socket address.
    #[error("invalid listen address {addr:?}: {reason}")]
    InvalidListen {
        /// The rejected value.
        addr: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The global tracing subscriber could not be installed.
    #[error("cannot create log: {reason}")]
    Logging {
        /// Underlying failure.
        reason: String,
    },
}

impl ConfigError {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            ConfigError::InvalidListen { .. } => "config_invalid_listen",
            ConfigError::Logging { .. } => "config_logging",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            ConfigError::InvalidListen { addr, reason } => format!("listen={addr} {reason}"),
            ConfigError::Logging { reason } => format!("logging: {reason}"),
        }
    }
}
