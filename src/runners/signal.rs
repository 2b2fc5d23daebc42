//! # OS signal runner.
//!
//! [`SignalRunner`] returns as soon as the process receives a termination
//! signal, which makes the whole group shut down. It also returns when the
//! group stops for another reason.
//!
//! ## Signals
//! **Unix platforms:**
//! - `SIGINT` (Ctrl-C in terminal)
//! - `SIGTERM` (default kill signal, used by systemd/Kubernetes)
//! - `SIGQUIT` (quit signal, often used for core dumps or hard stop)
//!
//! **Windows platforms:**
//! - `Ctrl-C` via [`tokio::signal::ctrl_c`]

use async_trait::async_trait;

use crate::core::StopSignal;
use crate::error::RunnerError;
use crate::runners::Runner;

/// Exits on SIGINT/SIGTERM/SIGQUIT (Ctrl-C elsewhere).
///
/// A received signal is a clean exit: the group outcome is `Ok(())` unless
/// another runner already failed.
#[derive(Debug, Default)]
pub struct SignalRunner;

impl SignalRunner {
    /// Creates the runner.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Runner for SignalRunner {
    fn name(&self) -> &str {
        "signals"
    }

    async fn execute(&self, stop: StopSignal) -> Result<(), RunnerError> {
        tokio::select! {
            res = wait_for_shutdown_signal() => {
                res?;
                tracing::info!("termination signal received");
                Ok(())
            }
            _ = stop.fired() => Ok(()),
        }
    }
}

/// Waits for a termination signal.
///
/// Each call creates independent signal listeners.
///
/// Returns `Ok(())` when any signal is received, or `Err` if signal registration fails.
#[cfg(unix)]
pub async fn wait_for_shutdown_signal() -> std::io::Result<()> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigquit = signal(SignalKind::quit())?;

    tokio::select! {
        _ = sigint.recv()  => {},
        _ = sigterm.recv() => {},
        _ = sigquit.recv() => {},
    }
    Ok(())
}

/// Waits for a termination signal.
///
/// Each call creates independent signal listeners.
///
/// Returns `Ok(())` when any signal is received, or `Err` if signal registration fails.
#[cfg(not(unix))]
pub async fn wait_for_shutdown_signal() -> std::io::Result<()> {
    tokio::signal::ctrl_c().await
}
