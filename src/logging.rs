//! Logging initialization.
//!
//! Production mode writes JSON records at `info`; debug mode writes
//! human-readable records with `nuwa` at `debug`. `RUST_LOG` overrides both.

use tracing_subscriber::{EnvFilter, fmt};

use crate::error::ConfigError;

/// Default filter directives for the chosen mode.
pub fn default_directives(debug: bool) -> &'static str {
    if debug { "nuwa=debug,info" } else { "info" }
}

/// Installs the global tracing subscriber.
///
/// Fails if a global subscriber is already installed.
pub fn init(debug: bool) -> Result<(), ConfigError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(debug)));

    let res = if debug {
        fmt().with_env_filter(filter).try_init()
    } else {
        fmt().json().with_env_filter(filter).try_init()
    };
    res.map_err(|e| ConfigError::Logging {
        reason: e.to_string(),
    })
}
