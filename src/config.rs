//! # Validated process configuration.
//!
//! [`Config`] is built from the parsed [`Cli`] before anything else runs; a
//! failure here is a startup error and the group is never built.
//!
//! ## Listen address forms
//! - `:10086` → all interfaces (`0.0.0.0:10086`)
//! - `127.0.0.1:10086`, `[::1]:10086` → as given
//! - host names are rejected (no resolution at startup)

use std::net::SocketAddr;

use crate::cli::Cli;
use crate::error::ConfigError;

/// Process configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Address of the health endpoint.
    pub listen: SocketAddr,
    /// Verbose development logging.
    pub debug: bool,
}

impl Config {
    /// Validates the command line.
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        Ok(Self {
            listen: parse_listen(&cli.listen)?,
            debug: cli.debug,
        })
    }
}

/// Parses a listen address, accepting the `:port` shorthand for all interfaces.
pub fn parse_listen(raw: &str) -> Result<SocketAddr, ConfigError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(invalid(raw, "empty address"));
    }

    let full = match trimmed.strip_prefix(':') {
        Some(port) => format!("0.0.0.0:{port}"),
        None => trimmed.to_string(),
    };
    full.parse::<SocketAddr>()
        .map_err(|e| invalid(raw, &e.to_string()))
}

fn invalid(addr: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidListen {
        addr: addr.to_string(),
        reason: reason.to_string(),
    }
}
