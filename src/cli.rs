//! Command-line interface definitions.
//!
//! Every flag can also be supplied through a `NUWA_*` environment variable;
//! an explicit flag wins over the environment.

use clap::Parser;

/// Default address of the health endpoint.
pub const DEFAULT_LISTEN: &str = ":10086";

/// Automatically cordons and drains nodes that match the supplied conditions.
#[derive(Parser, Debug, Clone)]
#[command(name = "nuwa")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Run with debug logging
    #[arg(short, long, env = "NUWA_DEBUG", default_value_t = false)]
    pub debug: bool,

    /// Address at which to expose /healthz
    #[arg(long, env = "NUWA_LISTEN", default_value = DEFAULT_LISTEN)]
    pub listen: String,
}
