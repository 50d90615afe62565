//! Command-line and environment configuration for the `fintola` binary.
//!
//! | Option | Environment | Default |
//! |--------|-------------|---------|
//! | `--addr` | `FINTOLA_ADDR` | `0.0.0.0:8001` |
//! | `--upstream-timeout-ms` | `FINTOLA_UPSTREAM_TIMEOUT_MS` | `10000` |
//! | `--user-agent` | `FINTOLA_USER_AGENT` | `fintola/<version>` |
//!
//! Logging is configured separately through `FINTOLA_LOG` and
//! `FINTOLA_LOG_FORMAT`, see [`crate::logging`].

use std::net::SocketAddr;

use clap::Parser;
use fintola_core::DEFAULT_TIMEOUT_MS;

/// Quote proxy over Yahoo Finance.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "fintola",
    version,
    about = "Quote and chart proxy over Yahoo Finance"
)]
pub struct Config {
    /// Socket address to listen on.
    #[arg(long, env = "FINTOLA_ADDR", default_value = "0.0.0.0:8001")]
    pub addr: SocketAddr,

    /// Timeout for each upstream request in milliseconds.
    #[arg(
        long,
        env = "FINTOLA_UPSTREAM_TIMEOUT_MS",
        default_value_t = DEFAULT_TIMEOUT_MS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub upstream_timeout_ms: u64,

    /// User-Agent sent to Yahoo.
    #[arg(
        long,
        env = "FINTOLA_USER_AGENT",
        default_value = concat!("fintola/", env!("CARGO_PKG_VERSION"))
    )]
    pub user_agent: String,
}
