//! Diagnostics for `rentctl`.
//!
//! Everything `tracing` emits goes to stderr. Stdout carries only the page,
//! so `rentctl -o json bookings list | jq` keeps working with `-vv`.

use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// How chatty the client is, from `-q` / `-v` / `-vv`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Verbosity {
    /// `-q`: errors only.
    Quiet,
    /// Warnings, e.g. a profile that could not be refreshed.
    #[default]
    Normal,
    /// `-v`: API calls and session changes.
    Verbose,
    /// `-vv`: request paths and status codes.
    Trace,
}

impl Verbosity {
    #[must_use]
    pub fn to_level_filter(self) -> Level {
        match self {
            Self::Quiet => Level::ERROR,
            Self::Normal => Level::WARN,
            Self::Verbose => Level::DEBUG,
            Self::Trace => Level::TRACE,
        }
    }

    /// Filter directive used when `RUST_LOG` is unset. Other crates
    /// (reqwest, hyper, rusqlite) never go below warnings.
    #[must_use]
    pub fn directive(self) -> String {
        let others = self.to_level_filter().min(Level::WARN);
        format!(
            "{},rental={}",
            others.as_str().to_lowercase(),
            self.to_level_filter().as_str().to_lowercase()
        )
    }
}

/// Install the stderr subscriber. `RUST_LOG` wins over `verbosity`.
///
/// Calling this twice is harmless; the second call does nothing.
pub fn init_logging(verbosity: Verbosity) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.directive()));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(verbosity >= Verbosity::Verbose),
        )
        .try_init();
}

/// Route test diagnostics through the test harness's captured output.
#[cfg(test)]
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("rental=debug")
        .with_test_writer()
        .try_init();
}
