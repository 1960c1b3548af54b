//! crates/logging/src/subscriber.rs
//! Global subscriber installation.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};

use crate::config::LogConfig;

/// Environment variable that overrides the configured directives.
pub const LOG_ENV: &str = "FTPMIRROR_LOG";

/// Installs a global subscriber that writes formatted events to stderr.
///
/// When [`LOG_ENV`] is set its value is used as the filter instead of the
/// directives rendered from `config`.
///
/// # Errors
///
/// Returns [`TryInitError`] when a global subscriber is already installed.
pub fn init_tracing(config: &LogConfig) -> Result<(), TryInitError> {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| config.env_filter());

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true),
        )
        .try_init()
}
