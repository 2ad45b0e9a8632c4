//! Subscriber installation.
//!
//! stdout belongs to command output, so every layer writes to stderr.

use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::{LogFormat, TelemetryConfig, TelemetryError};

/// Install the global subscriber described by `config`.
///
/// Fails if the level is not a valid filter directive or a subscriber is
/// already installed.
pub fn init_logging(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let filter = build_filter(config)?;

    let layer = match config.log_format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_current_span(true)
            .with_span_list(false)
            .flatten_event(true)
            .with_filter(filter)
            .boxed(),
        LogFormat::Pretty => fmt::layer()
            .compact()
            .with_writer(std::io::stderr)
            .with_ansi(config.ansi)
            .with_target(true)
            .with_filter(filter)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(layer)
        .try_init()
        .map_err(|e: TryInitError| TelemetryError::LoggingInit(e.to_string()))
}

/// `RUST_LOG` if set, otherwise the configured level.
fn build_filter(config: &TelemetryConfig) -> Result<EnvFilter, TelemetryError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(&config.log_level)
            .map_err(|e| TelemetryError::InvalidLevel(config.log_level.clone(), e.to_string())),
    }
}

/// Event names used by the CLI.
pub mod events {
    /// A route manifest was read and parsed.
    pub const MANIFEST_LOADED: &str = "manifest_loaded";

    /// A route table was normalized and compiled.
    pub const ROUTER_BUILT: &str = "router_built";

    /// A route table failed validation.
    pub const ROUTE_TABLE_INVALID: &str = "route_table_invalid";
}
