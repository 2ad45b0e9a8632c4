//! Logging setup shared by waymark binaries.
//!
//! Events go to stderr as compact text or flattened JSON. The level comes
//! from `RUST_LOG` when set, otherwise from [`TelemetryConfig::log_level`].
//!
//! ```ignore
//! use waymark_telemetry::{LogFormat, Telemetry, TelemetryConfig};
//!
//! let telemetry = Telemetry::init(
//!     TelemetryConfig::new()
//!         .with_log_level("debug")
//!         .with_log_format(LogFormat::Json),
//! )?;
//! ```

pub mod config;
pub mod logging;

pub use config::{LogFormat, TelemetryConfig};
pub use logging::events;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TelemetryError {
    /// A global subscriber could not be installed.
    #[error("failed to initialize logging: {0}")]
    LoggingInit(String),

    /// The configured level is not a valid filter directive.
    #[error("invalid log level '{0}': {1}")]
    InvalidLevel(String, String),
}

/// Handle returned once logging is installed.
#[derive(Debug)]
pub struct Telemetry {
    config: TelemetryConfig,
}

impl Telemetry {
    pub fn init(config: TelemetryConfig) -> Result<Self, TelemetryError> {
        logging::init_logging(&config)?;
        tracing::debug!(
            service = %config.service_name,
            format = %config.log_format,
            "logging initialized"
        );
        Ok(Self { config })
    }

    pub fn config(&self) -> &TelemetryConfig {
        &self.config
    }
}
