//! Structured logging for handlehttp services.
//!
//! This module installs a `tracing-subscriber` registry with either JSON
//! (production) or pretty (development) output. The server's
//! `TracingLogger` emits under the `handlehttp` target, so a filter such as
//! `handlehttp=debug,info` narrows output to the server.
//!
//! # Example
//!
//! ```rust,no_run
//! use handlehttp_telemetry::logging::{init_logging, LogConfig};
//!
//! # fn main() -> Result<(), handlehttp_telemetry::TelemetryError> {
//! let config = LogConfig::from_env()?;
//! init_logging(&config)?;
//!
//! tracing::info!(target: "handlehttp", "Listening on 127.0.0.1:8080");
//! # Ok(())
//! # }
//! ```

use crate::error::TelemetryError;
use crate::TelemetryResult;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Environment variable holding the log filter.
pub const LOG_LEVEL_ENV: &str = "HANDLEHTTP_LOG_LEVEL";

/// Environment variable selecting `json` or `pretty` output.
pub const LOG_FORMAT_ENV: &str = "HANDLEHTTP_LOG_FORMAT";

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Whether logging is enabled.
    pub enabled: bool,

    /// Filter directive (e.g., "info", "handlehttp=debug,warn").
    pub level: String,

    /// Whether to output JSON format.
    pub json_format: bool,

    /// Whether to include span events (new, close).
    pub span_events: bool,

    /// Whether to include file/line info.
    pub file_line_info: bool,

    /// Whether to include thread IDs.
    pub thread_ids: bool,

    /// Whether to include target (module path).
    pub include_target: bool,

    /// Service name reported at startup.
    pub service_name: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self::production()
    }
}

impl LogConfig {
    /// Creates a development configuration with human-readable output.
    #[must_use]
    pub fn development() -> Self {
        Self {
            enabled: true,
            level: "debug".to_string(),
            json_format: false,
            span_events: true,
            file_line_info: true,
            thread_ids: false,
            include_target: true,
            service_name: "handlehttp".to_string(),
        }
    }

    /// Creates a production configuration with JSON output.
    #[must_use]
    pub fn production() -> Self {
        Self {
            enabled: true,
            level: "info".to_string(),
            json_format: true,
            span_events: false,
            file_line_info: false,
            thread_ids: false,
            include_target: true,
            service_name: "handlehttp".to_string(),
        }
    }

    /// Builds a production configuration overridden by
    /// [`LOG_LEVEL_ENV`] and [`LOG_FORMAT_ENV`].
    ///
    /// # Errors
    ///
    /// Returns [`TelemetryError::InvalidConfig`] if the format is neither
    /// `json` nor `pretty`.
    pub fn from_env() -> TelemetryResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env), reading variables through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns [`TelemetryError::InvalidConfig`] on an unknown format.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> TelemetryResult<Self> {
        let mut config = Self::production();

        if let Some(level) = lookup(LOG_LEVEL_ENV).filter(|l| !l.trim().is_empty()) {
            config.level = level;
        }

        match lookup(LOG_FORMAT_ENV).as_deref().map(str::trim) {
            None | Some("" | "json") => {}
            Some("pretty") => {
                config.json_format = false;
                config.file_line_info = true;
            }
            Some(other) => {
                return Err(TelemetryError::InvalidConfig(format!(
                    "{LOG_FORMAT_ENV}={other}, expected json or pretty"
                )));
            }
        }

        Ok(config)
    }
}

/// Initializes the logging subsystem.
///
/// # Errors
///
/// Returns `TelemetryError::LoggingInit` if the filter is invalid or a
/// global subscriber is already installed.
pub fn init_logging(config: &LogConfig) -> TelemetryResult<()> {
    if !config.enabled {
        return Ok(());
    }

    let filter = create_env_filter(&config.level)?;

    let span_events = if config.span_events {
        FmtSpan::NEW | FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    if config.json_format {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_span_events(span_events)
            .with_file(config.file_line_info)
            .with_line_number(config.file_line_info)
            .with_thread_ids(config.thread_ids)
            .with_target(config.include_target)
            .with_filter(filter);

        tracing_subscriber::registry()
            .with(fmt_layer)
            .try_init()
            .map_err(|e| TelemetryError::LoggingInit(e.to_string()))?;
    } else {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .pretty()
            .with_span_events(span_events)
            .with_file(config.file_line_info)
            .with_line_number(config.file_line_info)
            .with_thread_ids(config.thread_ids)
            .with_target(config.include_target)
            .with_filter(filter);

        tracing_subscriber::registry()
            .with(fmt_layer)
            .try_init()
            .map_err(|e| TelemetryError::LoggingInit(e.to_string()))?;
    }

    tracing::info!(service = %config.service_name, "Logging initialized");
    Ok(())
}

/// Creates an env filter from a directive string.
///
/// # Errors
///
/// Returns `TelemetryError::LoggingInit` if the directive is invalid.
pub fn create_env_filter(filter: &str) -> TelemetryResult<EnvFilter> {
    EnvFilter::try_new(filter)
        .map_err(|e| TelemetryError::LoggingInit(format!("Invalid log level: {e}")))
}
