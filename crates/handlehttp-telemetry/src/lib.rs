//! Logging setup for handlehttp services.
//!
//! The server crates only ever log through their injected logger; this crate
//! installs the `tracing` subscriber that logger forwards to.
//!
//! - **JSON** output for production, **pretty** output for development
//! - Filter directives via `EnvFilter`
//! - `HANDLEHTTP_LOG_LEVEL` / `HANDLEHTTP_LOG_FORMAT` overrides
//!
//! # Example
//!
//! ```rust,no_run
//! use handlehttp_telemetry::{init_logging, LogConfig};
//!
//! # fn main() -> Result<(), handlehttp_telemetry::TelemetryError> {
//! init_logging(&LogConfig::development())?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod logging;

pub use error::TelemetryError;
pub use logging::{create_env_filter, init_logging, LogConfig};

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;
