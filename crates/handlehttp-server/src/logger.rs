//! Logger capability.
//!
//! The pipeline and the server never log through a global; they are handed a
//! [`Logger`] and call it. [`TracingLogger`] is the production implementation.
//! With the `test-util` feature, `RecordingLogger` keeps messages in memory
//! for tests.

use std::fmt;
use std::sync::Arc;

#[cfg(any(test, feature = "test-util"))]
use parking_lot::Mutex;

/// Target used for every event emitted by [`TracingLogger`].
pub const LOG_TARGET: &str = "handlehttp";

/// Leveled log sink.
///
/// Implementations are shared by every request task and the lifecycle tasks,
/// so they must be safe to call concurrently.
pub trait Logger: Send + Sync {
    /// Logs at error level.
    fn error(&self, args: fmt::Arguments<'_>);

    /// Logs at info level.
    fn info(&self, args: fmt::Arguments<'_>);

    /// Logs at warning level.
    fn warn(&self, args: fmt::Arguments<'_>);
}

/// Shared logger handle passed to the pipeline and the server.
pub type SharedLogger = Arc<dyn Logger>;

impl<L: Logger + ?Sized> Logger for Arc<L> {
    fn error(&self, args: fmt::Arguments<'_>) {
        (**self).error(args);
    }

    fn info(&self, args: fmt::Arguments<'_>) {
        (**self).info(args);
    }

    fn warn(&self, args: fmt::Arguments<'_>) {
        (**self).warn(args);
    }
}

/// Forwards to `tracing` under the [`LOG_TARGET`] target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl TracingLogger {
    /// Returns a shared handle.
    #[must_use]
    pub fn shared() -> SharedLogger {
        Arc::new(Self)
    }
}

impl Logger for TracingLogger {
    fn error(&self, args: fmt::Arguments<'_>) {
        tracing::error!(target: LOG_TARGET, "{}", args);
    }

    fn info(&self, args: fmt::Arguments<'_>) {
        tracing::info!(target: LOG_TARGET, "{}", args);
    }

    fn warn(&self, args: fmt::Arguments<'_>) {
        tracing::warn!(target: LOG_TARGET, "{}", args);
    }
}

/// Level of a recorded message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Error level.
    Error,
    /// Warning level.
    Warn,
    /// Info level.
    Info,
}

/// Logger that keeps every message in memory.
///
/// Available with the `test-util` feature.
///
/// # Example
///
/// ```rust
/// use handlehttp_server::{LogLevel, Logger, RecordingLogger};
///
/// let logger = RecordingLogger::new();
/// logger.warn(format_args!("request validation: {}", "bad id"));
///
/// assert_eq!(logger.messages(LogLevel::Warn), vec!["request validation: bad id"]);
/// assert!(logger.messages(LogLevel::Error).is_empty());
/// ```
#[cfg(any(test, feature = "test-util"))]
#[derive(Debug, Default)]
pub struct RecordingLogger {
    records: Mutex<Vec<(LogLevel, String)>>,
}

#[cfg(any(test, feature = "test-util"))]
impl RecordingLogger {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every record in the order it was logged.
    #[must_use]
    pub fn records(&self) -> Vec<(LogLevel, String)> {
        self.records.lock().clone()
    }

    /// Returns the messages logged at `level`.
    #[must_use]
    pub fn messages(&self, level: LogLevel) -> Vec<String> {
        self.records
            .lock()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m.clone())
            .collect()
    }

    /// Returns `true` if any message at `level` contains `needle`.
    #[must_use]
    pub fn contains(&self, level: LogLevel, needle: &str) -> bool {
        self.records
            .lock()
            .iter()
            .any(|(l, m)| *l == level && m.contains(needle))
    }

    fn record(&self, level: LogLevel, args: fmt::Arguments<'_>) {
        self.records.lock().push((level, args.to_string()));
    }
}

#[cfg(any(test, feature = "test-util"))]
impl Logger for RecordingLogger {
    fn error(&self, args: fmt::Arguments<'_>) {
        self.record(LogLevel::Error, args);
    }

    fn info(&self, args: fmt::Arguments<'_>) {
        self.record(LogLevel::Info, args);
    }

    fn warn(&self, args: fmt::Arguments<'_>) {
        self.record(LogLevel::Warn, args);
    }
}
