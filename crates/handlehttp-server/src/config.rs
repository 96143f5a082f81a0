//! Server configuration types.
//!
//! [`run`](crate::run) always uses the defaults below; build a
//! [`ServerConfig`] and go through [`Server::with_config`](crate::Server::with_config)
//! to change them.
//!
//! # Example
//!
//! ```rust
//! use handlehttp_server::ServerConfig;
//! use std::time::Duration;
//!
//! let config = ServerConfig::builder()
//!     .host("0.0.0.0")
//!     .port("9090")
//!     .shutdown_timeout(Duration::from_secs(30))
//!     .build();
//!
//! assert_eq!(config.addr(), "0.0.0.0:9090");
//! ```

use std::time::Duration;

/// Default bind host.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default bind port.
pub const DEFAULT_PORT: &str = "8080";

/// Default bound on reading a request, in seconds.
pub const DEFAULT_READ_TIMEOUT_SECS: u64 = 5;

/// Default bound on producing a response, in seconds.
pub const DEFAULT_WRITE_TIMEOUT_SECS: u64 = 10;

/// Default bound on the shutdown drain, in seconds.
pub const DEFAULT_SHUTDOWN_TIMEOUT_SECS: u64 = 10;

/// Server configuration.
///
/// Use [`ServerConfig::new`] for host and port with default timeouts, or
/// [`ServerConfig::builder`] for everything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    host: String,
    port: String,
    read_timeout: Duration,
    write_timeout: Duration,
    shutdown_timeout: Duration,
}

impl ServerConfig {
    /// Creates a configuration for `host` and `port` with default timeouts.
    #[must_use]
    pub fn new(host: impl Into<String>, port: impl Into<String>) -> Self {
        Self::builder().host(host).port(port).build()
    }

    /// Creates a new configuration builder.
    #[must_use]
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder::default()
    }

    /// Returns the bind host.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the bind port.
    #[must_use]
    pub fn port(&self) -> &str {
        &self.port
    }

    /// Joins host and port into a bind address.
    ///
    /// Hosts containing `:` are IPv6 literals and get bracketed.
    ///
    /// ```rust
    /// use handlehttp_server::ServerConfig;
    ///
    /// assert_eq!(ServerConfig::new("localhost", "80").addr(), "localhost:80");
    /// assert_eq!(ServerConfig::new("::1", "80").addr(), "[::1]:80");
    /// assert_eq!(ServerConfig::new("", "80").addr(), ":80");
    /// ```
    #[must_use]
    pub fn addr(&self) -> String {
        if self.host.contains(':') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }

    /// Returns the address handed to the listener.
    ///
    /// Same as [`addr`](Self::addr), except that an empty host binds every
    /// IPv4 interface.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        if self.host.is_empty() {
            format!("0.0.0.0:{}", self.port)
        } else {
            self.addr()
        }
    }

    /// Returns the bound on reading a request (headers and body).
    #[must_use]
    pub fn read_timeout(&self) -> Duration {
        self.read_timeout
    }

    /// Returns the bound on producing a response once the request is read.
    #[must_use]
    pub fn write_timeout(&self) -> Duration {
        self.write_timeout
    }

    /// Returns the bound on the shutdown drain.
    #[must_use]
    pub fn shutdown_timeout(&self) -> Duration {
        self.shutdown_timeout
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Builder for [`ServerConfig`].
#[derive(Debug, Clone)]
pub struct ServerConfigBuilder {
    host: String,
    port: String,
    read_timeout: Duration,
    write_timeout: Duration,
    shutdown_timeout: Duration,
}

impl ServerConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT.to_string(),
            read_timeout: Duration::from_secs(DEFAULT_READ_TIMEOUT_SECS),
            write_timeout: Duration::from_secs(DEFAULT_WRITE_TIMEOUT_SECS),
            shutdown_timeout: Duration::from_secs(DEFAULT_SHUTDOWN_TIMEOUT_SECS),
        }
    }

    /// Sets the bind host.
    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Sets the bind port. `"0"` picks an ephemeral port.
    #[must_use]
    pub fn port(mut self, port: impl Into<String>) -> Self {
        self.port = port.into();
        self
    }

    /// Sets the bound on reading a request.
    #[must_use]
    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// Sets the bound on producing a response.
    ///
    /// A handler still running when it elapses has its connection closed
    /// without a response.
    #[must_use]
    pub fn write_timeout(mut self, timeout: Duration) -> Self {
        self.write_timeout = timeout;
        self
    }

    /// Sets the bound on the shutdown drain.
    ///
    /// Connections still open when it elapses are terminated.
    #[must_use]
    pub fn shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = timeout;
        self
    }

    /// Builds the [`ServerConfig`].
    #[must_use]
    pub fn build(self) -> ServerConfig {
        ServerConfig {
            host: self.host,
            port: self.port,
            read_timeout: self.read_timeout,
            write_timeout: self.write_timeout,
            shutdown_timeout: self.shutdown_timeout,
        }
    }
}

impl Default for ServerConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();

        assert_eq!(config.host(), DEFAULT_HOST);
        assert_eq!(config.port(), DEFAULT_PORT);
        assert_eq!(config.read_timeout(), Duration::from_secs(5));
        assert_eq!(config.write_timeout(), Duration::from_secs(10));
        assert_eq!(config.shutdown_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_new_keeps_default_timeouts() {
        let config = ServerConfig::new("0.0.0.0", "3000");

        assert_eq!(config.addr(), "0.0.0.0:3000");
        assert_eq!(
            config.shutdown_timeout(),
            Duration::from_secs(DEFAULT_SHUTDOWN_TIMEOUT_SECS)
        );
    }

    #[test]
    fn test_ipv6_host_bracketed() {
        let config = ServerConfig::new("::", "8080");
        assert_eq!(config.addr(), "[::]:8080");
        assert_eq!(config.bind_addr(), "[::]:8080");
    }

    #[test]
    fn test_empty_host_binds_all_interfaces() {
        let config = ServerConfig::new("", "8080");

        assert_eq!(config.addr(), ":8080");
        assert_eq!(config.bind_addr(), "0.0.0.0:8080");
    }

    #[test]
    fn test_builder_chaining() {
        let config = ServerConfig::builder()
            .host("localhost")
            .port("0")
            .read_timeout(Duration::from_millis(100))
            .write_timeout(Duration::from_millis(200))
            .shutdown_timeout(Duration::from_millis(300))
            .build();

        assert_eq!(config.addr(), "localhost:0");
        assert_eq!(config.read_timeout(), Duration::from_millis(100));
        assert_eq!(config.write_timeout(), Duration::from_millis(200));
        assert_eq!(config.shutdown_timeout(), Duration::from_millis(300));
    }
}
