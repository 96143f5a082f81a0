//! HTTP server lifecycle.
//!
//! [`run`] serves a [`Handler`] until a [`ShutdownSignal`] fires or the
//! process is interrupted, then drains:
//!
//! - the accept loop stops and the listener closes,
//! - idle connections close at once, in-flight requests may finish,
//! - connections still open after the shutdown timeout are terminated.
//!
//! Serving and shutdown watching are two tasks; `run` returns only after both
//! have finished.
//!
//! # Example
//!
//! ```rust,no_run
//! use handlehttp_server::{run, Handler, ShutdownSignal, TracingLogger};
//!
//! # async fn example(handler: impl Handler) {
//! let cancel = ShutdownSignal::new();
//! run(cancel, TracingLogger::shared(), handler, "127.0.0.1", "8080").await;
//! # }
//! ```

use std::net::SocketAddr;
use std::sync::Arc;

use handlehttp_extract::{DecodeError, DecodeSource};
use http::Request;
use http_body_util::BodyExt;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::{TokioIo, TokioTimer};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinSet;

use crate::config::ServerConfig;
use crate::error::{DispatchError, ServerError};
use crate::handler::{Handler, SharedHandler};
use crate::response::{respond_error, HttpResponse};
use crate::shutdown::{shutdown_requested, ConnectionTracker, ShutdownSignal};
use crate::SharedLogger;

/// Serves `handler` on `host:port` until `cancel` fires or the process is
/// interrupted.
///
/// Uses the default read (5s), write (10s) and shutdown (10s) timeouts. A
/// listen failure is logged at error level; `run` still returns only once
/// shutdown has been requested.
///
/// The first call installs a process-wide SIGINT handler through
/// [`tokio::signal::ctrl_c`]. It stays installed after `run` returns, so a
/// later Ctrl+C no longer terminates the process by default. Embedders that
/// need the default action back must exit on their own.
pub async fn run(
    cancel: ShutdownSignal,
    logger: SharedLogger,
    handler: impl Handler,
    host: &str,
    port: &str,
) {
    Server::new(handler, logger, host, port).run(cancel).await;
}

/// An HTTP server bound to one handler.
///
/// # Example
///
/// ```rust,no_run
/// use handlehttp_server::{Handler, Server, ServerConfig, ShutdownSignal, TracingLogger};
/// use std::time::Duration;
///
/// # async fn example(handler: impl Handler) -> Result<(), handlehttp_server::ServerError> {
/// let config = ServerConfig::builder()
///     .port("0")
///     .shutdown_timeout(Duration::from_secs(2))
///     .build();
///
/// let server = Server::with_config(config, handler, TracingLogger::shared())
///     .bind()
///     .await?;
/// println!("listening on {:?}", server.local_addr());
///
/// server.run(ShutdownSignal::new()).await;
/// # Ok(())
/// # }
/// ```
pub struct Server {
    shared: Arc<Shared>,
    listener: Option<TcpListener>,
}

struct Shared {
    config: ServerConfig,
    handler: SharedHandler,
    logger: SharedLogger,
}

impl Server {
    /// Creates a server for `host:port` with default timeouts.
    pub fn new(handler: impl Handler, logger: SharedLogger, host: &str, port: &str) -> Self {
        Self::with_config(ServerConfig::new(host, port), handler, logger)
    }

    /// Creates a server from an explicit configuration.
    pub fn with_config(config: ServerConfig, handler: impl Handler, logger: SharedLogger) -> Self {
        Self {
            shared: Arc::new(Shared {
                config,
                handler: Arc::new(handler),
                logger,
            }),
            listener: None,
        }
    }

    /// Returns the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.shared.config
    }

    /// Binds the listener now instead of in [`run`](Self::run).
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Bind`] if the address cannot be bound.
    pub async fn bind(mut self) -> Result<Self, ServerError> {
        if self.listener.is_none() {
            self.listener = Some(self.shared.bind().await?);
        }
        Ok(self)
    }

    /// Returns the bound address, once [`bind`](Self::bind) has succeeded.
    #[must_use]
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.listener.as_ref().and_then(|l| l.local_addr().ok())
    }

    /// Serves until `cancel` fires or the process is interrupted, then drains.
    pub async fn run(self, cancel: ShutdownSignal) {
        let Self { shared, listener } = self;
        let shutdown = ShutdownSignal::new();

        let serving = tokio::spawn({
            let shared = Arc::clone(&shared);
            let shutdown = shutdown.clone();
            async move {
                let listener = match listener {
                    Some(listener) => listener,
                    None => match shared.bind().await {
                        Ok(listener) => listener,
                        Err(e) => {
                            shared
                                .logger
                                .error(format_args!("Error listening and serving: {e}"));
                            return;
                        }
                    },
                };
                shared.serve(listener, shutdown).await;
            }
        });

        let watcher = tokio::spawn({
            let logger = Arc::clone(&shared.logger);
            async move {
                shutdown_requested(&cancel, &*logger).await;
                shutdown.trigger();
            }
        });

        let (serving, watcher) = tokio::join!(serving, watcher);
        for result in [serving, watcher] {
            if let Err(e) = result {
                shared.logger.error(format_args!("Server task failed: {e}"));
            }
        }
    }
}

impl std::fmt::Debug for Server {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Server")
            .field("config", &self.shared.config)
            .field("local_addr", &self.local_addr())
            .finish_non_exhaustive()
    }
}

impl Shared {
    async fn bind(&self) -> Result<TcpListener, ServerError> {
        let addr = self.config.bind_addr();
        let result = TcpListener::bind(addr.as_str()).await;
        result.map_err(|source| ServerError::Bind { addr, source })
    }

    /// Accepts until `shutdown`, then drains within the shutdown timeout.
    async fn serve(self: Arc<Self>, listener: TcpListener, shutdown: ShutdownSignal) {
        match listener.local_addr() {
            Ok(addr) => self.logger.info(format_args!("Listening on {addr}")),
            Err(_) => self
                .logger
                .info(format_args!("Listening on {}", self.config.addr())),
        }

        let tracker = ConnectionTracker::new();
        let mut connections = JoinSet::new();

        loop {
            tokio::select! {
                result = listener.accept() => match result {
                    Ok((stream, remote_addr)) => {
                        let token = tracker.acquire();
                        let shared = Arc::clone(&self);
                        let shutdown = shutdown.clone();

                        connections.spawn(async move {
                            if let Err(e) = shared.serve_connection(stream, shutdown).await {
                                shared
                                    .logger
                                    .warn(format_args!("Connection error from {remote_addr}: {e}"));
                            }
                            drop(token);
                        });
                    }
                    Err(e) => {
                        self.logger
                            .error(format_args!("Failed to accept connection: {e}"));
                    }
                },
                () = shutdown.recv() => break,
            }

            while connections.try_join_next().is_some() {}
        }

        drop(listener);

        let shutdown_timeout = self.config.shutdown_timeout();
        self.logger.info(format_args!(
            "Waiting up to {:?} for {} connections to close",
            shutdown_timeout,
            tracker.active_connections()
        ));

        tokio::select! {
            () = tracker.wait_for_shutdown() => {
                self.logger.info(format_args!("All connections closed"));
            }
            () = tokio::time::sleep(shutdown_timeout) => {
                self.logger.error(format_args!(
                    "Shutdown timeout reached, terminating {} connections",
                    tracker.active_connections()
                ));
            }
        }

        connections.abort_all();
        while connections.join_next().await.is_some() {}

        self.logger.info(format_args!("Server stopped"));
    }

    async fn serve_connection(
        self: &Arc<Self>,
        stream: TcpStream,
        shutdown: ShutdownSignal,
    ) -> Result<(), hyper::Error> {
        let io = TokioIo::new(stream);
        let shared = Arc::clone(self);

        let service = service_fn(move |req: Request<Incoming>| {
            let shared = Arc::clone(&shared);
            async move { shared.handle_request(req).await }
        });

        let conn = http1::Builder::new()
            .timer(TokioTimer::new())
            .header_read_timeout(self.config.read_timeout())
            .serve_connection(io, service);
        tokio::pin!(conn);

        tokio::select! {
            result = conn.as_mut() => result,
            () = shutdown.recv() => {
                conn.as_mut().graceful_shutdown();
                conn.await
            }
        }
    }

    /// Reads the body under the read timeout, then runs the handler under the
    /// write timeout. A handler that overruns gets its connection closed.
    async fn handle_request(&self, req: Request<Incoming>) -> Result<HttpResponse, ServerError> {
        let (parts, body) = req.into_parts();

        let body = match tokio::time::timeout(self.config.read_timeout(), body.collect()).await {
            Ok(Ok(collected)) => collected.to_bytes(),
            Ok(Err(e)) => return Ok(self.reject_unread(&e)),
            Err(_) => return Ok(self.reject_unread(&"read timeout")),
        };

        let write_timeout = self.config.write_timeout();
        let request = Request::from_parts(parts, body);
        if let Ok(response) = tokio::time::timeout(write_timeout, self.handler.call(request)).await {
            Ok(response)
        } else {
            self.logger.warn(format_args!(
                "Handler exceeded write timeout of {write_timeout:?}, closing connection"
            ));
            Err(ServerError::WriteTimeout(write_timeout))
        }
    }

    fn reject_unread(&self, details: &dyn std::fmt::Display) -> HttpResponse {
        let err = DispatchError::from(DecodeError::deserialization_failed(
            DecodeSource::Body,
            format_args!("read body: {details}"),
        ));
        let message = err.to_string();
        self.logger
            .warn(format_args!("request validation: {message}"));
        respond_error(err.status_code(), &*self.logger, &message)
    }
}
