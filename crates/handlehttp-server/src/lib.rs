//! # handlehttp Server
//!
//! Generic request dispatch and a gracefully stopping HTTP server.
//!
//! This crate provides:
//!
//! - [`handle`] / [`handle_with`]: bind a typed business function to the
//!   decode → validate → call → respond pipeline
//! - [`respond`]: JSON response writing with a fixed status
//! - [`run`] / [`Server`]: serve a [`Handler`] until cancelled, then drain
//!   within a bounded time
//! - [`Logger`]: the leveled logging capability everything above is handed
//!
//! ## Example
//!
//! ```rust,no_run
//! use handlehttp_extract::{DecodeError, DecodeParams, Problems, QueryParams, RequestContext, Validator};
//! use handlehttp_server::{handle, run, ShutdownSignal, TracingLogger};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Deserialize, Default)]
//! #[serde(default)]
//! struct Greeting {
//!     message: String,
//! }
//!
//! impl DecodeParams for Greeting {
//!     fn decode(&mut self, _ctx: &RequestContext, _params: &QueryParams) -> Result<(), DecodeError> {
//!         Ok(())
//!     }
//! }
//!
//! impl Validator for Greeting {
//!     fn valid(&self, _ctx: &RequestContext) -> Problems {
//!         let mut problems = Problems::new();
//!         problems.check(self.message.is_empty(), "message", "is required");
//!         problems
//!     }
//! }
//!
//! #[derive(Serialize)]
//! struct Echo {
//!     message: String,
//! }
//!
//! async fn echo(_ctx: RequestContext, input: Greeting) -> Result<Echo, String> {
//!     Ok(Echo { message: input.message })
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let logger = TracingLogger::shared();
//!     let handler = handle(logger.clone(), echo);
//!
//!     run(ShutdownSignal::new(), logger, handler, "127.0.0.1", "8080").await;
//! }
//! ```

#![doc(html_root_url = "https://docs.rs/handlehttp-server/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod config;
mod error;
pub mod handler;
mod logger;
mod response;
pub mod server;
pub mod shutdown;

pub use config::{ServerConfig, ServerConfigBuilder};
pub use error::{BoxError, DispatchError, ServerError};
pub use handler::{handle, handle_with, BoxedResponse, BusinessFn, Endpoint, Handler, SharedHandler};
pub use logger::{LogLevel, Logger, SharedLogger, TracingLogger, LOG_TARGET};

#[cfg(any(test, feature = "test-util"))]
pub use logger::RecordingLogger;
pub use response::{respond, respond_error, ErrorBody, HttpResponse, ResponseBody};
pub use server::{run, Server};
pub use shutdown::{interrupt, shutdown_requested, ConnectionToken, ConnectionTracker, ShutdownSignal};
