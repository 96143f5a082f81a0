//! Shared fixtures for the end-to-end tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use handlehttp::prelude::*;
use handlehttp::server::RecordingLogger;
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;

/// Input carrying a message from the body and an id from the query.
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Greeting {
    pub message: String,
    pub id: i64,
}

impl DecodeParams for Greeting {
    fn decode(&mut self, _ctx: &RequestContext, params: &QueryParams) -> Result<(), DecodeError> {
        self.id = params.parse("id")?;
        Ok(())
    }
}

impl Validator for Greeting {
    fn valid(&self, _ctx: &RequestContext) -> Problems {
        let mut problems = Problems::new();
        problems
            .check(self.id < 0, "id", "must not be negative")
            .check(
                self.message.contains('<'),
                "message",
                "must not contain markup",
            );
        problems
    }
}

/// Output echoing the merged input.
#[derive(Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct Reply {
    pub message: String,
    pub id: i64,
}

/// Counts business function invocations.
#[derive(Debug, Clone, Default)]
pub struct Calls(Arc<AtomicUsize>);

impl Calls {
    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

/// Echoes the greeting; the message `"fail"` is a business error.
pub async fn greet(_ctx: RequestContext, input: Greeting, calls: Calls) -> Result<Reply, BoxError> {
    calls.0.fetch_add(1, Ordering::SeqCst);
    if input.message == "fail" {
        return Err("greeting refused".into());
    }
    Ok(Reply {
        message: input.message,
        id: input.id,
    })
}

/// A server running on an ephemeral port.
pub struct TestServer {
    pub url: String,
    pub cancel: ShutdownSignal,
    pub logger: Arc<RecordingLogger>,
    pub handle: JoinHandle<()>,
}

impl TestServer {
    /// Starts `handler` on `127.0.0.1:0` with the given drain bound.
    pub async fn start(handler: impl Handler, shutdown_timeout: Duration) -> Self {
        Self::start_logged(Arc::new(RecordingLogger::new()), handler, shutdown_timeout).await
    }

    /// Like [`start`](Self::start), logging into `logger`.
    pub async fn start_logged(
        logger: Arc<RecordingLogger>,
        handler: impl Handler,
        shutdown_timeout: Duration,
    ) -> Self {
        let config = ServerConfig::builder()
            .host("127.0.0.1")
            .port("0")
            .shutdown_timeout(shutdown_timeout)
            .build();

        let server = Server::with_config(config, handler, logger.clone())
            .bind()
            .await
            .expect("bind ephemeral port");
        let url = format!("http://{}", server.local_addr().expect("bound address"));

        let cancel = ShutdownSignal::new();
        let handle = tokio::spawn(server.run(cancel.clone()));

        Self {
            url,
            cancel,
            logger,
            handle,
        }
    }

    /// Starts the greeting endpoint, returning the server and its call counter.
    pub async fn greeting() -> (Self, Calls) {
        let calls = Calls::default();
        let logger = Arc::new(RecordingLogger::new());
        let endpoint = handle_with(logger.clone(), greet, calls.clone());
        let server = Self::start_logged(logger, endpoint, Duration::from_secs(2)).await;
        (server, calls)
    }

    /// Cancels and waits for `run` to return.
    pub async fn stop(self) {
        self.cancel.trigger();
        tokio::time::timeout(Duration::from_secs(10), self.handle)
            .await
            .expect("run should return after cancellation")
            .expect("run should not panic");
    }
}
