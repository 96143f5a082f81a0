//! # handlehttp-echo
//!
//! Echoes a validated greeting back as JSON.
//!
//! ## Usage
//!
//! ```bash
//! HOST=0.0.0.0 PORT=8080 cargo run -p handlehttp --bin handlehttp-echo
//! curl -s 'localhost:8080/?id=1' -d '{"message":"Hello, World!"}'
//! ```
//!
//! `HOST` and `PORT` may also come from a `.env` file. Logging is configured
//! through `HANDLEHTTP_LOG_LEVEL` and `HANDLEHTTP_LOG_FORMAT`.

use std::env;

use anyhow::Context;
use handlehttp::prelude::*;
use handlehttp::server::config::{DEFAULT_HOST, DEFAULT_PORT};
use serde::{Deserialize, Serialize};

/// Longest message accepted.
const MAX_MESSAGE_LEN: usize = 280;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Greeting {
    message: String,
    id: i64,
}

impl DecodeParams for Greeting {
    fn decode(&mut self, _ctx: &RequestContext, params: &QueryParams) -> Result<(), DecodeError> {
        if let Some(id) = params.parse_optional("id")? {
            self.id = id;
        }
        Ok(())
    }
}

impl Validator for Greeting {
    fn valid(&self, _ctx: &RequestContext) -> Problems {
        let mut problems = Problems::new();
        problems
            .check(self.message.trim().is_empty(), "message", "is required")
            .check(
                self.message.chars().count() > MAX_MESSAGE_LEN,
                "message",
                "must be at most 280 characters",
            )
            .check(self.id < 0, "id", "must not be negative");
        problems
    }
}

#[derive(Debug, Serialize)]
struct Echo {
    message: String,
    id: i64,
    request_id: RequestId,
}

async fn echo(ctx: RequestContext, greeting: Greeting) -> Result<Echo, BoxError> {
    Ok(Echo {
        message: greeting.message,
        id: greeting.id,
        request_id: ctx.request_id(),
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            return Err(e).context("failed to load .env");
        }
    }

    let log_config = LogConfig::from_env().context("invalid logging configuration")?;
    init_logging(&log_config).context("failed to initialize logging")?;

    let host = env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());
    let port = env::var("PORT").unwrap_or_else(|_| DEFAULT_PORT.to_string());

    let logger = TracingLogger::shared();
    let handler = handle(logger.clone(), echo);

    run(ShutdownSignal::new(), logger, handler, &host, &port).await;

    Ok(())
}
