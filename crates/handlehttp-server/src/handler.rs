//! Typed request dispatch.
//!
//! [`handle`] wraps a business function into an [`Endpoint`], a [`Handler`]
//! that runs every request through the same pipeline:
//!
//! 1. decode the JSON body into the input type (empty body reads as `{}`),
//! 2. merge query parameters via [`DecodeParams`](handlehttp_extract::DecodeParams),
//! 3. validate via [`Validator`](handlehttp_extract::Validator),
//! 4. call the business function,
//! 5. write the output as JSON with 200.
//!
//! Any failing step logs a warning and writes `{"error": ...}` with 400; later
//! steps do not run.
//!
//! # Example
//!
//! ```rust
//! use handlehttp_extract::{DecodeError, DecodeParams, Problems, QueryParams, RequestContext, Validator};
//! use handlehttp_server::{handle, TracingLogger};
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
//!         Problems::new()
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
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let endpoint = handle(TracingLogger::shared(), echo);
//! let out = endpoint
//!     .dispatch(RequestContext::default(), br#"{"message":"hi"}"#)
//!     .await
//!     .unwrap();
//! assert_eq!(out.message, "hi");
//! # }
//! ```

use std::fmt;
use std::future::Future;
use std::marker::PhantomData;
use std::pin::Pin;
use std::sync::Arc;

use bytes::Bytes;
use handlehttp_extract::{decode_request, Input, RequestContext};
use http::{Request, StatusCode};
use serde::Serialize;

use crate::error::{BoxError, DispatchError};
use crate::response::{respond, respond_error, HttpResponse};
use crate::SharedLogger;

/// Future returned by [`Handler::call`].
pub type BoxedResponse = Pin<Box<dyn Future<Output = HttpResponse> + Send>>;

/// Shared, type-erased handler.
pub type SharedHandler = Arc<dyn Handler>;

/// Turns a fully read request into a response.
///
/// The server calls this once per request from many tasks at once.
pub trait Handler: Send + Sync + 'static {
    /// Handles one request.
    fn call(&self, req: Request<Bytes>) -> BoxedResponse;
}

impl<H: Handler + ?Sized> Handler for Arc<H> {
    fn call(&self, req: Request<Bytes>) -> BoxedResponse {
        (**self).call(req)
    }
}

/// An async business function from a decoded input to an output.
///
/// Implemented for every `Fn(RequestContext, In) -> impl Future<Output =
/// Result<Out, E>>` whose error converts into [`BoxError`], so plain `async
/// fn`s qualify.
pub trait BusinessFn<In, Out>: Send + Sync + 'static {
    /// Failure type; its message becomes the error response.
    type Error: Into<BoxError>;

    /// Future produced by one call.
    type Future: Future<Output = Result<Out, Self::Error>> + Send + 'static;

    /// Runs the function.
    fn call(&self, ctx: RequestContext, input: In) -> Self::Future;
}

impl<F, Fut, In, Out, E> BusinessFn<In, Out> for F
where
    F: Fn(RequestContext, In) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Out, E>> + Send + 'static,
    E: Into<BoxError>,
{
    type Error = E;
    type Future = Fut;

    fn call(&self, ctx: RequestContext, input: In) -> Self::Future {
        self(ctx, input)
    }
}

/// A business function bound to the decode, validate and respond pipeline.
///
/// Created by [`handle`] or [`handle_with`]. Cheap to clone.
pub struct Endpoint<In, Out, F> {
    logger: SharedLogger,
    f: Arc<F>,
    _marker: PhantomData<fn(In) -> Out>,
}

impl<In, Out, F> Clone for Endpoint<In, Out, F> {
    fn clone(&self) -> Self {
        Self {
            logger: Arc::clone(&self.logger),
            f: Arc::clone(&self.f),
            _marker: PhantomData,
        }
    }
}

impl<In, Out, F> fmt::Debug for Endpoint<In, Out, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Endpoint")
            .field("input", &std::any::type_name::<In>())
            .field("output", &std::any::type_name::<Out>())
            .finish_non_exhaustive()
    }
}

/// Wraps `f` into an [`Endpoint`] that logs through `logger`.
pub fn handle<In, Out, F>(logger: SharedLogger, f: F) -> Endpoint<In, Out, F>
where
    In: Input,
    Out: Serialize + Send + 'static,
    F: BusinessFn<In, Out>,
{
    Endpoint {
        logger,
        f: Arc::new(f),
        _marker: PhantomData,
    }
}

/// Like [`handle`], for business functions taking a third argument.
///
/// `args` is bound once here and a clone is passed to every call, so it is
/// typically an `Arc` or a small handle (a database pool, a client).
///
/// # Example
///
/// ```rust
/// use handlehttp_extract::{DecodeError, DecodeParams, Problems, QueryParams, RequestContext, Validator};
/// use handlehttp_server::{handle_with, TracingLogger};
/// use serde::Deserialize;
/// use std::sync::Arc;
///
/// #[derive(Deserialize, Default)]
/// struct Ping {}
///
/// impl DecodeParams for Ping {
///     fn decode(&mut self, _: &RequestContext, _: &QueryParams) -> Result<(), DecodeError> {
///         Ok(())
///     }
/// }
///
/// impl Validator for Ping {
///     fn valid(&self, _: &RequestContext) -> Problems {
///         Problems::new()
///     }
/// }
///
/// async fn ping(_ctx: RequestContext, _input: Ping, name: Arc<str>) -> Result<String, String> {
///     Ok(format!("pong from {name}"))
/// }
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let endpoint = handle_with(TracingLogger::shared(), ping, Arc::<str>::from("a"));
/// let out = endpoint.dispatch(RequestContext::default(), b"").await.unwrap();
/// assert_eq!(out, "pong from a");
/// # }
/// ```
pub fn handle_with<In, Out, A, F, Fut, E>(
    logger: SharedLogger,
    f: F,
    args: A,
) -> Endpoint<In, Out, impl BusinessFn<In, Out>>
where
    In: Input,
    Out: Serialize + Send + 'static,
    A: Clone + Send + Sync + 'static,
    F: Fn(RequestContext, In, A) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Out, E>> + Send + 'static,
    E: Into<BoxError>,
{
    handle(logger, move |ctx: RequestContext, input: In| {
        f(ctx, input, args.clone())
    })
}

impl<In, Out, F> Endpoint<In, Out, F>
where
    In: Input,
    Out: Serialize + Send + 'static,
    F: BusinessFn<In, Out>,
{
    /// Returns the logger this endpoint writes to.
    #[must_use]
    pub fn logger(&self) -> &SharedLogger {
        &self.logger
    }

    /// Runs decode, validation and the business function, without writing a
    /// response.
    ///
    /// # Errors
    ///
    /// Returns the first failing step: [`DispatchError::Decode`],
    /// [`DispatchError::Validation`] or [`DispatchError::Business`].
    pub async fn dispatch(&self, ctx: RequestContext, body: &[u8]) -> Result<Out, DispatchError> {
        let input: In = decode_request(&ctx, body)?;

        let problems = input.valid(&ctx);
        if !problems.is_empty() {
            return Err(DispatchError::Validation(problems));
        }

        BusinessFn::call(&*self.f, ctx, input)
            .await
            .map_err(DispatchError::business)
    }

    /// Runs the full pipeline for `req` and writes the response.
    pub async fn serve(&self, req: Request<Bytes>) -> HttpResponse {
        let (parts, body) = req.into_parts();
        let ctx = RequestContext::from_parts(&parts);

        match self.dispatch(ctx, &body).await {
            Ok(output) => respond(StatusCode::OK, &*self.logger, &output),
            Err(err) => self.reject(&err),
        }
    }

    fn reject(&self, err: &DispatchError) -> HttpResponse {
        let message = err.to_string();
        match err {
            DispatchError::Decode(_) | DispatchError::Validation(_) => {
                self.logger
                    .warn(format_args!("request validation: {message}"));
            }
            DispatchError::Business(_) => {
                self.logger.warn(format_args!("request failed: {message}"));
            }
        }
        respond_error(err.status_code(), &*self.logger, &message)
    }
}

impl<In, Out, F> Handler for Endpoint<In, Out, F>
where
    In: Input,
    Out: Serialize + Send + 'static,
    F: BusinessFn<In, Out>,
{
    fn call(&self, req: Request<Bytes>) -> BoxedResponse {
        let endpoint = self.clone();
        Box::pin(async move { endpoint.serve(req).await })
    }
}
