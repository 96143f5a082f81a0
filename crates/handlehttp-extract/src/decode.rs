//! Request decoding.
//!
//! [`decode_request`] turns a request body and its query parameters into a
//! single input value: the body is decoded first, then the value's own
//! [`DecodeParams`] implementation merges the query parameters on top.

use crate::{decode_body, DecodeError, QueryParams, RequestContext, Validator};
use serde::de::DeserializeOwned;

/// Merges query parameters into an already body-decoded value.
///
/// Whatever `decode` writes overrides the same field decoded from the body.
///
/// # Example
///
/// ```rust
/// use handlehttp_extract::{DecodeError, DecodeParams, QueryParams, RequestContext};
///
/// #[derive(Default)]
/// struct Lookup {
///     id: i64,
/// }
///
/// impl DecodeParams for Lookup {
///     fn decode(&mut self, _ctx: &RequestContext, params: &QueryParams) -> Result<(), DecodeError> {
///         self.id = params.parse("id")?;
///         Ok(())
///     }
/// }
///
/// let mut lookup = Lookup::default();
/// let params = QueryParams::from_query_str("id=9").unwrap();
/// lookup.decode(&RequestContext::default(), &params).unwrap();
/// assert_eq!(lookup.id, 9);
/// ```
pub trait DecodeParams {
    /// Reads parameters into `self`.
    fn decode(&mut self, ctx: &RequestContext, params: &QueryParams) -> Result<(), DecodeError>;
}

/// Everything the dispatch pipeline needs from an input type.
///
/// Implemented automatically for every type that is deserializable,
/// decodes its parameters and validates itself.
pub trait Input: DeserializeOwned + DecodeParams + Validator + Send + 'static {}

impl<T> Input for T where T: DeserializeOwned + DecodeParams + Validator + Send + 'static {}

/// Decodes `body` and the query parameters of `ctx` into `T`.
///
/// Body decoding happens first; an empty body decodes as `{}`. The query
/// parameters are then merged by [`DecodeParams::decode`], overriding
/// same-named fields. Nothing is returned on failure.
pub fn decode_request<T>(ctx: &RequestContext, body: &[u8]) -> Result<T, DecodeError>
where
    T: DeserializeOwned + DecodeParams,
{
    let mut value: T = decode_body(body)?;
    let params = ctx.query_params()?;
    value.decode(ctx, &params)?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DecodeSource, Problems};
    use http::Uri;
    use proptest::prelude::*;
    use serde::Deserialize;

    #[derive(Debug, Default, Deserialize, PartialEq)]
    #[serde(default)]
    struct Greeting {
        message: String,
        id: i64,
    }

    impl DecodeParams for Greeting {
        fn decode(&mut self, _ctx: &RequestContext, params: &QueryParams) -> Result<(), DecodeError> {
            self.id = params.parse("id")?;
            Ok(())
        }
    }

    impl Validator for Greeting {
        fn valid(&self, _ctx: &RequestContext) -> Problems {
            Problems::new()
        }
    }

    fn ctx(uri: &str) -> RequestContext {
        RequestContext::builder()
            .uri(uri.parse::<Uri>().unwrap())
            .build()
    }

    fn assert_input<T: Input>() {}

    #[test]
    fn test_greeting_is_input() {
        assert_input::<Greeting>();
    }

    #[test]
    fn test_body_and_params_merge() {
        let greeting: Greeting =
            decode_request(&ctx("/?id=1"), br#"{"message":"Hello, World!"}"#).unwrap();

        assert_eq!(
            greeting,
            Greeting {
                message: "Hello, World!".into(),
                id: 1
            }
        );
    }

    #[test]
    fn test_params_override_body() {
        let greeting: Greeting =
            decode_request(&ctx("/?id=5"), br#"{"message":"hi","id":99}"#).unwrap();

        assert_eq!(greeting.id, 5);
        assert_eq!(greeting.message, "hi");
    }

    #[test]
    fn test_empty_body_accepted() {
        let greeting: Greeting = decode_request(&ctx("/?id=3"), b"").unwrap();

        assert_eq!(greeting.id, 3);
        assert_eq!(greeting.message, "");
    }

    #[test]
    fn test_bad_param_is_query_error() {
        let err = decode_request::<Greeting>(&ctx("/?id=abc"), b"{}").unwrap_err();

        assert_eq!(err.decode_source(), DecodeSource::Query);
        assert!(err.to_string().starts_with("decode params: "));
    }

    #[test]
    fn test_bad_body_skips_params() {
        // The bad id would fail too, but the body error must win.
        let err = decode_request::<Greeting>(&ctx("/?id=abc"), b"{not json").unwrap_err();

        assert_eq!(err.decode_source(), DecodeSource::Body);
        assert!(err.to_string().starts_with("decode json: "));
    }

    proptest! {
        #[test]
        fn prop_query_id_always_wins(body_id in any::<i64>(), query_id in any::<i64>()) {
            let body = format!(r#"{{"message":"m","id":{body_id}}}"#);
            let uri = format!("/?id={query_id}");

            let greeting: Greeting = decode_request(&ctx(&uri), body.as_bytes()).unwrap();

            prop_assert_eq!(greeting.id, query_id);
        }
    }
}
