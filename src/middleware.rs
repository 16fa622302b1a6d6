use std::any::Any;

use axum::body::Bytes;
use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use axum::http::uri::PathAndQuery;
use axum::http::{header, request::Parts, HeaderMap, HeaderName, HeaderValue, Uri};
use axum::response::Response;
use axum::Router;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tower_http::set_header::SetResponseHeaderLayer;
use tracing::error;

use crate::error::{internal_error_response, AppError};

/// A JSON request body that falls back to `T::default()` when the request carries
/// no body, a non-JSON content type, or a JSON value that isn't an object.
/// Malformed JSON is an internal error.
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned + Default,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if !is_json(req.headers()) {
            return Ok(JsonBody(T::default()));
        }

        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|err| AppError::Internal(format!("reading request body: {err}")))?;
        if bytes.is_empty() {
            return Ok(JsonBody(T::default()));
        }

        let value: Value = serde_json::from_slice(&bytes)
            .map_err(|err| AppError::Internal(format!("parsing JSON body: {err}")))?;
        // Arrays would otherwise fill struct fields by position.
        if !value.is_object() {
            return Ok(JsonBody(T::default()));
        }

        serde_json::from_value(value)
            .map(JsonBody)
            .map_err(|err| AppError::Internal(format!("decoding JSON body: {err}")))
    }
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case("application/json"))
}

/// The `:id` path segment. `None` when the segment has no leading integer, which
/// matches no todo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TodoId(pub Option<i64>);

impl<S> FromRequestParts<S> for TodoId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|err| AppError::Internal(format!("extracting todo id: {err}")))?;
        Ok(TodoId(parse_id(&raw)))
    }
}

/// Reads the leading integer of `raw`: optional whitespace and sign, then digits.
/// Trailing garbage is ignored, so `"2abc"` is `2`.
pub fn parse_id(raw: &str) -> Option<i64> {
    let raw = raw.trim_start();
    let (negative, rest) = match raw.as_bytes().first() {
        Some(b'-') => (true, &raw[1..]),
        Some(b'+') => (false, &raw[1..]),
        _ => (false, raw),
    };

    let digits = rest
        .find(|c: char| !c.is_ascii_digit())
        .map_or(rest, |end| &rest[..end]);
    if digits.is_empty() {
        return None;
    }

    let value: i64 = digits.parse().ok()?;
    Some(if negative { -value } else { value })
}

const SECURITY_HEADERS: &[(&str, &str)] = &[
    ("content-security-policy", "default-src 'self'"),
    ("cross-origin-opener-policy", "same-origin"),
    ("cross-origin-resource-policy", "same-origin"),
    ("origin-agent-cluster", "?1"),
    ("referrer-policy", "no-referrer"),
    (
        "strict-transport-security",
        "max-age=15552000; includeSubDomains",
    ),
    ("x-content-type-options", "nosniff"),
    ("x-dns-prefetch-control", "off"),
    ("x-download-options", "noopen"),
    ("x-frame-options", "SAMEORIGIN"),
    ("x-permitted-cross-domain-policies", "none"),
    ("x-xss-protection", "0"),
];

/// Adds the hardening headers to every response that doesn't already set them.
pub fn with_security_headers(router: Router) -> Router {
    SECURITY_HEADERS.iter().fold(router, |router, &(name, value)| {
        router.layer(SetResponseHeaderLayer::if_not_present(
            HeaderName::from_static(name),
            HeaderValue::from_static(value),
        ))
    })
}

/// Lowercases the request path so routes match regardless of case. The query is kept as is.
pub fn lowercase_path(mut req: Request) -> Request {
    let uri = req.uri();
    if !uri.path().bytes().any(|b| b.is_ascii_uppercase()) {
        return req;
    }

    let path = uri.path().to_ascii_lowercase();
    let path_and_query = match uri.query() {
        Some(query) => format!("{path}?{query}"),
        None => path,
    };

    let mut parts = uri.clone().into_parts();
    if let Ok(path_and_query) = PathAndQuery::try_from(path_and_query) {
        parts.path_and_query = Some(path_and_query);
        if let Ok(uri) = Uri::from_parts(parts) {
            *req.uri_mut() = uri;
        }
    }
    req
}

/// Turns a handler panic into the generic 500 body.
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        *s
    } else {
        "unknown panic payload"
    };
    error!(%detail, "Handler panicked");
    internal_error_response()
}
