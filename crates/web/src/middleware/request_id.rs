//! Request ID middleware for log correlation.
//!
//! An `x-request-id` set by an upstream proxy is reused when it looks sane,
//! otherwise a UUID v4 is generated. The ID is:
//! - Stored in request extensions as [`RequestId`]
//! - Recorded on the `http_request` span opened by the trace layer
//! - Tagged on the Sentry scope
//! - Echoed in the response headers

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use uuid::Uuid;

/// The HTTP header name for request IDs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest upstream ID that is reused as-is.
const MAX_UPSTREAM_LEN: usize = 128;

/// Correlation ID for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(pub String);

impl RequestId {
    fn from_upstream(value: &HeaderValue) -> Option<Self> {
        let value = value.to_str().ok()?.trim();
        let sane = !value.is_empty()
            && value.len() <= MAX_UPSTREAM_LEN
            && value
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
        sane.then(|| Self(value.to_owned()))
    }

    fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Middleware that ensures every request carries a request ID.
///
/// Runs outside the trace layer, so the span field is recorded by the
/// `make_span_with` closure reading [`RequestId`] from extensions.
pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(RequestId::from_upstream)
        .unwrap_or_else(RequestId::generate);

    sentry::configure_scope(|scope| {
        scope.set_tag("request_id", request_id.as_str());
    });

    request.extensions_mut().insert(request_id.clone());

    let mut response = next.run(request).await;

    if let Ok(value) = HeaderValue::from_str(request_id.as_str()) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}
