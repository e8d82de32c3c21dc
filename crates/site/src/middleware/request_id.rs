//! Request ID middleware for request correlation.
//!
//! Every request carries an `x-request-id`: either the value a reverse
//! proxy already assigned, or a fresh UUID v4. The ID is recorded on the
//! request span, tagged on the Sentry scope, and echoed on the response.

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use tracing::Span;
use uuid::Uuid;

/// The HTTP header name for request IDs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Middleware that assigns each request a correlation ID.
///
/// An `x-request-id` supplied by an upstream proxy wins; otherwise a new
/// UUID v4 is generated. The ID is recorded in the current tracing span,
/// set as a Sentry tag, and added to the response headers.
pub async fn request_id_middleware(request: Request, next: Next) -> Response {
    let request_id = incoming_request_id(&request).unwrap_or_else(|| Uuid::new_v4().to_string());

    // Record in the span opened by TraceLayer so log lines correlate
    Span::current().record("request_id", &request_id);

    sentry::configure_scope(|scope| {
        scope.set_tag("request_id", &request_id);
    });

    let mut response = next.run(request).await;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}

fn incoming_request_id(request: &Request) -> Option<String> {
    request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(String::from)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::Body;

    use super::*;

    #[test]
    fn test_incoming_request_id_prefers_header() {
        let request = axum::http::Request::builder()
            .header(REQUEST_ID_HEADER, "proxy-assigned")
            .body(Body::empty())
            .unwrap();

        assert_eq!(
            incoming_request_id(&request).as_deref(),
            Some("proxy-assigned")
        );
    }

    #[test]
    fn test_incoming_request_id_absent() {
        let request = axum::http::Request::builder().body(Body::empty()).unwrap();
        assert_eq!(incoming_request_id(&request), None);
    }
}
