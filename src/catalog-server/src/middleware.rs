//! HTTP middleware components.

use std::time::Instant;

use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use tracing::{error, info, warn};
use uuid::Uuid;

/// Request ID header name.
pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Request timing header name.
pub const RESPONSE_TIME_HEADER: HeaderName = HeaderName::from_static("x-response-time");

/// Request ID carried in request extensions.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// Tag each request with an ID, time it, and log the outcome.
///
/// A client-supplied `X-Request-Id` is reused; otherwise a UUID is generated.
/// Both the ID and the elapsed time are echoed as response headers.
pub async fn request_context(mut request: Request, next: Next) -> Response {
    let request_id = request
        .headers()
        .get(&REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(String::from)
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    request
        .extensions_mut()
        .insert(RequestId(request_id.clone()));

    let start = Instant::now();
    let method = request.method().clone();
    let uri = request.uri().clone();

    let mut response = next.run(request).await;

    let duration_ms = start.elapsed().as_secs_f64() * 1000.0;
    let headers = response.headers_mut();
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        headers.insert(REQUEST_ID_HEADER, value);
    }
    if let Ok(value) = HeaderValue::from_str(&format!("{duration_ms:.2}ms")) {
        headers.insert(RESPONSE_TIME_HEADER, value);
    }

    let status = response.status();
    let duration_ms = format!("{duration_ms:.2}");
    if status.is_server_error() {
        error!(%method, %uri, %status, %request_id, %duration_ms, "Server error");
    } else if status.is_client_error() {
        warn!(%method, %uri, %status, %request_id, %duration_ms, "Client error");
    } else {
        info!(%method, %uri, %status, %request_id, %duration_ms, "Request completed");
    }

    response
}
