//! Request logging around the full inner call chain

use std::time::Instant;

use axum::{body::Body, extract::Request, middleware::Next, response::Response};
use chrono::Utc;

use super::request_tracking::REQUEST_ID_HEADER;

/// Log method, path, start time and elapsed duration of every request
///
/// The inner response is passed through untouched.
pub async fn log_requests(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
        .to_owned();

    let started_at = Utc::now();
    let start = Instant::now();
    tracing::info!(
        %method,
        %path,
        %request_id,
        started_at = %started_at.to_rfc3339(),
        "Started {} {}", method, path
    );

    let response = next.run(request).await;
    let elapsed = start.elapsed();

    tracing::info!(
        %method,
        %path,
        %request_id,
        status = response.status().as_u16(),
        elapsed_ms = elapsed.as_millis() as u64,
        "Completed {} in {:?}", path, elapsed
    );

    response
}
