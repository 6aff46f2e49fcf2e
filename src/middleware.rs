//! Request logging middleware.
//!
//! Every request runs inside an `http_request` span tagged with a fresh UUID v4.
//! Once the response is ready, a single "Request completed" event records the
//! final status and the elapsed milliseconds. Requests and responses pass
//! through untouched.

use std::time::Instant;

use axum::{extract::Request, middleware::Next, response::Response};
use tracing::Instrument;
use uuid::Uuid;

/// Middleware that wraps a request in its logging span and reports completion.
///
/// Install it as the outermost layer so the status it logs is the one the
/// client actually receives, including the panic catcher's 500.
pub async fn request_log_layer(request: Request, next: Next) -> Response {
    let started = Instant::now();

    // Path only: query strings stay out of the logs.
    let span = tracing::info_span!(
        "http_request",
        request_id = %Uuid::new_v4(),
        method = %request.method(),
        path = %request.uri().path(),
        duration_ms = tracing::field::Empty,
    );

    let response = next.run(request).instrument(span.clone()).await;

    let duration_ms = started.elapsed().as_millis() as u64;
    span.record("duration_ms", duration_ms);
    span.in_scope(|| {
        tracing::info!(
            status = response.status().as_u16(),
            duration_ms,
            "Request completed"
        );
    });

    response
}
