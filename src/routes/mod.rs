//! HTTP route handlers.
//!
//! Both routes opt out of upstream caching. Request logging wraps everything,
//! including the panic catcher, so a crashed handler is still logged with the
//! 500 it produced.

pub mod health;
pub mod quote;

use std::any::Any;

use axum::{
    http::StatusCode,
    middleware,
    response::Response,
    routing::get,
    Router,
};
use http::header::{HeaderValue, CACHE_CONTROL};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::config::{CACHE_CONTROL_HEALTH, CACHE_CONTROL_QUOTE, MSG_INTERNAL_ERROR, MSG_NOT_FOUND};
use crate::error::plain_text;
use crate::middleware::request_log_layer;
use crate::state::AppState;

/// Creates the Axum router with all routes, cache headers, and fallbacks.
pub fn create_router(state: AppState) -> Router {
    let quote_routes = Router::new().route("/", get(quote::random)).layer(
        SetResponseHeaderLayer::if_not_present(
            CACHE_CONTROL,
            HeaderValue::from_static(CACHE_CONTROL_QUOTE),
        ),
    );

    let health_routes = Router::new().route("/health", get(health::health)).layer(
        SetResponseHeaderLayer::if_not_present(
            CACHE_CONTROL,
            HeaderValue::from_static(CACHE_CONTROL_HEALTH),
        ),
    );

    Router::new()
        .merge(quote_routes)
        .merge(health_routes)
        .fallback(not_found)
        .with_state(state)
        // Last-resort handler: a panicking route still gets a definite response
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(middleware::from_fn(request_log_layer))
}

async fn not_found() -> Response {
    plain_text(StatusCode::NOT_FOUND, MSG_NOT_FOUND)
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic payload"
    };
    tracing::error!(panic = %detail, "Unhandled error");
    plain_text(StatusCode::INTERNAL_SERVER_ERROR, MSG_INTERNAL_ERROR)
}
