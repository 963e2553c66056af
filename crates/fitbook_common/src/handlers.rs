// Handlers shared by every router: the JSON 404 fallback and the response
// produced when a handler panics.

use axum::{http::StatusCode, response::Response};
use std::any::Any;
use tracing::error;

use crate::http::error_response;

/// Fallback for unmatched routes.
pub async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

/// Turns a caught handler panic into a JSON 500.
///
/// Meant for `tower_http::catch_panic::CatchPanicLayer::custom`.
pub fn panic_handler(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };
    error!("Handler panicked: {}", detail);

    error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
}
