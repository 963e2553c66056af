use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

use crate::error::{FitbookError, HttpStatusCode};

/// Extension trait for FitbookError to convert it to an Axum HTTP response.
pub trait IntoHttpResponse {
    /// Converts the error into an Axum HTTP response.
    fn into_http_response(self) -> Response;
}

impl IntoHttpResponse for FitbookError {
    fn into_http_response(self) -> Response {
        let status_code =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status_code.is_server_error() {
            error!("Request failed: {}", self);
        }

        // Validation failures are reported as a list so every field shows up
        let body = match self {
            FitbookError::ValidationError(messages) => Json(json!({ "error": messages })),
            other => Json(json!({ "error": other.public_message() })),
        };

        (status_code, body).into_response()
    }
}

/// Implement IntoResponse for FitbookError to make it easier to use in Axum handlers.
impl IntoResponse for FitbookError {
    fn into_response(self) -> Response {
        self.into_http_response()
    }
}

/// Builds a `{"error": message}` response with the given status.
pub fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}
