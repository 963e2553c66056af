// Routes that do not belong to a feature crate.

use axum::{routing::get, Router};

pub const WELCOME_MESSAGE: &str = "Welcome to Fitbook Booking API";

/// Creates a router containing the common routes.
///
/// # Returns
/// A router serving the welcome text at `/`.
pub fn routes() -> Router {
    Router::new().route("/", get(|| async { WELCOME_MESSAGE }))
}
