// --- File: crates/fitbook_booking/src/routes.rs ---

use crate::handlers::{
    book_class_handler, change_timezone_handler, get_bookings_handler, get_classes_handler,
    get_timezone_handler, health_handler, BookingState,
};
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// Creates a router containing all class, booking and timezone routes.
pub fn routes(state: Arc<BookingState>) -> Router {
    Router::new()
        .route("/classes", get(get_classes_handler))
        .route("/book", post(book_class_handler))
        .route("/bookings", get(get_bookings_handler))
        .route("/change_timezone", post(change_timezone_handler))
        .route("/admin/change_timezone", post(change_timezone_handler))
        .route("/timezone", get(get_timezone_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}
