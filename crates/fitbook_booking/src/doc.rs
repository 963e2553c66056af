// File: crates/fitbook_booking/src/doc.rs

#![cfg(feature = "openapi")]
use utoipa::OpenApi;

use crate::handlers::HealthResponse;
use crate::logic::{
    BaseTimezoneResponse, BookClassRequest, BookClassResponse, BookingSummary,
    ChangeTimezoneRequest, ClassSummary, MessageResponse,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::get_classes_handler,
        crate::handlers::book_class_handler,
        crate::handlers::get_bookings_handler,
        crate::handlers::change_timezone_handler,
        crate::handlers::get_timezone_handler,
        crate::handlers::health_handler
    ),
    components(
        schemas(
            ClassSummary,
            BookClassRequest,
            BookClassResponse,
            BookingSummary,
            ChangeTimezoneRequest,
            MessageResponse,
            BaseTimezoneResponse,
            HealthResponse
        )
    ),
    tags(
        (name = "Classes", description = "Fitness class listing"),
        (name = "Bookings", description = "Slot reservation and booking history"),
        (name = "Admin", description = "Base timezone and health")
    )
)]
pub struct BookingApiDoc;
