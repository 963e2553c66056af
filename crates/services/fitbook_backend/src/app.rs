// File: services/fitbook_backend/src/app.rs
//! Router assembly and startup data for the backend binary.

use axum::Router;
use chrono::Utc;
use fitbook_booking::logic::seed_demo_classes;
use fitbook_booking::{routes as booking_routes, BookingState};
use fitbook_common::handlers::{not_found_handler, panic_handler};
use fitbook_common::FitbookError;
use fitbook_db::clear_all;
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Builds the complete application router.
pub fn build_router(state: Arc<BookingState>) -> Router {
    #[allow(unused_mut)] // mutated only with the openapi feature
    let mut app = fitbook_common::routes().merge(booking_routes(state));

    // Conditionally add Swagger UI and JSON endpoint if openapi feature enabled
    #[cfg(feature = "openapi")]
    {
        use fitbook_booking::doc::BookingApiDoc;
        use utoipa::OpenApi;
        use utoipa_swagger_ui::SwaggerUi;

        #[derive(OpenApi)]
        #[openapi(
            info(
                title = "Fitbook API",
                version = "0.1.0",
                description = "Fitness class booking service",
                license(name = "MIT", url = "https://opensource.org/licenses/MIT")
            ),
            tags((name = "Fitbook", description = "Core service endpoints")),
        )]
        struct ApiDoc;

        let mut openapi_doc = ApiDoc::openapi();
        openapi_doc.merge(BookingApiDoc::openapi());
        info!("Adding Swagger UI at /docs");
        app = app.merge(SwaggerUi::new("/docs").url("/docs/openapi.json", openapi_doc));
    }

    app.fallback(not_found_handler)
        .layer(CatchPanicLayer::custom(panic_handler))
        .layer(TraceLayer::new_for_http())
}

/// Empties both tables and inserts the demo classes relative to now.
pub async fn reseed(state: &BookingState) -> Result<(), FitbookError> {
    clear_all(&state.db).await?;
    let base = *state.base_timezone.read().await;
    let seeded = seed_demo_classes(&state.classes, base, Utc::now()).await?;
    info!("Startup seed inserted {} classes", seeded.len());
    Ok(())
}
