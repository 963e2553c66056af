// File: services/fitbook_backend/src/main.rs
mod app;

use fitbook_booking::BookingState;
use fitbook_common::{log_result, logging, Context, FitbookError};
use fitbook_config::load_config;
use fitbook_db::{init_schema, DbClient};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), FitbookError> {
    let config = load_config()?;
    logging::init_with_level(logging::parse_level(&config.logging.level));

    let db = DbClient::from_config(&config.database).await?;
    log_result(init_schema(&db).await, "Schema ready", "Schema setup failed")?;

    let state = Arc::new(BookingState::new(&config, db)?);
    if config.booking.seed_on_startup {
        log_result(app::reseed(&state).await, "Demo data loaded", "Seeding failed")?;
    }
    info!("Base timezone is {}", config.booking.default_timezone);

    let app = app::build_router(state);

    // Bind and serve
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .context(format!("Failed to bind {}", addr))?;
    info!("Starting server at http://{}", addr);

    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}
