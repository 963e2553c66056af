// File: crates/fitbook_booking/src/handlers.rs
use crate::logic::{
    book_class, list_bookings, list_classes, rebase_timezone, BaseTimezoneResponse,
    BookClassRequest, BookClassResponse, BookingSummary, BookingsQuery, ChangeTimezoneRequest,
    ClassSummary, ClassesQuery, MessageResponse, QueryPairs, MISSING_JSON_BODY,
    MISSING_NEW_TIMEZONE,
};
use crate::timezone::parse_tz;
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    response::Json,
};
use chrono_tz::Tz;
use fitbook_common::{validation_error, FitbookError};
use fitbook_config::AppConfig;
use fitbook_db::{DbClient, SqlBookingRepository, SqlClassRepository};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

/// The current base timezone. Readers hold the read lock for the whole
/// operation; a rebase holds the write lock.
pub type BaseTimezone = Arc<RwLock<Tz>>;

// Shared state needed by the booking handlers
#[derive(Clone)]
pub struct BookingState {
    pub db: DbClient,
    pub classes: SqlClassRepository,
    pub bookings: SqlBookingRepository,
    pub base_timezone: BaseTimezone,
}

impl BookingState {
    /// Builds the state with the base timezone taken from `booking.default_timezone`.
    pub fn new(config: &AppConfig, db: DbClient) -> Result<Self, FitbookError> {
        let base = parse_tz(&config.booking.default_timezone).map_err(|e| {
            FitbookError::ConfigError(format!("booking.default_timezone: {}", e))
        })?;
        Ok(Self::with_base_timezone(db, base))
    }

    pub fn with_base_timezone(db: DbClient, base: Tz) -> Self {
        Self {
            classes: SqlClassRepository::new(db.clone()),
            bookings: SqlBookingRepository::new(db.clone()),
            db,
            base_timezone: Arc::new(RwLock::new(base)),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct HealthResponse {
    pub status: String,
    pub database: String,
}

// An undecodable query string reads as an empty one
fn query_pairs(query: Result<Query<QueryPairs>, QueryRejection>) -> QueryPairs {
    match query {
        Ok(Query(pairs)) => pairs,
        Err(rejection) => {
            warn!("Ignoring query string: {}", rejection);
            Vec::new()
        }
    }
}

/// Handler to list classes, optionally shown in another timezone.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/classes",
    params(ClassesQuery),
    responses(
        (status = 200, description = "All classes in storage order", body = [ClassSummary]),
        (status = 500, description = "Internal error")
    ),
    tag = "Classes"
))]
pub async fn get_classes_handler(
    State(state): State<Arc<BookingState>>,
    query: Result<Query<QueryPairs>, QueryRejection>,
) -> Result<Json<Vec<ClassSummary>>, FitbookError> {
    let query = ClassesQuery::from_pairs(&query_pairs(query));
    let base = state.base_timezone.read().await;
    let classes = list_classes(&state.classes, *base, query.timezone.as_deref()).await?;
    Ok(Json(classes))
}

/// Handler to book a slot in a class.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/book",
    request_body = BookClassRequest,
    responses(
        (status = 201, description = "Booking stored", body = BookClassResponse),
        (status = 400, description = "Missing body or fields"),
        (status = 404, description = "Class not found"),
        (status = 409, description = "No slots available")
    ),
    tag = "Bookings"
))]
pub async fn book_class_handler(
    State(state): State<Arc<BookingState>>,
    payload: Result<Json<BookClassRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<BookClassResponse>), FitbookError> {
    let Json(request) = payload.map_err(|rejection| {
        warn!("Rejected booking body: {}", rejection);
        validation_error(MISSING_JSON_BODY)
    })?;

    let base = state.base_timezone.read().await;
    let response = book_class(&state.bookings, *base, &request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Handler to list bookings, newest first.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/bookings",
    params(BookingsQuery),
    responses(
        (status = 200, description = "Bookings with class names", body = [BookingSummary]),
        (status = 500, description = "Internal error")
    ),
    tag = "Bookings"
))]
pub async fn get_bookings_handler(
    State(state): State<Arc<BookingState>>,
    query: Result<Query<QueryPairs>, QueryRejection>,
) -> Result<Json<Vec<BookingSummary>>, FitbookError> {
    let query = BookingsQuery::from_pairs(&query_pairs(query));
    let bookings = list_bookings(&state.bookings, query.email.as_deref()).await?;
    Ok(Json(bookings))
}

/// Handler to rebase every stored class time onto a new timezone.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/admin/change_timezone",
    request_body = ChangeTimezoneRequest,
    responses(
        (status = 200, description = "Class times rewritten", body = MessageResponse),
        (status = 400, description = "Missing or unknown timezone"),
        (status = 500, description = "A stored time could not be converted; nothing changed")
    ),
    tag = "Admin"
))]
pub async fn change_timezone_handler(
    State(state): State<Arc<BookingState>>,
    payload: Result<Json<ChangeTimezoneRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, FitbookError> {
    let Json(request) = payload.map_err(|_| validation_error(MISSING_NEW_TIMEZONE))?;

    let mut base = state.base_timezone.write().await;
    let response = rebase_timezone(&state.classes, &mut *base, &request).await?;
    Ok(Json(response))
}

/// Handler reporting the current base timezone.
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/timezone",
    responses((status = 200, description = "Current base timezone", body = BaseTimezoneResponse)),
    tag = "Admin"
))]
pub async fn get_timezone_handler(
    State(state): State<Arc<BookingState>>,
) -> Json<BaseTimezoneResponse> {
    let base = state.base_timezone.read().await;
    Json(BaseTimezoneResponse {
        base_timezone: base.to_string(),
    })
}

/// Handler reporting whether the database answers.
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service and database are up", body = HealthResponse),
        (status = 503, description = "Database unreachable", body = HealthResponse)
    ),
    tag = "Admin"
))]
pub async fn health_handler(
    State(state): State<Arc<BookingState>>,
) -> (StatusCode, Json<HealthResponse>) {
    if state.db.is_healthy().await {
        (
            StatusCode::OK,
            Json(HealthResponse {
                status: "ok".to_string(),
                database: "ok".to_string(),
            }),
        )
    } else {
        info!("Health check failed: database unreachable");
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthResponse {
                status: "degraded".to_string(),
                database: "unreachable".to_string(),
            }),
        )
    }
}
