// --- File: crates/fitbook_booking/src/logic.rs ---
use crate::timezone::{self, ConversionError};
use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use fitbook_common::models::{BookingWithClass, ClassRecord, NewBooking, NewClass};
use fitbook_common::error::internal_error;
use fitbook_common::{conflict, invalid_timezone, not_found, validation_error, FitbookError};
use fitbook_db::{BookingOutcome, BookingRepository, ClassRepository, DbError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

pub const MISSING_JSON_BODY: &str = "Missing JSON body";
pub const MISSING_NEW_TIMEZONE: &str = "Missing new_timezone in request body";
pub const BOOKING_SUCCESSFUL: &str = "Booking successful";

impl From<ConversionError> for FitbookError {
    fn from(err: ConversionError) -> Self {
        match err {
            ConversionError::UnknownTimezone(_) => invalid_timezone("Invalid timezone"),
            other => internal_error(other),
        }
    }
}

// --- Data Structures ---

/// Decoded query string pairs, in request order.
pub type QueryPairs = Vec<(String, String)>;

// Repeated keys keep their first value
fn first_value(pairs: &[(String, String)], key: &str) -> Option<String> {
    pairs
        .iter()
        .find(|(name, _)| name == key)
        .map(|(_, value)| value.clone())
}

#[derive(Deserialize, Debug, Default)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams, utoipa::ToSchema))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
pub struct ClassesQuery {
    /// IANA zone to display class times in; defaults to the base timezone
    #[cfg_attr(feature = "openapi", schema(example = "Europe/London"))]
    pub timezone: Option<String>,
}

impl ClassesQuery {
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        Self {
            timezone: first_value(pairs, "timezone"),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct ClassSummary {
    pub id: i64,
    pub name: String,
    #[cfg_attr(feature = "openapi", schema(example = "2025-06-10 07:00:00"))]
    pub datetime: String,
    pub instructor: String,
    pub available_slots: i64,
}

impl ClassSummary {
    /// Builds the summary with `datetime` shown in `target`.
    pub fn from_record(record: ClassRecord, base: Tz, target: Option<Tz>) -> Self {
        let datetime = match target {
            Some(target) => timezone::display_in(&record.datetime, base, target),
            None => record.datetime,
        };
        Self {
            id: record.id,
            name: record.name,
            datetime,
            instructor: record.instructor,
            available_slots: record.available_slots,
        }
    }
}

#[derive(Deserialize, Debug, Default, Clone)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct BookClassRequest {
    #[cfg_attr(feature = "openapi", schema(value_type = Option<i64>, example = 1))]
    pub class_id: Option<Value>,
    #[cfg_attr(feature = "openapi", schema(example = "Jane Doe"))]
    pub client_name: Option<String>,
    #[cfg_attr(feature = "openapi", schema(example = "jane@example.com"))]
    pub client_email: Option<String>,
}

/// A booking request that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidBooking {
    pub class_id: i64,
    pub client_name: String,
    pub client_email: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct BookClassResponse {
    pub message: String,
    pub booking_id: i64,
}

#[derive(Deserialize, Debug, Default)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams, utoipa::ToSchema))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
pub struct BookingsQuery {
    /// Only list bookings made with this email
    #[cfg_attr(feature = "openapi", schema(example = "jane@example.com"))]
    pub email: Option<String>,
}

impl BookingsQuery {
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        Self {
            email: first_value(pairs, "email"),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct BookingSummary {
    pub booking_id: i64,
    pub class_id: i64,
    pub class_name: String,
    pub client_name: String,
    pub client_email: String,
    #[cfg_attr(feature = "openapi", schema(example = "2025-06-01 09:30 AM"))]
    pub booked_at: String,
}

impl BookingSummary {
    pub fn from_row(row: BookingWithClass) -> Self {
        Self {
            booking_id: row.id,
            class_id: row.class_id,
            class_name: row.class_name,
            client_name: row.client_name,
            client_email: row.client_email,
            booked_at: timezone::format_12h(&row.booked_at),
        }
    }
}

#[derive(Deserialize, Debug, Default, Clone)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct ChangeTimezoneRequest {
    #[cfg_attr(feature = "openapi", schema(example = "UTC"))]
    pub new_timezone: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct BaseTimezoneResponse {
    #[cfg_attr(feature = "openapi", schema(example = "Asia/Kolkata"))]
    pub base_timezone: String,
}

// --- Validation ---

fn required_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

// Absent, null, 0, false and "" all count as missing
fn class_id_value(value: Option<&Value>) -> Result<i64, &'static str> {
    match value {
        None | Some(Value::Null) | Some(Value::Bool(false)) => Err("class_id is required"),
        Some(Value::Number(n)) => match n.as_i64() {
            Some(0) => Err("class_id is required"),
            Some(id) => Ok(id),
            None if n.as_f64() == Some(0.0) => Err("class_id is required"),
            None => Err("class_id must be an integer"),
        },
        Some(Value::String(s)) if s.trim().is_empty() => Err("class_id is required"),
        Some(Value::String(s)) => match s.trim().parse::<i64>() {
            Ok(0) => Err("class_id is required"),
            Ok(id) => Ok(id),
            Err(_) => Err("class_id must be an integer"),
        },
        Some(_) => Err("class_id must be an integer"),
    }
}

/// Checks every field and reports all failures together.
pub fn validate_booking(request: &BookClassRequest) -> Result<ValidBooking, FitbookError> {
    let mut errors = Vec::new();

    let class_id = match class_id_value(request.class_id.as_ref()) {
        Ok(id) => Some(id),
        Err(msg) => {
            errors.push(msg.to_string());
            None
        }
    };
    let client_name = required_text(request.client_name.as_deref());
    if client_name.is_none() {
        errors.push("client_name is required".to_string());
    }
    let client_email = required_text(request.client_email.as_deref());
    if client_email.is_none() {
        errors.push("client_email is required".to_string());
    }

    match (class_id, client_name, client_email) {
        (Some(class_id), Some(client_name), Some(client_email)) if errors.is_empty() => {
            Ok(ValidBooking {
                class_id,
                client_name,
                client_email,
            })
        }
        _ => Err(FitbookError::ValidationError(errors)),
    }
}

// --- Operations ---

/// Lists every class with its time shown in `target` (or the base timezone).
///
/// An unknown target falls back to the stored strings.
pub async fn list_classes<R: ClassRepository>(
    classes: &R,
    base: Tz,
    target: Option<&str>,
) -> Result<Vec<ClassSummary>, FitbookError> {
    let target_tz = match target.map(str::trim).filter(|s| !s.is_empty()) {
        Some(name) => match timezone::parse_tz(name) {
            Ok(tz) => Some(tz),
            Err(_) => {
                debug!("Unknown display timezone '{}', returning stored times", name);
                None
            }
        },
        None => Some(base),
    };

    let records = classes.find_all().await?;
    Ok(records
        .into_iter()
        .map(|record| ClassSummary::from_record(record, base, target_tz))
        .collect())
}

/// Reserves a slot and records the booking, stamped with the current time in `base`.
pub async fn book_class<B: BookingRepository>(
    bookings: &B,
    base: Tz,
    request: &BookClassRequest,
) -> Result<BookClassResponse, FitbookError> {
    let valid = validate_booking(request)?;

    let outcome = bookings
        .book(NewBooking {
            class_id: valid.class_id,
            client_name: valid.client_name,
            client_email: valid.client_email,
            booked_at: timezone::now_in(base),
        })
        .await?;

    match outcome {
        BookingOutcome::Booked(record) => {
            info!(
                "Booked class {} for {} (booking {})",
                record.class_id, record.client_email, record.id
            );
            Ok(BookClassResponse {
                message: BOOKING_SUCCESSFUL.to_string(),
                booking_id: record.id,
            })
        }
        BookingOutcome::ClassNotFound => {
            warn!("Booking rejected: class {} not found", valid.class_id);
            Err(not_found("Class not found"))
        }
        BookingOutcome::NoSlotsAvailable => {
            warn!("Booking rejected: class {} is full", valid.class_id);
            Err(conflict("No slots available"))
        }
    }
}

/// Lists bookings newest first, optionally only those for one email.
pub async fn list_bookings<B: BookingRepository>(
    bookings: &B,
    email: Option<&str>,
) -> Result<Vec<BookingSummary>, FitbookError> {
    let email = email.map(str::trim).filter(|s| !s.is_empty());
    let rows = bookings.find_with_class(email).await?;
    Ok(rows.into_iter().map(BookingSummary::from_row).collect())
}

/// Rewrites every stored class time from `base` into the requested zone, then
/// switches `base` to it.
///
/// Nothing is written unless the new zone is valid and every stored value
/// converts. `base` is only changed after the rewrite committed.
pub async fn rebase_timezone<R: ClassRepository>(
    classes: &R,
    base: &mut Tz,
    request: &ChangeTimezoneRequest,
) -> Result<MessageResponse, FitbookError> {
    let name = request
        .new_timezone
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| validation_error(MISSING_NEW_TIMEZONE))?;
    let new_tz = timezone::parse_tz(name)?;

    let old_tz = *base;
    let rewritten = classes
        .rewrite_datetimes(move |stored| timezone::convert_naive(stored, old_tz, new_tz).ok())
        .await
        .map_err(|e| match e {
            DbError::InvalidData(detail) => internal_error(format!("Rebase aborted: {}", detail)),
            other => other.into(),
        })?;

    *base = new_tz;
    info!("Rebased {} classes from {} to {}", rewritten, old_tz, new_tz);

    Ok(MessageResponse {
        message: format!("All class times updated to new base timezone: {}", new_tz),
    })
}

/// Demo classes inserted at startup, as (name, offset from now, instructor, slots).
pub fn demo_classes() -> Vec<(&'static str, Duration, &'static str, i64)> {
    vec![
        ("Yoga", Duration::days(1) + Duration::hours(7), "Alice", 10),
        ("Zumba", Duration::days(2) + Duration::hours(9), "Bob", 15),
        ("HIIT", Duration::days(3) + Duration::hours(18), "Charlie", 8),
    ]
}

/// Inserts the demo classes with times relative to `now`, expressed in `base`.
pub async fn seed_demo_classes<R: ClassRepository>(
    classes: &R,
    base: Tz,
    now: DateTime<Utc>,
) -> Result<Vec<ClassRecord>, FitbookError> {
    let mut seeded = Vec::new();
    for (name, offset, instructor, slots) in demo_classes() {
        let record = classes
            .insert(NewClass {
                name: name.to_string(),
                datetime: timezone::format_at(now + offset, base),
                instructor: instructor.to_string(),
                available_slots: slots,
            })
            .await?;
        seeded.push(record);
    }
    info!("Seeded {} demo classes in {}", seeded.len(), base);
    Ok(seeded)
}
