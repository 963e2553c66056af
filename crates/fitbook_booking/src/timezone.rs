// --- File: crates/fitbook_booking/src/timezone.rs ---
//! Conversions between naive stored datetimes and IANA timezones.
//!
//! Stored values carry no offset; they are read against whatever base
//! timezone is current. Wall-clock times that are ambiguous resolve to the
//! earlier instant, times inside a spring-forward gap use the offset in
//! effect before the gap.

use chrono::{DateTime, Duration, NaiveDateTime, Offset, TimeZone, Utc};
use chrono_tz::Tz;
use fitbook_common::models::DATETIME_FORMAT;
use thiserror::Error;

/// Display format used by the bookings listing.
pub const DISPLAY_FORMAT_12H: &str = "%Y-%m-%d %I:%M %p";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConversionError {
    #[error("Unknown timezone: {0}")]
    UnknownTimezone(String),
    #[error("Unparseable datetime: {0}")]
    InvalidDatetime(String),
    #[error("Local time {0} cannot be placed in {1}")]
    Unrepresentable(String, String),
}

/// Parses an IANA zone name, ignoring surrounding whitespace.
pub fn parse_tz(name: &str) -> Result<Tz, ConversionError> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| ConversionError::UnknownTimezone(name.to_string()))
}

/// Parses a stored `YYYY-MM-DD HH:MM:SS` value.
pub fn parse_naive(stored: &str) -> Result<NaiveDateTime, ConversionError> {
    NaiveDateTime::parse_from_str(stored, DATETIME_FORMAT)
        .map_err(|_| ConversionError::InvalidDatetime(stored.to_string()))
}

/// Places a naive wall-clock time in `tz`.
pub fn localize(naive: NaiveDateTime, tz: Tz) -> Result<DateTime<Tz>, ConversionError> {
    if let Some(dt) = tz.from_local_datetime(&naive).earliest() {
        return Ok(dt);
    }

    // Gap: reuse the offset that applied before the transition
    let unrepresentable = || ConversionError::Unrepresentable(naive.to_string(), tz.to_string());
    let before = tz
        .from_local_datetime(&(naive - Duration::days(1)))
        .earliest()
        .ok_or_else(unrepresentable)?;
    let offset = before.offset().fix();
    offset
        .from_local_datetime(&naive)
        .single()
        .map(|dt| dt.with_timezone(&tz))
        .ok_or_else(unrepresentable)
}

/// Reinterprets a stored value from `from` and renders it in `to`.
pub fn convert_naive(stored: &str, from: Tz, to: Tz) -> Result<String, ConversionError> {
    let naive = parse_naive(stored)?;
    let local = localize(naive, from)?;
    Ok(local.with_timezone(&to).format(DATETIME_FORMAT).to_string())
}

/// Lenient display conversion: any failure yields the stored string unchanged.
pub fn display_in(stored: &str, base: Tz, target: Tz) -> String {
    convert_naive(stored, base, target).unwrap_or_else(|_| stored.to_string())
}

/// Renders a stored value on a 12-hour clock, or returns it unchanged.
pub fn format_12h(stored: &str) -> String {
    match parse_naive(stored) {
        Ok(naive) => naive.format(DISPLAY_FORMAT_12H).to_string(),
        Err(_) => stored.to_string(),
    }
}

/// Current wall-clock time in `tz`, in the storage format.
pub fn now_in(tz: Tz) -> String {
    format_at(Utc::now(), tz)
}

/// Formats an instant as wall-clock time in `tz`.
pub fn format_at(instant: DateTime<Utc>, tz: Tz) -> String {
    instant.with_timezone(&tz).format(DATETIME_FORMAT).to_string()
}
