// Domain records shared by the storage and booking crates.

use serde::{Deserialize, Serialize};

/// Fixed wire and storage format for every datetime string.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A fitness class as stored.
///
/// `datetime` is naive and interpreted against the current base timezone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassRecord {
    pub id: i64,
    pub name: String,
    pub datetime: String,
    pub instructor: String,
    pub available_slots: i64,
}

/// Values needed to insert a class; the id is assigned by storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewClass {
    pub name: String,
    pub datetime: String,
    pub instructor: String,
    pub available_slots: i64,
}

/// A booking as stored. Bookings are never updated or deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRecord {
    pub id: i64,
    pub class_id: i64,
    pub client_name: String,
    pub client_email: String,
    pub booked_at: String,
}

/// Values needed to insert a booking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBooking {
    pub class_id: i64,
    pub client_name: String,
    pub client_email: String,
    pub booked_at: String,
}

/// A booking joined with the name of its class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingWithClass {
    pub id: i64,
    pub class_id: i64,
    pub class_name: String,
    pub client_name: String,
    pub client_email: String,
    pub booked_at: String,
}
