//! Repository for bookings

use crate::error::DbError;
use sqlx::FromRow;

pub use fitbook_common::models::{BookingRecord, BookingWithClass, NewBooking};

// Joined booking/class row
#[derive(Debug, Clone, FromRow)]
pub struct DbBookingWithClass {
    pub id: i64,
    pub class_id: i64,
    pub class_name: String,
    pub client_name: String,
    pub client_email: String,
    pub booked_at: String,
}

impl From<DbBookingWithClass> for BookingWithClass {
    fn from(db: DbBookingWithClass) -> Self {
        Self {
            id: db.id,
            class_id: db.class_id,
            class_name: db.class_name,
            client_name: db.client_name,
            client_email: db.client_email,
            booked_at: db.booked_at,
        }
    }
}

/// Result of an attempt to reserve a slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingOutcome {
    /// The slot was taken and the booking stored
    Booked(BookingRecord),
    /// No class has the requested id
    ClassNotFound,
    /// The class exists but has no slots left
    NoSlotsAvailable,
}

/// Repository for bookings
pub trait BookingRepository {
    /// Reserve one slot of a class and record the booking
    ///
    /// The slot decrement and the insert run in one transaction; either both
    /// apply or neither does. Concurrent callers can never drive
    /// `available_slots` below zero.
    fn book(
        &self,
        booking: NewBooking,
    ) -> impl std::future::Future<Output = Result<BookingOutcome, DbError>> + Send;

    /// Bookings joined with their class names, newest first
    ///
    /// # Arguments
    ///
    /// * `email` - Only return bookings with exactly this client email
    fn find_with_class(
        &self,
        email: Option<&str>,
    ) -> impl std::future::Future<Output = Result<Vec<BookingWithClass>, DbError>> + Send;

    /// Number of bookings recorded for a class. Test support for checking
    /// that slots and bookings agree.
    fn count_for_class(
        &self,
        class_id: i64,
    ) -> impl std::future::Future<Output = Result<i64, DbError>> + Send;
}
