//! Repository modules for database access
//!
//! This module contains repository traits and their SQLite implementations
//! for classes and bookings.

pub mod booking;
pub mod booking_sql;
pub mod class;
pub mod class_sql;

// Re-export the repositories for ease of use
pub use booking::{BookingOutcome, BookingRepository, DbBookingWithClass};
pub use booking_sql::SqlBookingRepository;
pub use class::{ClassRepository, DbClass};
pub use class_sql::SqlClassRepository;
