// --- File: crates/fitbook_booking/src/lib.rs ---
// Declare modules within this crate
pub mod doc;
pub mod handlers;
pub mod logic;
#[cfg(test)]
mod logic_proptest;
pub mod routes;
pub mod timezone;

pub use handlers::{BaseTimezone, BookingState};
pub use routes::routes;
