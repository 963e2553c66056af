//! Database integration for Fitbook
//!
//! This crate provides a SQLite-backed database client built on SQLx, the
//! schema for classes and bookings, and repository traits with their SQL
//! implementations.
//!
//! # Example
//!
//! ```rust,no_run
//! use fitbook_config::DatabaseConfig;
//! use fitbook_db::{init_schema, DbClient};
//!
//! async fn setup_db() -> Result<DbClient, Box<dyn std::error::Error>> {
//!     let db_client = DbClient::from_config(&DatabaseConfig::default()).await?;
//!     init_schema(&db_client).await?;
//!     Ok(db_client)
//! }
//! ```

pub mod client;
pub mod error;
pub mod repositories;
pub mod schema;

// Re-export the client, error and schema helpers for ease of use
pub use client::{DbClient, DbTransaction};
pub use error::DbError;
pub use schema::{clear_all, init_schema};

// Re-export the repositories module components for ease of use
pub use repositories::{
    BookingOutcome, BookingRepository, ClassRepository, SqlBookingRepository, SqlClassRepository,
};
