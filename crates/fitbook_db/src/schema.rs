//! Schema management for the classes and bookings tables

use crate::error::DbError;
use crate::DbClient;
use tracing::{debug, info};

const CREATE_CLASSES: &str = r#"
    CREATE TABLE IF NOT EXISTS classes (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        datetime TEXT NOT NULL,
        instructor TEXT NOT NULL,
        available_slots INTEGER NOT NULL CHECK (available_slots >= 0)
    )
"#;

const CREATE_BOOKINGS: &str = r#"
    CREATE TABLE IF NOT EXISTS bookings (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        class_id INTEGER NOT NULL REFERENCES classes(id),
        client_name TEXT NOT NULL,
        client_email TEXT NOT NULL,
        booked_at TEXT NOT NULL
    )
"#;

const CREATE_BOOKINGS_EMAIL_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_bookings_client_email ON bookings (client_email)";

/// Create the tables if they don't already exist.
pub async fn init_schema(db: &DbClient) -> Result<(), DbError> {
    debug!("Initializing fitbook schema");

    db.execute(CREATE_CLASSES).await?;
    db.execute(CREATE_BOOKINGS).await?;
    db.execute(CREATE_BOOKINGS_EMAIL_INDEX).await?;

    info!("Fitbook schema initialized successfully");
    Ok(())
}

/// Remove every booking and class and restart id numbering.
///
/// Runs in a single transaction; used before seeding demo data.
pub async fn clear_all(db: &DbClient) -> Result<(), DbError> {
    let mut tx = db.begin().await?;

    sqlx::query("DELETE FROM bookings").execute(&mut *tx).await?;
    sqlx::query("DELETE FROM classes").execute(&mut *tx).await?;
    // sqlite_sequence only exists once an AUTOINCREMENT row has been written
    let has_sequence: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'sqlite_sequence'",
    )
    .fetch_one(&mut *tx)
    .await?;
    if has_sequence > 0 {
        sqlx::query("DELETE FROM sqlite_sequence WHERE name IN ('classes', 'bookings')")
            .execute(&mut *tx)
            .await?;
    }

    tx.commit()
        .await
        .map_err(|e| DbError::TransactionError(e.to_string()))?;

    info!("Cleared all classes and bookings");
    Ok(())
}
