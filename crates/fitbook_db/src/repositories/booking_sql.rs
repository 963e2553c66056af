//! SQL implementation of the booking repository

use crate::error::DbError;
use crate::repositories::booking::{
    BookingOutcome, BookingRecord, BookingRepository, BookingWithClass, DbBookingWithClass,
    NewBooking,
};
use crate::DbClient;
use tracing::{debug, error, info};

const SELECT_BOOKINGS_WITH_CLASS: &str = r#"
    SELECT b.id AS id, b.class_id AS class_id, c.name AS class_name,
           b.client_name AS client_name, b.client_email AS client_email,
           b.booked_at AS booked_at
    FROM bookings b
    JOIN classes c ON c.id = b.class_id
"#;

/// SQL implementation of the booking repository
#[derive(Debug, Clone)]
pub struct SqlBookingRepository {
    /// The database client
    db_client: DbClient,
}

impl SqlBookingRepository {
    /// Create a new SQL booking repository
    pub fn new(db_client: DbClient) -> Self {
        Self { db_client }
    }
}

impl BookingRepository for SqlBookingRepository {
    async fn book(&self, booking: NewBooking) -> Result<BookingOutcome, DbError> {
        debug!("Booking class {} for {}", booking.class_id, booking.client_email);

        let mut tx = self.db_client.begin().await?;

        // Writing first takes the database write lock up front
        let taken = sqlx::query(
            "UPDATE classes SET available_slots = available_slots - 1 \
             WHERE id = ? AND available_slots > 0",
        )
        .bind(booking.class_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            error!("Failed to reserve slot: {}", e);
            DbError::QueryError(e.to_string())
        })?
        .rows_affected();

        if taken == 0 {
            let exists: Option<i64> = sqlx::query_scalar("SELECT id FROM classes WHERE id = ?")
                .bind(booking.class_id)
                .fetch_optional(&mut *tx)
                .await?;
            tx.rollback()
                .await
                .map_err(|e| DbError::TransactionError(e.to_string()))?;

            return Ok(match exists {
                Some(_) => BookingOutcome::NoSlotsAvailable,
                None => BookingOutcome::ClassNotFound,
            });
        }

        let result = sqlx::query(
            "INSERT INTO bookings (class_id, client_name, client_email, booked_at) \
             VALUES (?, ?, ?, ?)",
        )
        .bind(booking.class_id)
        .bind(&booking.client_name)
        .bind(&booking.client_email)
        .bind(&booking.booked_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            error!("Failed to insert booking: {}", e);
            DbError::QueryError(e.to_string())
        })?;

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionError(e.to_string()))?;

        let record = BookingRecord {
            id: result.last_insert_rowid(),
            class_id: booking.class_id,
            client_name: booking.client_name,
            client_email: booking.client_email,
            booked_at: booking.booked_at,
        };
        info!("Booking {} stored for class {}", record.id, record.class_id);
        Ok(BookingOutcome::Booked(record))
    }

    async fn find_with_class(&self, email: Option<&str>) -> Result<Vec<BookingWithClass>, DbError> {
        let rows = match email {
            Some(email) => {
                let query = format!(
                    "{SELECT_BOOKINGS_WITH_CLASS} WHERE b.client_email = ? \
                     ORDER BY b.booked_at DESC, b.id DESC"
                );
                sqlx::query_as::<_, DbBookingWithClass>(&query)
                    .bind(email)
                    .fetch_all(self.db_client.pool())
                    .await
            }
            None => {
                let query = format!(
                    "{SELECT_BOOKINGS_WITH_CLASS} ORDER BY b.booked_at DESC, b.id DESC"
                );
                sqlx::query_as::<_, DbBookingWithClass>(&query)
                    .fetch_all(self.db_client.pool())
                    .await
            }
        }
        .map_err(|e| {
            error!("Failed to list bookings: {}", e);
            DbError::QueryError(e.to_string())
        })?;

        Ok(rows.into_iter().map(BookingWithClass::from).collect())
    }

    async fn count_for_class(&self, class_id: i64) -> Result<i64, DbError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM bookings WHERE class_id = ?")
            .bind(class_id)
            .fetch_one(self.db_client.pool())
            .await?;
        Ok(count)
    }
}
