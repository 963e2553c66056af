//! SQL implementation of the class repository

use crate::error::DbError;
use crate::repositories::class::{ClassRecord, ClassRepository, DbClass, NewClass};
use crate::DbClient;
use tracing::{debug, error, info, warn};

const SELECT_CLASSES: &str =
    "SELECT id, name, datetime, instructor, available_slots FROM classes";

/// SQL implementation of the class repository
#[derive(Debug, Clone)]
pub struct SqlClassRepository {
    db_client: DbClient,
}

impl SqlClassRepository {
    pub fn new(db_client: DbClient) -> Self {
        Self { db_client }
    }
}

impl ClassRepository for SqlClassRepository {
    async fn find_all(&self) -> Result<Vec<ClassRecord>, DbError> {
        let query = format!("{SELECT_CLASSES} ORDER BY id");

        let rows = sqlx::query_as::<_, DbClass>(&query)
            .fetch_all(self.db_client.pool())
            .await
            .map_err(|e| {
                error!("Failed to list classes: {}", e);
                DbError::QueryError(e.to_string())
            })?;

        debug!("Found {} classes", rows.len());
        Ok(rows.into_iter().map(ClassRecord::from).collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<ClassRecord>, DbError> {
        let query = format!("{SELECT_CLASSES} WHERE id = ?");

        let row = sqlx::query_as::<_, DbClass>(&query)
            .bind(id)
            .fetch_optional(self.db_client.pool())
            .await
            .map_err(|e| {
                error!("Failed to find class {}: {}", id, e);
                DbError::QueryError(e.to_string())
            })?;

        Ok(row.map(ClassRecord::from))
    }

    async fn insert(&self, class: NewClass) -> Result<ClassRecord, DbError> {
        debug!("Inserting class: {} at {}", class.name, class.datetime);

        let result = sqlx::query(
            "INSERT INTO classes (name, datetime, instructor, available_slots) VALUES (?, ?, ?, ?)",
        )
        .bind(&class.name)
        .bind(&class.datetime)
        .bind(&class.instructor)
        .bind(class.available_slots)
        .execute(self.db_client.pool())
        .await
        .map_err(|e| {
            error!("Failed to insert class: {}", e);
            DbError::QueryError(e.to_string())
        })?;

        Ok(ClassRecord {
            id: result.last_insert_rowid(),
            name: class.name,
            datetime: class.datetime,
            instructor: class.instructor,
            available_slots: class.available_slots,
        })
    }

    async fn rewrite_datetimes<F>(&self, rewrite: F) -> Result<usize, DbError>
    where
        F: Fn(&str) -> Option<String> + Send + Sync,
    {
        let mut tx = self.db_client.begin().await?;

        let rows: Vec<(i64, String)> =
            sqlx::query_as("SELECT id, datetime FROM classes ORDER BY id")
                .fetch_all(&mut *tx)
                .await?;

        for (id, stored) in &rows {
            let Some(updated) = rewrite(stored) else {
                warn!("Class {} has unparseable datetime {:?}; rolling back", id, stored);
                tx.rollback()
                    .await
                    .map_err(|e| DbError::TransactionError(e.to_string()))?;
                return Err(DbError::InvalidData(format!(
                    "class {} has invalid datetime '{}'",
                    id, stored
                )));
            };

            sqlx::query("UPDATE classes SET datetime = ? WHERE id = ?")
                .bind(&updated)
                .bind(id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionError(e.to_string()))?;

        info!("Rewrote datetimes of {} classes", rows.len());
        Ok(rows.len())
    }
}
