//! Repository for fitness classes

use crate::error::DbError;
use sqlx::FromRow;

pub use fitbook_common::models::{ClassRecord, NewClass};

// DB-side row for the classes table
#[derive(Debug, Clone, FromRow)]
pub struct DbClass {
    pub id: i64,
    pub name: String,
    pub datetime: String,
    pub instructor: String,
    pub available_slots: i64,
}

impl From<DbClass> for ClassRecord {
    fn from(db: DbClass) -> Self {
        Self {
            id: db.id,
            name: db.name,
            datetime: db.datetime,
            instructor: db.instructor,
            available_slots: db.available_slots,
        }
    }
}

/// Repository for fitness classes
pub trait ClassRepository {
    /// All classes in storage order (ascending id)
    fn find_all(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<ClassRecord>, DbError>> + Send;

    /// Find a class by id. No handler needs it; tests use it to inspect slot counts.
    fn find_by_id(
        &self,
        id: i64,
    ) -> impl std::future::Future<Output = Result<Option<ClassRecord>, DbError>> + Send;

    /// Insert a class
    ///
    /// # Returns
    ///
    /// The stored class with its assigned id
    fn insert(
        &self,
        class: NewClass,
    ) -> impl std::future::Future<Output = Result<ClassRecord, DbError>> + Send;

    /// Rewrite the datetime of every class in a single transaction
    ///
    /// `rewrite` maps a stored datetime string to its replacement. If it
    /// returns `None` for any class the transaction is rolled back and
    /// `DbError::InvalidData` is returned, leaving every row untouched.
    ///
    /// # Returns
    ///
    /// The number of classes rewritten
    fn rewrite_datetimes<F>(
        &self,
        rewrite: F,
    ) -> impl std::future::Future<Output = Result<usize, DbError>> + Send
    where
        F: Fn(&str) -> Option<String> + Send + Sync;
}
