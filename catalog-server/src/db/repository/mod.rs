//! Repository Module
//!
//! CRUD and aggregation queries over the SurrealDB catalog tables.
//!
//! Record keys are stored as plain strings and projected back with
//! `record::id(id) AS id`, so API payloads never carry `table:key` ids.

pub mod category;
pub mod product;

pub use category::{CategoryDocument, CategoryRepository};
pub use product::{ProductDocument, ProductPatch, ProductRepository};

use shared::error::AppError;
use surrealdb::RecordId;
use thiserror::Error;

use super::Storage;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::Duplicate(msg) => AppError::conflict(msg),
            RepoError::Database(msg) => AppError::database(msg),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// `SELECT count() AS total ... GROUP ALL` row
#[derive(Debug, serde::Deserialize)]
pub(crate) struct CountRow {
    pub total: u64,
}

/// Thin wrapper over the storage handle shared by repositories
#[derive(Clone)]
pub struct BaseRepository {
    db: Storage,
}

impl BaseRepository {
    pub fn new(db: Storage) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Storage {
        &self.db
    }
}

pub(crate) fn record(table: &str, key: &str) -> RecordId {
    RecordId::from_table_key(table, key)
}
