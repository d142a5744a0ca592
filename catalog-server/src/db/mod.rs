//! Database Module
//!
//! Opens the SurrealDB connection (any engine: `mem://`, `rocksdb://`,
//! `ws://`) and bootstraps the catalog schema.

pub mod repository;

use std::future::IntoFuture;
use std::path::Path;

use shared::error::{AppError, ErrorCode};
use surrealdb::Surreal;
use surrealdb::engine::any::{self, Any};

use crate::core::Config;

/// Storage handle shared by repositories, workers and the dashboard
pub type Storage = Surreal<Any>;

/// Tables, full-text analyzer and indexes
///
/// Category names are unique case-insensitively through `name_key`.
/// `audit_log` is append-only: record users may create and read, never
/// update or delete.
const SCHEMA: &str = r#"
DEFINE TABLE IF NOT EXISTS product SCHEMALESS;
DEFINE TABLE IF NOT EXISTS category SCHEMALESS;
DEFINE TABLE IF NOT EXISTS analytics SCHEMALESS;
DEFINE TABLE IF NOT EXISTS audit_log SCHEMALESS
    PERMISSIONS FOR select, create FULL FOR update, delete NONE;

DEFINE ANALYZER IF NOT EXISTS catalog_text
    TOKENIZERS blank, class
    FILTERS lowercase, ascii, snowball(english);

DEFINE INDEX IF NOT EXISTS product_search ON product FIELDS search_text
    SEARCH ANALYZER catalog_text BM25;
DEFINE INDEX IF NOT EXISTS product_category ON product FIELDS category_id;
DEFINE INDEX IF NOT EXISTS product_created ON product FIELDS created_at;
DEFINE INDEX IF NOT EXISTS product_price ON product FIELDS price;
DEFINE FIELD IF NOT EXISTS name_key ON category VALUE string::lowercase(name);
DEFINE INDEX IF NOT EXISTS category_name_key ON category FIELDS name_key UNIQUE;
DEFINE INDEX IF NOT EXISTS audit_timestamp ON audit_log FIELDS timestamp;
DEFINE INDEX IF NOT EXISTS audit_action ON audit_log FIELDS action;
"#;

/// Connect to the configured endpoint within the connect timeout and
/// apply the schema.
pub async fn connect(config: &Config) -> Result<Storage, AppError> {
    if let Some(path) = config.storage_url.strip_prefix("rocksdb://")
        && let Some(parent) = Path::new(path).parent()
    {
        std::fs::create_dir_all(parent).map_err(|e| {
            AppError::with_message(
                ErrorCode::ConfigError,
                format!("Failed to create database directory: {e}"),
            )
        })?;
    }

    let db = tokio::time::timeout(
        config.storage_connect_timeout(),
        any::connect(config.storage_url.clone()).into_future(),
    )
    .await
    .map_err(|_| {
        AppError::with_message(
            ErrorCode::TimeoutError,
            format!(
                "Timed out connecting to storage after {}ms",
                config.storage_connect_timeout_ms
            ),
        )
    })?
    .map_err(|e| AppError::database(format!("Failed to connect to storage: {e}")))?;

    db.use_ns(config.storage_namespace.clone())
        .use_db(config.storage_database.clone())
        .await
        .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;

    apply_schema(&db).await?;

    tracing::info!(url = %config.storage_url, "Storage connection established");
    Ok(db)
}

/// Idempotent schema bootstrap
pub async fn apply_schema(db: &Storage) -> Result<(), AppError> {
    db.query(SCHEMA)
        .await
        .and_then(|response| response.check())
        .map_err(|e| AppError::database(format!("Failed to apply schema: {e}")))?;
    tracing::debug!("Catalog schema applied");
    Ok(())
}

/// Lightweight liveness probe
pub async fn ping(db: &Storage) -> bool {
    db.health().await.is_ok()
}
