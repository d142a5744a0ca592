//! Category Repository

use std::collections::HashMap;

use super::{BaseRepository, RepoError, RepoResult, record};
use crate::db::Storage;
use serde::{Deserialize, Serialize};
use shared::models::Category;
use surrealdb::RecordId;

const TABLE: &str = "category";

/// Stored category document
#[derive(Debug, Clone, Serialize)]
pub struct CategoryDocument {
    pub name: String,
    pub description: String,
    pub color: String,
    pub icon: String,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Deserialize)]
struct ProductCountRow {
    category_id: Option<String>,
    count: u64,
}

/// Unique index rejection, reported as "Database index `x` already contains ..."
fn is_unique_violation(err: &surrealdb::Error) -> bool {
    err.to_string().contains("already contains")
}

#[derive(Clone)]
pub struct CategoryRepository {
    base: BaseRepository,
}

impl CategoryRepository {
    pub fn new(db: Storage) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// All categories ordered by name
    pub async fn find_all(&self) -> RepoResult<Vec<Category>> {
        let categories: Vec<Category> = self
            .base
            .db()
            .query("SELECT *, record::id(id) AS id FROM category ORDER BY name ASC")
            .await?
            .take(0)?;
        Ok(categories)
    }

    /// Find category by key
    pub async fn find_by_id(&self, key: &str) -> RepoResult<Option<Category>> {
        let mut result = self
            .base
            .db()
            .query("SELECT *, record::id(id) AS id FROM $rid")
            .bind(("rid", record(TABLE, key)))
            .await?;
        let categories: Vec<Category> = result.take(0)?;
        Ok(categories.into_iter().next())
    }

    /// Fetch many categories in one round trip, keyed by record key
    ///
    /// Keys that no longer resolve are simply absent from the map.
    pub async fn find_many(&self, keys: &[String]) -> RepoResult<HashMap<String, Category>> {
        if keys.is_empty() {
            return Ok(HashMap::new());
        }
        let rids: Vec<RecordId> = keys.iter().map(|k| record(TABLE, k)).collect();
        let mut result = self
            .base
            .db()
            .query("SELECT *, record::id(id) AS id FROM $rids")
            .bind(("rids", rids))
            .await?;
        let categories: Vec<Category> = result.take(0)?;
        Ok(categories.into_iter().map(|c| (c.id.clone(), c)).collect())
    }

    /// Case-insensitive name lookup
    pub async fn find_by_name(&self, name: &str) -> RepoResult<Option<Category>> {
        let mut result = self
            .base
            .db()
            .query("SELECT *, record::id(id) AS id FROM category WHERE name_key = $name LIMIT 1")
            .bind(("name", name.to_lowercase()))
            .await?;
        let categories: Vec<Category> = result.take(0)?;
        Ok(categories.into_iter().next())
    }

    /// Create a new category under `key`
    ///
    /// A concurrent create that passes the name lookup is still rejected by
    /// the `name_key` unique index (or loses the commit), and is reported as
    /// a duplicate once the winner is visible.
    pub async fn create(&self, key: &str, doc: CategoryDocument) -> RepoResult<Category> {
        let name = doc.name.clone();
        let duplicate = || RepoError::Duplicate(format!("Category '{name}' already exists"));
        if self.find_by_name(&name).await?.is_some() {
            return Err(duplicate());
        }

        let response = self
            .base
            .db()
            .query(
                "CREATE $rid CONTENT $data RETURN NONE; \
                 SELECT *, record::id(id) AS id FROM $rid",
            )
            .bind(("rid", record(TABLE, key)))
            .bind(("data", doc))
            .await?
            .check();

        let mut result = match response {
            Ok(result) => result,
            Err(e) if is_unique_violation(&e) => return Err(duplicate()),
            Err(e) => {
                if self.find_by_name(&name).await?.is_some() {
                    return Err(duplicate());
                }
                return Err(e.into());
            }
        };
        let categories: Vec<Category> = result.take(1)?;
        categories
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::Database("Failed to create category".to_string()))
    }

    /// Product count per category key (grouped in the database)
    pub async fn product_counts(&self) -> RepoResult<HashMap<String, u64>> {
        let rows: Vec<ProductCountRow> = self
            .base
            .db()
            .query("SELECT category_id, count() AS count FROM product GROUP BY category_id")
            .await?
            .take(0)?;
        Ok(rows
            .into_iter()
            .filter_map(|row| row.category_id.map(|id| (id, row.count)))
            .collect())
    }
}
