//! Product Repository

use super::{BaseRepository, CountRow, RepoResult, record};
use crate::catalog::ProductFilter;
use crate::db::Storage;
use serde::Serialize;
use shared::models::{Product, ProductStatus};

const TABLE: &str = "product";

/// Stored product document (key lives in the record id)
#[derive(Debug, Clone, Serialize)]
pub struct ProductDocument {
    /// Only set for batch `INSERT`, where the key travels in the content
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub description: String,
    pub category_id: String,
    pub price: f64,
    pub quantity: i64,
    pub tags: Vec<String>,
    pub status: ProductStatus,
    /// Full-text target: name, description and tags
    pub search_text: String,
    pub created_at: i64,
    pub updated_at: i64,
    pub views: i64,
    pub last_viewed: Option<i64>,
}

/// Partial update merged into an existing document
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProductPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ProductStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_text: Option<String>,
    pub updated_at: i64,
}

/// Build the indexed search text for a product
pub fn search_text(name: &str, description: &str, tags: &[String]) -> String {
    let mut text = String::with_capacity(name.len() + description.len() + 16);
    text.push_str(name);
    text.push(' ');
    text.push_str(description);
    for tag in tags {
        text.push(' ');
        text.push_str(tag);
    }
    text
}

#[derive(Clone)]
pub struct ProductRepository {
    base: BaseRepository,
}

impl ProductRepository {
    pub fn new(db: Storage) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// One page of products plus the total matching the same filter
    pub async fn find_page(&self, filter: &ProductFilter) -> RepoResult<(Vec<Product>, u64)> {
        let where_clause = filter.where_clause();
        let sql = format!(
            "SELECT count() AS total FROM product{where_clause} GROUP ALL; \
             SELECT *, record::id(id) AS id FROM product{where_clause}{} LIMIT {} START {}",
            filter.order_clause(),
            filter.limit,
            filter.skip()
        );

        let mut query = self.base.db().query(sql);
        for bind in filter.bindings() {
            query = query.bind(bind);
        }
        let mut result = query.await?;

        let count: Vec<CountRow> = result.take(0)?;
        let total = count.first().map(|c| c.total).unwrap_or(0);
        let products: Vec<Product> = result.take(1)?;

        Ok((products, total))
    }

    /// Find product by key
    pub async fn find_by_id(&self, key: &str) -> RepoResult<Option<Product>> {
        let mut result = self
            .base
            .db()
            .query("SELECT *, record::id(id) AS id FROM $rid")
            .bind(("rid", record(TABLE, key)))
            .await?;
        let products: Vec<Product> = result.take(0)?;
        Ok(products.into_iter().next())
    }

    /// Count one view and return the product as it is afterwards
    ///
    /// `views += 1` runs as a single document update, so concurrent reads
    /// never lose an increment. Absent products come back as `None`.
    pub async fn record_view(&self, key: &str, now: i64) -> RepoResult<Option<Product>> {
        let mut result = self
            .base
            .db()
            .query(
                "UPDATE $rid SET views += 1, last_viewed = $now RETURN NONE; \
                 SELECT *, record::id(id) AS id FROM $rid",
            )
            .bind(("rid", record(TABLE, key)))
            .bind(("now", now))
            .await?;
        let products: Vec<Product> = result.take(1)?;
        Ok(products.into_iter().next())
    }

    /// All products, newest first (export)
    pub async fn find_all(&self) -> RepoResult<Vec<Product>> {
        let products: Vec<Product> = self
            .base
            .db()
            .query("SELECT *, record::id(id) AS id FROM product ORDER BY created_at DESC")
            .await?
            .take(0)?;
        Ok(products)
    }

    /// Create a product under `key`
    pub async fn create(&self, key: &str, doc: ProductDocument) -> RepoResult<Product> {
        let mut result = self
            .base
            .db()
            .query(
                "CREATE $rid CONTENT $data RETURN NONE; \
                 SELECT *, record::id(id) AS id FROM $rid",
            )
            .bind(("rid", record(TABLE, key)))
            .bind(("data", doc))
            .await?
            .check()?;
        let products: Vec<Product> = result.take(1)?;
        products
            .into_iter()
            .next()
            .ok_or_else(|| super::RepoError::Database("Failed to create product".to_string()))
    }

    /// Insert a batch in one statement; every document must carry its key
    pub async fn insert_many(&self, docs: Vec<ProductDocument>) -> RepoResult<usize> {
        if docs.is_empty() {
            return Ok(0);
        }
        let count = docs.len();
        self.base
            .db()
            .query("INSERT INTO product $docs RETURN NONE")
            .bind(("docs", docs))
            .await?
            .check()?;
        Ok(count)
    }

    /// Merge `patch` into an existing product
    pub async fn update(&self, key: &str, patch: ProductPatch) -> RepoResult<Option<Product>> {
        let mut result = self
            .base
            .db()
            .query(
                "UPDATE $rid MERGE $data RETURN NONE; \
                 SELECT *, record::id(id) AS id FROM $rid",
            )
            .bind(("rid", record(TABLE, key)))
            .bind(("data", patch))
            .await?
            .check()?;
        let products: Vec<Product> = result.take(1)?;
        Ok(products.into_iter().next())
    }

    /// Hard delete
    pub async fn delete(&self, key: &str) -> RepoResult<()> {
        self.base
            .db()
            .query("DELETE $rid")
            .bind(("rid", record(TABLE, key)))
            .await?
            .check()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_text_joins_fields() {
        let text = search_text(
            "Claw Hammer",
            "Forged steel",
            &["tools".to_string(), "steel".to_string()],
        );
        assert_eq!(text, "Claw Hammer Forged steel tools steel");
    }

    #[test]
    fn test_patch_serializes_only_present_fields() {
        let patch = ProductPatch {
            price: Some(12.0),
            updated_at: 7,
            ..Default::default()
        };
        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(json, serde_json::json!({"price": 12.0, "updated_at": 7}));
    }
}
