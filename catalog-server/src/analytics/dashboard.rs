//! Dashboard aggregation
//!
//! Each section is an independent query; sections are not read from a
//! common snapshot, so counts may drift by a write or two under load.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use serde::{Deserialize, Serialize};
use shared::error::AppError;

use crate::db::Storage;
use crate::db::repository::CategoryRepository;

/// Window for `recent_products`
pub const RECENT_WINDOW_DAYS: i64 = 7;

/// Size of the most-viewed list
pub const TOP_VIEWED_LIMIT: usize = 5;

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub total_products: u64,
    pub active_products: u64,
    pub total_categories: u64,
    pub recent_products: u64,
    pub avg_price: f64,
    pub total_inventory_value: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryBreakdown {
    pub category_id: String,
    pub category_name: String,
    pub count: u64,
    pub total_value: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusCount {
    pub status: String,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopViewedProduct {
    pub id: String,
    pub name: String,
    pub views: i64,
    pub price: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardCharts {
    pub products_by_category: Vec<CategoryBreakdown>,
    pub status_distribution: Vec<StatusCount>,
    pub top_viewed_products: Vec<TopViewedProduct>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceStats {
    pub average: f64,
    pub minimum: f64,
    pub maximum: f64,
}

/// `GET /api/analytics/dashboard` body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dashboard {
    pub summary: DashboardSummary,
    pub charts: DashboardCharts,
    pub price_stats: PriceStats,
}

// ============================================================================
// Raw rows
// ============================================================================

#[derive(Debug, Default, Deserialize)]
struct SummaryRaw {
    total_products: u64,
    active_products: u64,
    total_categories: u64,
    recent_products: u64,
    avg_price: f64,
    min_price: f64,
    max_price: f64,
    total_inventory_value: f64,
}

#[derive(Debug, Deserialize)]
struct CategoryGroupRaw {
    category_id: Option<String>,
    count: u64,
    total_value: Option<f64>,
}

/// Round to cents for display
pub fn round2(value: f64) -> f64 {
    Decimal::from_f64(value)
        .map(|d| d.round_dp(2))
        .and_then(|d| d.to_f64())
        .unwrap_or(value)
}

fn db_err(e: surrealdb::Error) -> AppError {
    AppError::database(e.to_string())
}

/// Build the full dashboard as of `now`
pub async fn build(db: &Storage, now: DateTime<Utc>) -> Result<Dashboard, AppError> {
    let since = (now - Duration::days(RECENT_WINDOW_DAYS)).timestamp_millis();

    let mut result = db
        .query(
            r#"
            LET $prices = (SELECT VALUE price FROM product);
            LET $values = (SELECT VALUE price * quantity FROM product);
            RETURN {
                total_products: array::len($prices),
                active_products: array::len((SELECT VALUE id FROM product WHERE status = 'active')),
                total_categories: array::len((SELECT VALUE id FROM category)),
                recent_products: array::len((SELECT VALUE id FROM product WHERE created_at >= $since)),
                avg_price: IF array::len($prices) > 0 THEN math::mean($prices) ELSE 0 END,
                min_price: math::min($prices) OR 0,
                max_price: math::max($prices) OR 0,
                total_inventory_value: math::sum($values) OR 0
            };
        "#,
        )
        .bind(("since", since))
        .await
        .map_err(db_err)?;
    let raw: SummaryRaw = result
        .take::<Option<SummaryRaw>>(2)
        .map_err(db_err)?
        .unwrap_or_default();

    let groups: Vec<CategoryGroupRaw> = db
        .query(
            "SELECT category_id, count() AS count, math::sum(line_value) AS total_value \
             FROM (SELECT category_id, price * quantity AS line_value FROM product) \
             GROUP BY category_id",
        )
        .await
        .map_err(db_err)?
        .take(0)
        .map_err(db_err)?;

    let keys: Vec<String> = groups.iter().filter_map(|g| g.category_id.clone()).collect();
    let categories = CategoryRepository::new(db.clone())
        .find_many(&keys)
        .await?;

    // Groups whose category is gone are dropped
    let mut products_by_category: Vec<CategoryBreakdown> = groups
        .into_iter()
        .filter_map(|g| {
            let id = g.category_id?;
            let category = categories.get(&id)?;
            Some(CategoryBreakdown {
                category_name: category.name.clone(),
                category_id: id,
                count: g.count,
                total_value: round2(g.total_value.unwrap_or(0.0)),
            })
        })
        .collect();
    products_by_category.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.category_name.cmp(&b.category_name))
    });

    let mut status_distribution: Vec<StatusCount> = db
        .query("SELECT status, count() AS count FROM product GROUP BY status")
        .await
        .map_err(db_err)?
        .take(0)
        .map_err(db_err)?;
    status_distribution.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.status.cmp(&b.status)));

    let top_viewed_products: Vec<TopViewedProduct> = db
        .query(format!(
            "SELECT record::id(id) AS id, name, views, price FROM product \
             WHERE views > 0 ORDER BY views DESC LIMIT {TOP_VIEWED_LIMIT}"
        ))
        .await
        .map_err(db_err)?
        .take(0)
        .map_err(db_err)?;

    Ok(Dashboard {
        summary: DashboardSummary {
            total_products: raw.total_products,
            active_products: raw.active_products,
            total_categories: raw.total_categories,
            recent_products: raw.recent_products,
            avg_price: round2(raw.avg_price),
            total_inventory_value: round2(raw.total_inventory_value),
        },
        charts: DashboardCharts {
            products_by_category,
            status_distribution,
            top_viewed_products,
        },
        price_stats: PriceStats {
            average: round2(raw.avg_price),
            minimum: raw.min_price,
            maximum: raw.max_price,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round2() {
        assert_eq!(round2(10.0), 10.0);
        assert_eq!(round2(3.14159), 3.14);
        assert_eq!(round2(0.0), 0.0);
        assert_eq!(round2(199.999), 200.0);
    }
}
