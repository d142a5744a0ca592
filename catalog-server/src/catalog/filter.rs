//! Product list filter builder
//!
//! Turns raw query-string parameters into a SurrealQL `WHERE` clause with
//! bound parameters, an `ORDER BY` clause and skip/limit. Free-text matching
//! is left to the `product_search` full-text index (`@@`).

use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared::error::{AppError, AppResult};
use shared::util::parse_record_key;

/// Upper bound for `limit`
pub const MAX_PAGE_SIZE: u32 = 100;

/// Largest offset the storage accepts in `START`
pub const MAX_SKIP: u64 = u32::MAX as u64;

/// Raw list parameters as received on the query string
///
/// Everything stays a string so malformed values can be handled per field
/// (ignored for price bounds and category, rejected for page/limit).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub search: Option<String>,
    pub category_id: Option<String>,
    pub status: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
    pub price_min: Option<String>,
    pub price_max: Option<String>,
}

/// Whitelisted sort keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    CreatedAt,
    UpdatedAt,
    Name,
    Price,
    Quantity,
    Views,
    Status,
}

impl SortField {
    /// Unknown keys fall back to `created_at`
    pub fn parse(raw: &str) -> Self {
        match raw {
            "updated_at" => Self::UpdatedAt,
            "name" => Self::Name,
            "price" => Self::Price,
            "quantity" => Self::Quantity,
            "views" => Self::Views,
            "status" => Self::Status,
            _ => Self::CreatedAt,
        }
    }

    pub fn column(&self) -> &'static str {
        match self {
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
            Self::Name => "name",
            Self::Price => "price",
            Self::Quantity => "quantity",
            Self::Views => "views",
            Self::Status => "status",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    /// Only `desc` sorts descending; anything else is ascending
    pub fn parse(raw: &str) -> Self {
        if raw == "desc" { Self::Desc } else { Self::Asc }
    }

    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Filters echoed back to the caller (absent text filters echo as `""`)
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AppliedFilters {
    pub search: String,
    pub category_id: String,
    pub status: String,
    pub price_min: Option<f64>,
    pub price_max: Option<f64>,
}

/// Normalized product query
#[derive(Debug, Clone, PartialEq)]
pub struct ProductFilter {
    pub search: Option<String>,
    /// Normalized category key; malformed references never get here
    pub category_id: Option<String>,
    pub status: Option<String>,
    pub price_min: Option<f64>,
    pub price_max: Option<f64>,
    pub sort_field: SortField,
    pub sort_direction: SortDirection,
    pub page: u32,
    pub limit: u32,
    /// What the caller sent, for the response
    pub applied: AppliedFilters,
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn parse_price(value: &Option<String>) -> Option<f64> {
    non_empty(value)
        .and_then(|v| v.parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

fn parse_positive(value: &Option<String>, field: &str, default: u32) -> AppResult<u32> {
    match non_empty(value) {
        None => Ok(default),
        Some(raw) => raw
            .parse::<i64>()
            .map(|n| n.clamp(1, i64::from(u32::MAX)) as u32)
            .map_err(|_| {
                AppError::validation(format!("Invalid {field} parameter"))
                    .with_detail(field, format!("{field} must be an integer"))
            }),
    }
}

impl ProductFilter {
    /// Build from raw parameters
    ///
    /// `page` below 1 becomes 1; `limit` is clamped into `1..=MAX_PAGE_SIZE`.
    /// `page` is capped so the offset never exceeds [`MAX_SKIP`].
    /// Unparsable `page`/`limit` is a validation error.
    pub fn from_query(query: &ListQuery, default_limit: u32) -> AppResult<Self> {
        let limit = parse_positive(&query.limit, "limit", default_limit)?.min(MAX_PAGE_SIZE);
        let last_page = (MAX_SKIP / u64::from(limit)).saturating_add(1);
        let page = parse_positive(&query.page, "page", 1)?
            .min(u32::try_from(last_page).unwrap_or(u32::MAX));

        let search = non_empty(&query.search);
        let raw_category = non_empty(&query.category_id);
        let status = non_empty(&query.status);
        let price_min = parse_price(&query.price_min);
        let price_max = parse_price(&query.price_max);

        let sort_field = query
            .sort_by
            .as_deref()
            .map(SortField::parse)
            .unwrap_or_default();
        let sort_direction = query
            .sort_order
            .as_deref()
            .map(SortDirection::parse)
            .unwrap_or_default();

        Ok(Self {
            category_id: raw_category.as_deref().and_then(parse_record_key),
            applied: AppliedFilters {
                search: search.clone().unwrap_or_default(),
                category_id: raw_category.unwrap_or_default(),
                status: status.clone().unwrap_or_default(),
                price_min,
                price_max,
            },
            search,
            status,
            price_min,
            price_max,
            sort_field,
            sort_direction,
            page,
            limit,
        })
    }

    /// ` WHERE ...` (with leading space) or empty
    pub fn where_clause(&self) -> String {
        let mut conditions = Vec::new();

        if self.search.is_some() {
            conditions.push("search_text @@ $search");
        }
        if self.category_id.is_some() {
            conditions.push("category_id = $category_id");
        }
        if self.status.is_some() {
            conditions.push("status = $status");
        }
        if self.price_min.is_some() {
            conditions.push("price >= $price_min");
        }
        if self.price_max.is_some() {
            conditions.push("price <= $price_max");
        }

        if conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", conditions.join(" AND "))
        }
    }

    /// Parameters referenced by [`where_clause`](Self::where_clause)
    pub fn bindings(&self) -> Vec<(&'static str, Value)> {
        let mut binds = Vec::new();
        if let Some(search) = &self.search {
            binds.push(("search", Value::from(search.clone())));
        }
        if let Some(category_id) = &self.category_id {
            binds.push(("category_id", Value::from(category_id.clone())));
        }
        if let Some(status) = &self.status {
            binds.push(("status", Value::from(status.clone())));
        }
        if let Some(min) = self.price_min {
            binds.push(("price_min", Value::from(min)));
        }
        if let Some(max) = self.price_max {
            binds.push(("price_max", Value::from(max)));
        }
        binds
    }

    pub fn order_clause(&self) -> String {
        format!(
            " ORDER BY {} {}",
            self.sort_field.column(),
            self.sort_direction.keyword()
        )
    }

    pub fn skip(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(pairs: &[(&str, &str)]) -> ListQuery {
        let mut q = ListQuery::default();
        for (k, v) in pairs {
            let v = Some(v.to_string());
            match *k {
                "page" => q.page = v,
                "limit" => q.limit = v,
                "search" => q.search = v,
                "category_id" => q.category_id = v,
                "status" => q.status = v,
                "sort_by" => q.sort_by = v,
                "sort_order" => q.sort_order = v,
                "price_min" => q.price_min = v,
                "price_max" => q.price_max = v,
                _ => unreachable!(),
            }
        }
        q
    }

    #[test]
    fn test_defaults() {
        let f = ProductFilter::from_query(&ListQuery::default(), 10).unwrap();
        assert_eq!(f.page, 1);
        assert_eq!(f.limit, 10);
        assert_eq!(f.skip(), 0);
        assert_eq!(f.sort_field, SortField::CreatedAt);
        assert_eq!(f.sort_direction, SortDirection::Desc);
        assert_eq!(f.where_clause(), "");
        assert!(f.bindings().is_empty());
        assert_eq!(f.order_clause(), " ORDER BY created_at DESC");
    }

    #[test]
    fn test_skip_and_clamping() {
        let f = ProductFilter::from_query(&query(&[("page", "3"), ("limit", "20")]), 10).unwrap();
        assert_eq!(f.skip(), 40);

        let f = ProductFilter::from_query(&query(&[("page", "0"), ("limit", "1000")]), 10).unwrap();
        assert_eq!(f.page, 1);
        assert_eq!(f.limit, MAX_PAGE_SIZE);

        let f = ProductFilter::from_query(&query(&[("page", "-4"), ("limit", "0")]), 10).unwrap();
        assert_eq!(f.page, 1);
        assert_eq!(f.limit, 1);
    }

    #[test]
    fn test_unparsable_page_is_rejected() {
        let err = ProductFilter::from_query(&query(&[("page", "two")]), 10).unwrap_err();
        assert_eq!(err.code, shared::ErrorCode::ValidationFailed);

        let err = ProductFilter::from_query(&query(&[("limit", "1.5")]), 10).unwrap_err();
        assert!(err.message.contains("limit"));
    }

    #[test]
    fn test_all_conditions() {
        let f = ProductFilter::from_query(
            &query(&[
                ("search", "hammer"),
                ("category_id", "67e55044-10b1-426f-9247-bb680e5fe0c8"),
                ("status", "active"),
                ("price_min", "5"),
                ("price_max", "50.5"),
            ]),
            10,
        )
        .unwrap();

        assert_eq!(
            f.where_clause(),
            " WHERE search_text @@ $search AND category_id = $category_id AND status = $status \
             AND price >= $price_min AND price <= $price_max"
        );
        let binds = f.bindings();
        assert_eq!(binds.len(), 5);
        assert_eq!(
            binds[1],
            ("category_id", Value::from("67e5504410b1426f9247bb680e5fe0c8"))
        );
        assert_eq!(binds[4], ("price_max", Value::from(50.5)));
    }

    #[test]
    fn test_malformed_category_is_ignored_but_echoed() {
        let f = ProductFilter::from_query(&query(&[("category_id", "garbage")]), 10).unwrap();
        assert_eq!(f.category_id, None);
        assert_eq!(f.where_clause(), "");
        assert_eq!(f.applied.category_id, "garbage");
    }

    #[test]
    fn test_bad_prices_are_ignored() {
        let f = ProductFilter::from_query(
            &query(&[("price_min", "cheap"), ("price_max", "nan")]),
            10,
        )
        .unwrap();
        assert_eq!(f.price_min, None);
        assert_eq!(f.price_max, None);
        assert_eq!(f.where_clause(), "");
    }

    #[test]
    fn test_unknown_status_passes_through() {
        let f = ProductFilter::from_query(&query(&[("status", "archived")]), 10).unwrap();
        assert_eq!(f.where_clause(), " WHERE status = $status");
        assert_eq!(f.bindings()[0], ("status", Value::from("archived")));
    }

    #[test]
    fn test_sorting() {
        let f = ProductFilter::from_query(&query(&[("sort_by", "price"), ("sort_order", "asc")]), 10)
            .unwrap();
        assert_eq!(f.order_clause(), " ORDER BY price ASC");

        let f = ProductFilter::from_query(
            &query(&[("sort_by", "id; DELETE product"), ("sort_order", "sideways")]),
            10,
        )
        .unwrap();
        assert_eq!(f.order_clause(), " ORDER BY created_at ASC");
    }

    #[test]
    fn test_blank_values_are_absent() {
        let f = ProductFilter::from_query(&query(&[("search", "   "), ("status", "")]), 10).unwrap();
        assert_eq!(f.search, None);
        assert_eq!(f.status, None);
        assert_eq!(f.applied, AppliedFilters::default());
        assert_eq!(f.applied.search, "");
    }

    #[test]
    fn test_huge_page_keeps_offset_in_range() {
        let f = ProductFilter::from_query(&query(&[("page", "100000000"), ("limit", "100")]), 10)
            .unwrap();
        assert!(f.skip() <= MAX_SKIP);
        assert_eq!(f.page, (MAX_SKIP / 100 + 1) as u32);

        let f = ProductFilter::from_query(&query(&[("page", "4294967295"), ("limit", "1")]), 10)
            .unwrap();
        assert_eq!(f.page, u32::MAX);
        assert!(f.skip() <= MAX_SKIP);

        let f = ProductFilter::from_query(&query(&[("page", "30000000"), ("limit", "100")]), 10)
            .unwrap();
        assert_eq!(f.page, 30_000_000);
    }
}
