//! Product Model

use super::category::CategorySummary;
use super::serde_helpers;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Product lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductStatus {
    #[default]
    Active,
    Inactive,
    Discontinued,
}

impl ProductStatus {
    pub const ALL: [ProductStatus; 3] = [Self::Active, Self::Inactive, Self::Discontinued];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Discontinued => "discontinued",
        }
    }
}

impl fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is not a known status
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStatus(pub String);

impl fmt::Display for UnknownStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown product status: {}", self.0)
    }
}

impl std::error::Error for UnknownStatus {}

impl FromStr for ProductStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            "discontinued" => Ok(Self::Discontinued),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// Product entity as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Category reference (record key)
    pub category_id: String,
    pub price: f64,
    pub quantity: i64,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub status: ProductStatus,
    pub created_at: i64,
    pub updated_at: i64,
    #[serde(default)]
    pub views: i64,
    #[serde(default)]
    pub last_viewed: Option<i64>,
    /// Resolved category, present only when the reference still resolves
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<CategorySummary>,
}

/// Product payload for create, bulk create and partial update
///
/// Every field is optional on the wire: create checks presence itself so it
/// can report `Missing required field: <name>`, update applies only what is
/// present. `status` stays a raw string until validated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category_id: Option<String>,
    #[serde(default, deserialize_with = "serde_helpers::lenient_f64")]
    pub price: Option<f64>,
    #[serde(default, deserialize_with = "serde_helpers::lenient_i64")]
    pub quantity: Option<i64>,
    pub tags: Option<Vec<String>>,
    pub status: Option<String>,
}

impl ProductInput {
    /// Fields a create request must carry, in reporting order
    pub const REQUIRED_FIELDS: [&'static str; 5] =
        ["name", "description", "category_id", "price", "quantity"];

    /// First required field absent from the payload
    pub fn missing_required_field(&self) -> Option<&'static str> {
        Self::REQUIRED_FIELDS.into_iter().find(|field| match *field {
            "name" => self.name.is_none(),
            "description" => self.description.is_none(),
            "category_id" => self.category_id.is_none(),
            "price" => self.price.is_none(),
            "quantity" => self.quantity.is_none(),
            _ => false,
        })
    }
}

/// Trim tags, drop empty ones and collapse duplicates (first occurrence wins)
pub fn normalize_tags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for tag in tags {
        let tag = tag.as_ref().trim();
        if !tag.is_empty() && !out.iter().any(|t| t == tag) {
            out.push(tag.to_string());
        }
    }
    out
}

/// Bulk create request body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BulkCreateRequest {
    /// Raw candidates; each is decoded independently so one malformed entry
    /// does not reject the batch
    #[serde(default)]
    pub products: Vec<serde_json::Value>,
}

/// Per-candidate rejection in a bulk create
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkItemError {
    /// Position in the submitted list
    pub index: usize,
    /// Field (or `general`) to message
    pub errors: std::collections::BTreeMap<String, String>,
}

/// Bulk create response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkCreateResponse {
    pub message: String,
    pub successful: usize,
    pub errors: Vec<BulkItemError>,
    pub total_attempted: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip_strings() {
        for status in ProductStatus::ALL {
            assert_eq!(status.as_str().parse::<ProductStatus>(), Ok(status));
            assert_eq!(
                serde_json::to_value(status).unwrap(),
                serde_json::json!(status.as_str())
            );
        }
        assert!("archived".parse::<ProductStatus>().is_err());
        assert!("Active".parse::<ProductStatus>().is_err());
    }

    #[test]
    fn test_status_default_is_active() {
        assert_eq!(ProductStatus::default(), ProductStatus::Active);
    }

    #[test]
    fn test_missing_required_field_order() {
        let input = ProductInput::default();
        assert_eq!(input.missing_required_field(), Some("name"));

        let input: ProductInput = serde_json::from_value(serde_json::json!({
            "name": "Hammer",
            "description": "A solid steel hammer",
            "category_id": "x",
            "quantity": 2
        }))
        .unwrap();
        assert_eq!(input.missing_required_field(), Some("price"));
    }

    #[test]
    fn test_complete_input_has_no_missing_field() {
        let input: ProductInput = serde_json::from_value(serde_json::json!({
            "name": "Hammer",
            "description": "A solid steel hammer",
            "category_id": "x",
            "price": "12.50",
            "quantity": "3"
        }))
        .unwrap();
        assert_eq!(input.missing_required_field(), None);
        assert_eq!(input.price, Some(12.5));
        assert_eq!(input.quantity, Some(3));
    }

    #[test]
    fn test_normalize_tags() {
        let tags = normalize_tags([" steel ", "", "tools", "   ", "steel"]);
        assert_eq!(tags, vec!["steel".to_string(), "tools".to_string()]);
    }

    #[test]
    fn test_product_omits_missing_category() {
        let product = Product {
            id: "a".into(),
            name: "Hammer".into(),
            description: "A solid steel hammer".into(),
            category_id: "c".into(),
            price: 9.99,
            quantity: 1,
            tags: vec![],
            status: ProductStatus::Active,
            created_at: 0,
            updated_at: 0,
            views: 0,
            last_viewed: None,
            category: None,
        };
        let json = serde_json::to_value(&product).unwrap();
        assert!(json.get("category").is_none());
        assert!(json["last_viewed"].is_null());
        assert_eq!(json["status"], "active");
    }
}
