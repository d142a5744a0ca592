//! Category Model

use serde::{Deserialize, Serialize};

pub const DEFAULT_CATEGORY_COLOR: &str = "#007bff";
pub const DEFAULT_CATEGORY_ICON: &str = "fas fa-box";

/// Category entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default = "default_icon")]
    pub icon: String,
    pub created_at: i64,
    pub updated_at: i64,
}

fn default_color() -> String {
    DEFAULT_CATEGORY_COLOR.to_string()
}

fn default_icon() -> String {
    DEFAULT_CATEGORY_ICON.to_string()
}

/// Category listing entry with its product count
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryWithCount {
    #[serde(flatten)]
    pub category: Category,
    pub product_count: u64,
}

/// Category fields inlined into product responses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub id: String,
    pub name: String,
    pub color: String,
    pub icon: String,
}

impl From<&Category> for CategorySummary {
    fn from(c: &Category) -> Self {
        Self {
            id: c.id.clone(),
            name: c.name.clone(),
            color: c.color.clone(),
            icon: c.icon.clone(),
        }
    }
}

/// Create category payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryCreate {
    #[serde(default)]
    pub name: String,
    pub description: Option<String>,
    pub color: Option<String>,
    pub icon: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_defaults_on_decode() {
        let category: Category = serde_json::from_value(serde_json::json!({
            "id": "k",
            "name": "Tools",
            "created_at": 1,
            "updated_at": 1
        }))
        .unwrap();
        assert_eq!(category.color, DEFAULT_CATEGORY_COLOR);
        assert_eq!(category.icon, DEFAULT_CATEGORY_ICON);
        assert_eq!(category.description, "");
    }

    #[test]
    fn test_with_count_is_flat() {
        let entry = CategoryWithCount {
            category: Category {
                id: "k".into(),
                name: "Tools".into(),
                description: String::new(),
                color: default_color(),
                icon: default_icon(),
                created_at: 1,
                updated_at: 1,
            },
            product_count: 4,
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["name"], "Tools");
        assert_eq!(json["product_count"], 4);
    }
}
