//! Catalog data models
//!
//! Entities returned by the API and the payloads accepted by it.

pub mod category;
pub mod product;
pub mod serde_helpers;

pub use category::{
    Category, CategoryCreate, CategorySummary, CategoryWithCount, DEFAULT_CATEGORY_COLOR,
    DEFAULT_CATEGORY_ICON,
};
pub use product::{
    BulkCreateRequest, BulkCreateResponse, BulkItemError, Product, ProductInput, ProductStatus,
    UnknownStatus, normalize_tags,
};
