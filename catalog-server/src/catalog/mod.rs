//! Catalog rules
//!
//! - [`validation`] - product field constraints
//! - [`filter`] - list query to SurrealQL filter/sort/page

pub mod filter;
pub mod validation;

pub use filter::{ListQuery, ProductFilter};
pub use validation::{FieldErrors, validate_product};
