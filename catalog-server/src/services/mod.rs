//! Catalog services
//!
//! Handlers stay thin: each builds a service from [`ServerState`](crate::core::ServerState)
//! (failing with 503 when storage is down) and delegates.

pub mod category;
pub mod export;
pub mod product;

pub use category::CategoryService;
pub use export::{Export, ExportFormat, ExportService};
pub use product::{MessageResponse, ProductListResponse, ProductService};
