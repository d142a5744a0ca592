//! Shared types for the catalog service
//!
//! Error codes, API error bodies, catalog models and pagination
//! structures used by the server and its tests.

pub mod error;
pub mod models;
pub mod pagination;
pub mod util;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{AppError, AppResult, ErrorCode};
pub use pagination::Pagination;
