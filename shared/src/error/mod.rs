//! Unified error system for the catalog service
//!
//! - [`ErrorCode`]: Standardized numeric error codes
//! - [`ErrorCategory`]: Classification of errors by range
//! - [`AppError`]: Error type with code, message and details
//! - [`ErrorBody`]: JSON shape rendered for failed requests
//!
//! # Error Code Ranges
//!
//! - 0xxx: General errors
//! - 6xxx: Catalog errors
//! - 9xxx: System errors
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode};
//!
//! let err = AppError::new(ErrorCode::ProductNotFound);
//! assert_eq!(err.message, "Product not found");
//!
//! let err = AppError::validation("Validation failed")
//!     .with_detail("price", "Price must be greater than 0");
//! assert_eq!(err.http_status(), shared::http::StatusCode::BAD_REQUEST);
//! ```

mod category;
mod codes;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{AppError, AppResult, ErrorBody};
