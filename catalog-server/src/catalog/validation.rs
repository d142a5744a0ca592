//! Product schema validation
//!
//! Pure checks over a candidate product. Every violated field is reported,
//! never just the first. Category existence is not checked here.

use std::collections::BTreeMap;

use shared::error::AppError;
use shared::models::{ProductInput, ProductStatus};

// ── Field constraints ───────────────────────────────────────────────

/// Minimum trimmed length of a product name
pub const MIN_NAME_LEN: usize = 2;

/// Minimum trimmed length of a product description
pub const MIN_DESCRIPTION_LEN: usize = 10;

/// Minimum trimmed length of a category name
pub const MIN_CATEGORY_NAME_LEN: usize = 2;

/// Field name to violation message, ordered by field name
pub type FieldErrors = BTreeMap<String, String>;

fn char_len(s: &str) -> usize {
    s.trim().chars().count()
}

/// Validate the fields present on `input`
///
/// Absent fields are skipped, so the same rules serve create (after the
/// presence check) and partial update.
pub fn validate_product(input: &ProductInput) -> FieldErrors {
    let mut errors = FieldErrors::new();

    if let Some(name) = &input.name
        && char_len(name) < MIN_NAME_LEN
    {
        errors.insert(
            "name".into(),
            format!("Name must be at least {MIN_NAME_LEN} characters long"),
        );
    }

    if let Some(description) = &input.description
        && char_len(description) < MIN_DESCRIPTION_LEN
    {
        errors.insert(
            "description".into(),
            format!("Description must be at least {MIN_DESCRIPTION_LEN} characters long"),
        );
    }

    if let Some(price) = input.price
        && !(price.is_finite() && price > 0.0)
    {
        errors.insert("price".into(), "Price must be greater than 0".into());
    }

    if let Some(quantity) = input.quantity
        && quantity < 0
    {
        errors.insert("quantity".into(), "Quantity cannot be negative".into());
    }

    if let Some(status) = &input.status
        && status.parse::<ProductStatus>().is_err()
    {
        errors.insert("status".into(), "Invalid status".into());
    }

    errors
}

/// `Validation failed` error carrying every field message
pub fn validation_error(errors: FieldErrors) -> AppError {
    AppError::validation("Validation failed").with_details(errors)
}

/// Category name rule, returns the trimmed name
pub fn validate_category_name(name: &str) -> Result<String, AppError> {
    let trimmed = name.trim();
    if trimmed.chars().count() < MIN_CATEGORY_NAME_LEN {
        return Err(AppError::validation(format!(
            "Category name must be at least {MIN_CATEGORY_NAME_LEN} characters"
        ))
        .with_detail("name", "too short"));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> ProductInput {
        ProductInput {
            name: Some("Claw Hammer".into()),
            description: Some("Forged steel claw hammer".into()),
            category_id: Some("c".into()),
            price: Some(19.99),
            quantity: Some(5),
            tags: Some(vec!["steel".into()]),
            status: Some("active".into()),
        }
    }

    #[test]
    fn test_valid_product_has_no_errors() {
        assert!(validate_product(&valid()).is_empty());
    }

    #[test]
    fn test_empty_input_is_valid_for_partial_update() {
        assert!(validate_product(&ProductInput::default()).is_empty());
    }

    #[test]
    fn test_all_violations_collected() {
        let input = ProductInput {
            name: Some(" a ".into()),
            description: Some("too short".into()),
            price: Some(0.0),
            quantity: Some(-1),
            status: Some("archived".into()),
            ..valid()
        };
        let errors = validate_product(&input);

        assert_eq!(errors.len(), 5);
        assert_eq!(errors["name"], "Name must be at least 2 characters long");
        assert_eq!(
            errors["description"],
            "Description must be at least 10 characters long"
        );
        assert_eq!(errors["price"], "Price must be greater than 0");
        assert_eq!(errors["quantity"], "Quantity cannot be negative");
        assert_eq!(errors["status"], "Invalid status");
    }

    #[test]
    fn test_price_boundaries() {
        for price in [0.0, -0.01, -100.0, f64::NAN, f64::INFINITY] {
            let input = ProductInput {
                price: Some(price),
                ..valid()
            };
            assert!(validate_product(&input).contains_key("price"), "{price}");
        }
        let input = ProductInput {
            price: Some(0.01),
            ..valid()
        };
        assert!(validate_product(&input).is_empty());
    }

    #[test]
    fn test_zero_quantity_is_valid() {
        let input = ProductInput {
            quantity: Some(0),
            ..valid()
        };
        assert!(validate_product(&input).is_empty());
    }

    #[test]
    fn test_name_length_counts_trimmed_chars() {
        let input = ProductInput {
            name: Some("  ab  ".into()),
            ..valid()
        };
        assert!(validate_product(&input).is_empty());

        let input = ProductInput {
            name: Some("é".into()),
            ..valid()
        };
        assert!(validate_product(&input).contains_key("name"));
    }

    #[test]
    fn test_validation_error_shape() {
        let mut errors = FieldErrors::new();
        errors.insert("price".into(), "Price must be greater than 0".into());
        let err = validation_error(errors);
        assert_eq!(err.message, "Validation failed");
        assert_eq!(
            err.details.unwrap()["price"],
            "Price must be greater than 0"
        );
    }

    #[test]
    fn test_category_name() {
        assert_eq!(validate_category_name("  Tools ").unwrap(), "Tools");
        let err = validate_category_name(" x ").unwrap_err();
        assert_eq!(err.message, "Category name must be at least 2 characters");
    }
}
