//! # Validation Module
//!
//! Input validation for products and user accounts.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP extractor (axum)                                        │
//! │  └── JSON shape / type checks (deserialization)                        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  └── price > 0, stock ≥ 0, non-empty names, email shape                │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: PostgreSQL                                                   │
//! │  ├── CHECK (price > 0), CHECK (stock >= 0)                             │
//! │  └── UNIQUE (email)                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything here runs before a statement is composed, so a rejected
//! request never reaches storage.

use crate::error::ValidationError;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

const MAX_NAME_LEN: usize = 255;
const MAX_CATEGORY_LEN: usize = 100;
const MAX_EMAIL_LEN: usize = 255;

// =============================================================================
// String Validators
// =============================================================================

fn validate_text(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

/// Validates a product name.
///
/// ## Example
/// ```rust
/// use stock_core::validation::validate_product_name;
///
/// assert!(validate_product_name("Widget 40mm").is_ok());
/// assert!(validate_product_name("   ").is_err());
/// ```
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    validate_text("name", name, MAX_NAME_LEN)
}

/// Validates a product category.
pub fn validate_category(category: &str) -> ValidationResult<()> {
    validate_text("category", category, MAX_CATEGORY_LEN)
}

/// Validates an email address.
///
/// Only the shape is checked (`local@domain.tld`); deliverability is not.
pub fn validate_email(email: &str) -> ValidationResult<()> {
    validate_text("email", email, MAX_EMAIL_LEN)?;

    let email = email.trim();
    let invalid = |reason: &str| ValidationError::InvalidFormat {
        field: "email".to_string(),
        reason: reason.to_string(),
    };

    let (local, domain) = email.split_once('@').ok_or_else(|| invalid("missing '@'"))?;
    if local.is_empty() || domain.is_empty() {
        return Err(invalid("missing local part or domain"));
    }
    if domain.contains('@') {
        return Err(invalid("more than one '@'"));
    }
    if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
        return Err(invalid("domain must contain a dot"));
    }
    if email.chars().any(char::is_whitespace) {
        return Err(invalid("must not contain whitespace"));
    }

    Ok(())
}

/// Validates a plaintext password before hashing.
pub fn validate_password(password: &str) -> ValidationResult<()> {
    if password.is_empty() {
        return Err(ValidationError::Required {
            field: "password".to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Largest price a `NUMERIC(10,2)` column holds.
pub const MAX_PRICE: f64 = 99_999_999.99;

/// Validates a product price.
///
/// ## Rules
/// - Must be a finite number
/// - Must be strictly positive once rounded to cents (the column is
///   `NUMERIC(10,2)` with `CHECK (price > 0)`, so 0.004 would store as 0.00)
/// - Must fit the column: at most [`MAX_PRICE`] once rounded
///
/// ## Example
/// ```rust
/// use stock_core::validation::validate_price;
///
/// assert!(validate_price(19.99).is_ok());
/// assert!(validate_price(0.01).is_ok());
/// assert!(validate_price(0.0).is_err());
/// assert!(validate_price(0.004).is_err());
/// assert!(validate_price(1e9).is_err());
/// assert!(validate_price(f64::NAN).is_err());
/// ```
pub fn validate_price(price: f64) -> ValidationResult<()> {
    if !price.is_finite() {
        return Err(ValidationError::InvalidFormat {
            field: "price".to_string(),
            reason: "must be a finite number".to_string(),
        });
    }

    let cents = (price * 100.0).round();
    if cents < 1.0 {
        return Err(ValidationError::MustBePositive {
            field: "price".to_string(),
        });
    }

    if cents > (MAX_PRICE * 100.0).round() {
        return Err(ValidationError::InvalidFormat {
            field: "price".to_string(),
            reason: format!("must be at most {:.2}", MAX_PRICE),
        });
    }

    Ok(())
}

/// Validates a stock level. Zero is allowed (sold out).
pub fn validate_stock(stock: i32) -> ValidationResult<()> {
    if stock < 0 {
        return Err(ValidationError::Negative {
            field: "stock".to_string(),
        });
    }
    Ok(())
}

/// Validates a path identifier.
pub fn validate_id(field: &str, id: i64) -> ValidationResult<()> {
    if id <= 0 {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must be a positive integer".to_string(),
        });
    }
    Ok(())
}

/// Parses a raw path segment into an identifier.
///
/// ## Example
/// ```rust
/// use stock_core::validation::parse_id;
///
/// assert_eq!(parse_id("product_id", "42").unwrap(), 42);
/// assert!(parse_id("product_id", "abc").is_err());
/// ```
pub fn parse_id(field: &str, raw: &str) -> ValidationResult<i64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    let id = raw.parse::<i64>().map_err(|_| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: "must be a positive integer".to_string(),
    })?;

    validate_id(field, id)?;
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_product_name() {
        assert!(validate_product_name("Widget").is_ok());
        assert!(validate_product_name("").is_err());
        assert!(validate_product_name("   ").is_err());
        assert!(validate_product_name(&"A".repeat(300)).is_err());
    }

    #[test]
    fn test_validate_category() {
        assert!(validate_category("Widgets").is_ok());
        assert_eq!(
            validate_category(""),
            Err(ValidationError::Required {
                field: "category".to_string()
            })
        );
        assert!(validate_category(&"c".repeat(101)).is_err());
    }

    #[test]
    fn test_validate_price() {
        assert!(validate_price(0.01).is_ok());
        assert!(validate_price(19.99).is_ok());
        assert!(validate_price(0.0).is_err());
        assert!(validate_price(-5.0).is_err());
        assert!(validate_price(f64::INFINITY).is_err());
        assert!(validate_price(f64::NAN).is_err());
    }

    #[test]
    fn test_validate_price_fits_column() {
        // Rounds to 0.00 in NUMERIC(10,2)
        assert_eq!(
            validate_price(0.004),
            Err(ValidationError::MustBePositive {
                field: "price".to_string()
            })
        );
        assert!(validate_price(0.009).is_ok());

        assert!(validate_price(MAX_PRICE).is_ok());
        assert!(validate_price(99_999_999.994).is_ok());
        assert!(validate_price(100_000_000.0).is_err());
        assert!(matches!(
            validate_price(1e9),
            Err(ValidationError::InvalidFormat { ref field, .. }) if field == "price"
        ));
    }

    #[test]
    fn test_validate_stock() {
        assert!(validate_stock(0).is_ok());
        assert!(validate_stock(150).is_ok());
        assert!(validate_stock(-1).is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("staff@example.com").is_ok());
        assert!(validate_email("a.b+c@shop.co.uk").is_ok());

        assert!(validate_email("").is_err());
        assert!(validate_email("no-at-sign.com").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("user@").is_err());
        assert!(validate_email("user@localhost").is_err());
        assert!(validate_email("a@b@c.com").is_err());
        assert!(validate_email("us er@example.com").is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("hunter2").is_ok());
        assert!(validate_password("").is_err());
    }

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("id", "7").unwrap(), 7);
        assert_eq!(parse_id("id", " 12 ").unwrap(), 12);
        assert!(parse_id("id", "").is_err());
        assert!(parse_id("id", "0").is_err());
        assert!(parse_id("id", "-3").is_err());
        assert!(parse_id("id", "seven").is_err());
    }
}
