//! # Validation Module
//!
//! The single rule set every store and every HTTP handler applies before a
//! mutation.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP handler                                                 │
//! │  ├── Type validation (JSON deserialization)                            │
//! │  └── Path id parsing (parse_sweet_id)                                  │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Required fields (name, category, price, in_stock)                 │
//! │  └── Ranges (price > 0, in_stock >= 0, quantity > 0)                   │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL constraints                                              │
//! │  └── CHECK (price_cents > 0), CHECK (in_stock >= 0)                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use sweetshop_core::validation::{validate_price, validate_stock};
//! use sweetshop_core::Money;
//!
//! assert!(validate_price(Money::from_cents(350)).is_ok());
//! assert!(validate_price(Money::zero()).is_err());
//! assert!(validate_stock(-1).is_err());
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{NewSweet, Sweet, SweetId, SweetPatch};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Maximum name length (the original `VARCHAR(255)` column).
pub const MAX_NAME_LEN: usize = 255;

/// Maximum category length (the original `VARCHAR(100)` column).
pub const MAX_CATEGORY_LEN: usize = 100;

/// Largest stock level a record may hold (the original `INT` column).
pub const MAX_STOCK: i64 = i32::MAX as i64;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a sweet name: non-blank, at most `MAX_NAME_LEN` characters.
pub fn validate_name(name: &str) -> ValidationResult<()> {
    validate_label("name", name, MAX_NAME_LEN)
}

/// Validates a category label: non-blank, at most `MAX_CATEGORY_LEN` characters.
pub fn validate_category(category: &str) -> ValidationResult<()> {
    validate_label("category", category, MAX_CATEGORY_LEN)
}

fn validate_label(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::required(field));
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a unit price.
///
/// ## Rules
/// - Must be strictly positive; a free sweet is not a valid record
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if !price.is_positive() {
        return Err(ValidationError::must_be_positive("price"));
    }
    Ok(())
}

/// Validates a stock level. Zero is allowed (sold out); anything above
/// `MAX_STOCK` is out of range.
pub fn validate_stock(in_stock: i64) -> ValidationResult<()> {
    if in_stock < 0 {
        return Err(ValidationError::negative("in_stock"));
    }
    if in_stock > MAX_STOCK {
        return Err(ValidationError::out_of_range("in_stock"));
    }
    Ok(())
}

/// Validates a purchase or restock quantity.
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Purchase dialog                                                        │
/// │                                                                         │
/// │  User enters quantity: 0                                               │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  validate_quantity(0) ← THIS FUNCTION                                  │
/// │       │                                                                 │
/// │       ├── qty <= 0? → Error: "quantity must be greater than 0"         │
/// │       │                                                                 │
/// │       └── OK → ledger checks availability                              │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn validate_quantity(quantity: i64) -> ValidationResult<()> {
    if quantity <= 0 {
        return Err(ValidationError::must_be_positive("quantity"));
    }
    Ok(())
}

// =============================================================================
// Record Validators
// =============================================================================

/// Validates every field of a candidate record.
pub fn validate_new_sweet(sweet: &NewSweet) -> ValidationResult<()> {
    validate_name(&sweet.name)?;
    validate_category(&sweet.category)?;
    validate_price(sweet.price)?;
    validate_stock(sweet.in_stock)?;
    Ok(())
}

/// Validates a stored record after a patch has been merged into it.
pub fn validate_sweet(sweet: &Sweet) -> ValidationResult<()> {
    validate_name(&sweet.name)?;
    validate_category(&sweet.category)?;
    validate_price(sweet.price)?;
    validate_stock(sweet.in_stock)?;
    Ok(())
}

/// Validates only the fields a partial update carries.
pub fn validate_patch(patch: &SweetPatch) -> ValidationResult<()> {
    if let Some(name) = &patch.name {
        validate_name(name)?;
    }
    if let Some(category) = &patch.category {
        validate_category(category)?;
    }
    if let Some(price) = patch.price {
        validate_price(price)?;
    }
    if let Some(in_stock) = patch.in_stock {
        validate_stock(in_stock)?;
    }
    Ok(())
}

/// Turns a request body into a complete record.
///
/// Create and full-replacement update both go through here: every field is
/// required, then the value rules apply. Text fields come back trimmed.
///
/// ## Example
/// ```rust
/// use sweetshop_core::validation::require_complete;
/// use sweetshop_core::{Money, SweetPatch};
///
/// let body = SweetPatch {
///     name: Some(" Ladoo ".into()),
///     category: Some("Dry Sweets".into()),
///     price: Some(Money::from_cents(1000)),
///     in_stock: Some(40),
/// };
/// let sweet = require_complete(body).unwrap();
/// assert_eq!(sweet.name, "Ladoo");
///
/// assert!(require_complete(Default::default()).is_err());
/// ```
pub fn require_complete(patch: SweetPatch) -> ValidationResult<NewSweet> {
    let name = present_text("name", patch.name)?;
    let category = present_text("category", patch.category)?;
    let price = patch.price.ok_or_else(|| ValidationError::required("price"))?;
    let in_stock = patch
        .in_stock
        .ok_or_else(|| ValidationError::required("in_stock"))?;

    let sweet = NewSweet {
        name,
        category,
        price,
        in_stock,
    };
    validate_new_sweet(&sweet)?;
    Ok(sweet)
}

fn present_text(field: &str, value: Option<String>) -> ValidationResult<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
        _ => Err(ValidationError::required(field)),
    }
}

// =============================================================================
// Identifier Validators
// =============================================================================

/// Parses a path segment into a `SweetId`.
///
/// ## Example
/// ```rust
/// use sweetshop_core::validation::parse_sweet_id;
///
/// assert_eq!(parse_sweet_id("42").unwrap(), 42);
/// assert!(parse_sweet_id("abc").is_err());
/// ```
pub fn parse_sweet_id(raw: &str) -> ValidationResult<SweetId> {
    raw.trim()
        .parse::<SweetId>()
        .map_err(|_| ValidationError::InvalidFormat {
            field: "ID".to_string(),
        })
}

// =============================================================================
// Unit Tests
// =============================================================================
