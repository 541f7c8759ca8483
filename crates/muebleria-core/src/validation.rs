//! # Validation Module
//!
//! Boundary validation for everything that enters the cart.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Catalog boundary                                              │
//! │  ├── Product::new / Product::from_listing                              │
//! │  └── THIS MODULE: name, price, stock checks                            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Cart rules (cart.rs)                                          │
//! │  ├── Quantity must be positive                                         │
//! │  └── Quantity clamped by stock ceiling                                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Load sanitization (muebleria-store)                          │
//! │  └── Drops zero-quantity and duplicate persisted lines                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use muebleria_core::validation::{validate_quantity, validate_storage_key};
//!
//! assert!(validate_quantity(2).is_ok());
//! assert!(validate_storage_key("cart").is_ok());
//! assert!(validate_storage_key("../etc").is_err());
//! ```

use crate::error::ValidationError;
use crate::types::{Product, ProductId};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

const MAX_NAME_LEN: usize = 200;
const MAX_KEY_LEN: usize = 64;

// =============================================================================
// Product Validators
// =============================================================================

/// Validates a product before it is copied into a cart line.
///
/// ## Rules
/// - Text ids must not be blank
/// - Name must not be blank and at most 200 characters
/// - Price must not be negative (zero is allowed: gifts, samples)
/// - Stock must not be negative
pub fn validate_product(product: &Product) -> ValidationResult<()> {
    if let ProductId::Text(id) = &product.id {
        if id.trim().is_empty() {
            return Err(ValidationError::Required {
                field: "product id".to_string(),
            });
        }
    }

    validate_product_name(&product.name)?;

    if product.price.is_negative() {
        return Err(ValidationError::Negative {
            field: "price".to_string(),
        });
    }

    if product.stock < 0 {
        return Err(ValidationError::Negative {
            field: "stock".to_string(),
        });
    }

    Ok(())
}

/// Validates a product name.
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a quantity to add.
///
/// ## Rules
/// - Must be positive (> 0)
///
/// Stock limits are checked by the cart, which knows the existing line.
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: i64::MAX,
        });
    }

    Ok(())
}

// =============================================================================
// Storage Key Validators
// =============================================================================

/// Validates the name of a storage slot.
///
/// ## Rules
/// - 1 to 64 characters
/// - Only ASCII letters, digits, `-` and `_`
///
/// The file backend uses the key as a file name, so anything that could
/// escape the data directory is rejected.
pub fn validate_storage_key(key: &str) -> ValidationResult<()> {
    if key.is_empty() {
        return Err(ValidationError::Required {
            field: "storage key".to_string(),
        });
    }

    if key.len() > MAX_KEY_LEN {
        return Err(ValidationError::TooLong {
            field: "storage key".to_string(),
            max: MAX_KEY_LEN,
        });
    }

    if !key
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "storage key".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;

    fn product(name: &str, price: i64, stock: i64) -> Product {
        Product {
            id: ProductId::Int(1),
            name: name.to_string(),
            price: Money::from_minor(price),
            image_url: String::new(),
            stock,
        }
    }

    #[test]
    fn test_validate_product() {
        assert!(validate_product(&product("Sofá", 150_000, 3)).is_ok());
        assert!(validate_product(&product("Muestra", 0, 0)).is_ok());

        assert!(validate_product(&product("", 1, 1)).is_err());
        assert!(validate_product(&product("Sofá", -1, 1)).is_err());
        assert!(validate_product(&product("Sofá", 1, -1)).is_err());
    }

    #[test]
    fn test_validate_product_blank_text_id() {
        let mut p = product("Sofá", 1, 1);
        p.id = ProductId::Text("  ".to_string());
        assert_eq!(
            validate_product(&p),
            Err(ValidationError::Required {
                field: "product id".to_string()
            })
        );
    }

    #[test]
    fn test_validate_product_name() {
        assert!(validate_product_name("Sofá 3 cuerpos").is_ok());
        assert!(validate_product_name("   ").is_err());
        assert!(validate_product_name(&"A".repeat(201)).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(999).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-3).is_err());
    }

    #[test]
    fn test_validate_storage_key() {
        assert!(validate_storage_key("cart").is_ok());
        assert!(validate_storage_key("cart_tab-2").is_ok());

        assert!(validate_storage_key("").is_err());
        assert!(validate_storage_key("cart/../x").is_err());
        assert!(validate_storage_key("carro compras").is_err());
        assert!(validate_storage_key(&"k".repeat(65)).is_err());
    }
}
