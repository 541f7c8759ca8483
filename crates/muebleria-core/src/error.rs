//! # Error Types
//!
//! Domain-specific error types for muebleria-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  muebleria-core errors (this file)                                     │
//! │  ├── CoreError        - Cart business rule failures                    │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  muebleria-store errors (separate crate)                               │
//! │  ├── StorageError     - Persistence medium failures                    │
//! │  └── StoreError       - What the cart store returns to callers         │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → StoreError → CartOutcome → UI     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every message here is shown to the shopper as-is, so each variant reads
//! as a complete sentence.

use thiserror::Error;

use crate::types::ProductId;

// =============================================================================
// Core Error
// =============================================================================

/// Cart business rule failures.
///
/// These are expected outcomes, not bugs: a shopper asking for more units
/// than are in stock is an everyday event. They are returned, never raised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// First add of a product asked for more units than the stock ceiling.
    ///
    /// ## User Workflow
    /// ```text
    /// Add to Cart (qty: 5)
    ///      │
    ///      ▼
    /// No line for product, stock = 3
    ///      │
    ///      ▼
    /// InsufficientStock { name: "Sofá", available: 3, requested: 5 }
    ///      │
    ///      ▼
    /// UI shows: "Only 3 units of Sofá available"
    /// ```
    #[error("Only {available} units of {name} available")]
    InsufficientStock {
        name: String,
        available: i64,
        requested: i64,
    },

    /// The product is already in the cart and the increment would pass the
    /// stock ceiling. `remaining` is how many more units could still be added.
    #[error("{}", add_limit_message(.name, .remaining))]
    AddLimitReached {
        name: String,
        remaining: i64,
        in_cart: i64,
    },

    /// A quantity update asked for more units than the line's stock ceiling.
    #[error("Maximum available for {name} is {max}")]
    ExceedsStock { name: String, max: i64 },

    /// No line in the cart matches the product id.
    #[error("Product {0} not found in cart")]
    NotInCart(ProductId),

    /// The cart total would no longer fit the money type.
    #[error("The cart total is too large to add more units of {name}")]
    TotalTooLarge { name: String },

    /// Quantity to add was zero or negative.
    #[error("Quantity must be at least 1, got {0}")]
    InvalidQuantity(i64),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

fn add_limit_message(name: &str, remaining: &i64) -> String {
    if *remaining <= 0 {
        format!("No more units of {} available", name)
    } else {
        format!("You can only add {} more units of {}", remaining, name)
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised where products enter the cart. A product that fails validation
/// is a collaborator contract violation, not a shopper mistake.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    Negative { field: String },

    /// Invalid format (e.g., non-finite price).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
