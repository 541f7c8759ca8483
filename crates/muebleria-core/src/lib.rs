//! # muebleria-core: Pure Cart Rules for the Mueblería Storefront
//!
//! This crate holds the rules of the shopping cart as pure functions with
//! zero I/O dependencies. Persistence and change notification live in
//! `muebleria-store`, which delegates every mutation to [`cart::Cart`].
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Mueblería Cart Architecture                        │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              Storefront / CLI (composition root)                │   │
//! │  │    Catalog ──► Add to cart ──► Cart view ──► Checkout           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │        muebleria-store (CartStore, storage, channel, view)      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ muebleria-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   cart    │  │ validation│  │   │
//! │  │   │  Product  │  │   Money   │  │   Cart    │  │   rules   │  │   │
//! │  │   │ LineItem  │  │ Currency  │  │ CartChange│  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO STORAGE • NO NETWORK • PURE FUNCTIONS            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (ProductId, Product, CartLineItem)
//! - [`money`] - Money type with integer arithmetic and currency formatting
//! - [`cart`] - The cart collection and its mutation rules
//! - [`error`] - Domain error types
//! - [`validation`] - Boundary validation for products and quantities
//!
//! ## Example Usage
//!
//! ```rust
//! use muebleria_core::{Cart, Money, Product, ProductId};
//!
//! let sofa = Product::new(ProductId::Int(1), "Sofá", Money::from_minor(150_000), "x", 3)
//!     .unwrap();
//!
//! let mut cart = Cart::new();
//! cart.add_item(&sofa, 1).unwrap();
//! cart.add_item(&sofa, 2).unwrap();
//!
//! assert_eq!(cart.item_count(), 3);
//! assert_eq!(cart.total(), Money::from_minor(450_000));
//! assert!(cart.add_item(&sofa, 1).is_err());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartChange, CartTotals, CheckoutLine};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::{Currency, Money};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Default storage slot name for the cart.
///
/// The storefront has always used the plain `cart` key in browser storage,
/// so persisted carts from earlier releases are picked up unchanged.
pub const DEFAULT_CART_KEY: &str = "cart";
