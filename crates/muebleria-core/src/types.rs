//! # Domain Types
//!
//! Core domain types used throughout the Mueblería cart.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐        ┌─────────────────────────────────────┐    │
//! │  │ ProductListing  │        │          CartLineItem               │    │
//! │  │  (API shape,    │        │  ─────────────────────────────────  │    │
//! │  │   float price)  │        │  product_id                         │    │
//! │  └────────┬────────┘        │  quantity       (1..=stock_at_add)  │    │
//! │           │ from_listing    │  unit_price     (frozen Money)      │    │
//! │           ▼                 │  product_snapshot ─┐                │    │
//! │  ┌─────────────────┐        │  added_at          │                │    │
//! │  │    Product      │ ─────► └────────────────────┼────────────────┘    │
//! │  │  id, name       │  add          ┌─────────────▼─────────────┐       │
//! │  │  price (Money)  │               │     ProductSnapshot       │       │
//! │  │  image_url      │               │  name, image_url,         │       │
//! │  │  stock          │               │  stock_at_add             │       │
//! │  └─────────────────┘               └───────────────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! A line item copies the product's price and display fields when it is
//! added. The cart never re-fetches them, so what the shopper saw is what
//! the checkout charges.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::{Currency, Money};
use crate::validation::{validate_product, ValidationResult};

// =============================================================================
// Product Id
// =============================================================================

/// Opaque product key.
///
/// The Postgres storefront keys products by integer, the document API by
/// string. Both shapes serialize untagged, so the persisted payload holds
/// `"productId": 1` or `"productId": "64f1..."`.
///
/// `Int(1)` and `Text("1")` are different keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(untagged)]
pub enum ProductId {
    Int(i64),
    Text(String),
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProductId::Int(id) => write!(f, "{}", id),
            ProductId::Text(id) => f.write_str(id),
        }
    }
}

/// Parses integer-looking input as `Int`, anything else as `Text`.
impl FromStr for ProductId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ValidationError::Required {
                field: "product id".to_string(),
            });
        }

        Ok(s.parse::<i64>()
            .map(ProductId::Int)
            .unwrap_or_else(|_| ProductId::Text(s.to_string())))
    }
}

impl From<i64> for ProductId {
    fn from(id: i64) -> Self {
        ProductId::Int(id)
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        ProductId::Text(id.to_string())
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product as the cart needs it: exactly the fields it copies or checks.
///
/// Construct through [`Product::new`] or [`Product::from_listing`] so the
/// boundary validation runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,

    /// Display name shown in the cart.
    pub name: String,

    /// Unit price in minor units.
    pub price: Money,

    pub image_url: String,

    /// Units known to be available right now.
    pub stock: i64,
}

impl Product {
    /// Creates a validated product.
    ///
    /// ## Example
    /// ```rust
    /// use muebleria_core::{Money, Product, ProductId};
    ///
    /// let sofa = Product::new(ProductId::Int(1), "Sofá", Money::from_minor(150_000), "x", 3);
    /// assert!(sofa.is_ok());
    ///
    /// let broken = Product::new(ProductId::Int(2), "", Money::from_minor(1), "x", 3);
    /// assert!(broken.is_err());
    /// ```
    pub fn new(
        id: ProductId,
        name: impl Into<String>,
        price: Money,
        image_url: impl Into<String>,
        stock: i64,
    ) -> ValidationResult<Self> {
        let product = Product {
            id,
            name: name.into(),
            price,
            image_url: image_url.into(),
            stock,
        };
        validate_product(&product)?;
        Ok(product)
    }

    /// Converts a catalog listing into a cart-ready product, rounding the
    /// price to the currency's minor unit.
    pub fn from_listing(listing: &ProductListing, currency: &Currency) -> ValidationResult<Self> {
        let price = currency.round(listing.price)?;
        Product::new(
            listing.id.clone(),
            listing.name.trim(),
            price,
            listing.image_url.clone().unwrap_or_default(),
            listing.stock,
        )
    }

    /// Checks if at least one unit is available.
    #[inline]
    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

/// Product shape as the catalog API returns it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductListing {
    pub id: ProductId,
    pub name: String,

    /// Price in major units, as a JSON number.
    pub price: f64,

    #[serde(default, alias = "image_url")]
    pub image_url: Option<String>,

    #[serde(default)]
    pub stock: i64,
}

// =============================================================================
// Cart Line Item
// =============================================================================

/// Display fields frozen at add time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductSnapshot {
    pub name: String,
    pub image_url: String,

    /// Stock ceiling used to clamp quantity updates.
    pub stock_at_add: i64,
}

impl ProductSnapshot {
    pub fn of(product: &Product) -> Self {
        ProductSnapshot {
            name: product.name.clone(),
            image_url: product.image_url.clone(),
            stock_at_add: product.stock,
        }
    }
}

/// One row per distinct product in the cart.
///
/// ## Invariants
/// - `quantity >= 1` (a line driven to zero is deleted, never stored)
/// - `quantity <= product_snapshot.stock_at_add` at the time of the last
///   successful mutation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartLineItem {
    pub product_id: ProductId,

    pub quantity: i64,

    /// Price at time of adding (frozen)
    pub unit_price: Money,

    pub product_snapshot: ProductSnapshot,

    /// When the line was first created. Older payloads lack it; they load
    /// with the load time instead.
    #[serde(default = "Utc::now")]
    #[ts(as = "String")]
    pub added_at: DateTime<Utc>,
}

impl CartLineItem {
    /// Creates a new line item from a product and quantity.
    ///
    /// ## Price Freezing
    /// The price is captured at this moment. If the catalog price changes
    /// later, this line keeps the original price.
    pub fn from_product(product: &Product, quantity: i64) -> Self {
        CartLineItem {
            product_id: product.id.clone(),
            quantity,
            unit_price: product.price,
            product_snapshot: ProductSnapshot::of(product),
            added_at: Utc::now(),
        }
    }

    /// Unit price × quantity.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.product_snapshot.name
    }

    #[inline]
    pub fn stock_ceiling(&self) -> i64 {
        self.product_snapshot.stock_at_add
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
