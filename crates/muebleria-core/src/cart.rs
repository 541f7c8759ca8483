//! # Cart Rules
//!
//! The cart collection and every rule that governs how it changes.
//!
//! `muebleria-store` wraps this type with persistence and notification; all
//! quantity merge and stock clamping decisions are made here, without I/O.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  Operation                  Line exists?      Result                    │
//! │  ─────────                  ────────────      ──────                    │
//! │                                                                         │
//! │  add_item(p, q) ──────────► no  ── q ≤ stock ─► push line  (Added)     │
//! │                             │      q > stock ─► InsufficientStock       │
//! │                             yes ─ sum ≤ stock ► qty = sum (Incremented) │
//! │                                   sum > stock ► AddLimitReached         │
//! │                                                                         │
//! │  update_quantity(id, q) ──► no ──────────────► NotInCart               │
//! │                             yes ─ q ≤ 0 ─────► drop line  (Removed)     │
//! │                                   q > ceiling ► ExceedsStock            │
//! │                                   otherwise ──► qty = q (QuantityUpdated)│
//! │                                                                         │
//! │  remove_item(id) ─────────► update_quantity(id, 0)                      │
//! │  clear() ─────────────────► items.clear()     (Cleared)                 │
//! │                                                                         │
//! │  A failed operation leaves the cart exactly as it was.                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{CartLineItem, Product, ProductId};
use crate::validation::{validate_product, validate_quantity};

// =============================================================================
// Cart Change
// =============================================================================

/// What a successful mutation did.
///
/// `Display` renders the confirmation shown to the shopper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum CartChange {
    /// A new line was created.
    Added {
        product_id: ProductId,
        name: String,
        quantity: i64,
    },

    /// An existing line grew through `add_item`. `quantity` is the new total.
    Incremented {
        product_id: ProductId,
        name: String,
        quantity: i64,
    },

    /// A line's quantity was set through `update_quantity`.
    QuantityUpdated {
        product_id: ProductId,
        name: String,
        quantity: i64,
    },

    Removed { product_id: ProductId, name: String },

    Cleared,
}

impl CartChange {
    /// Product touched by the change, if any.
    pub fn product_id(&self) -> Option<&ProductId> {
        match self {
            CartChange::Added { product_id, .. }
            | CartChange::Incremented { product_id, .. }
            | CartChange::QuantityUpdated { product_id, .. }
            | CartChange::Removed { product_id, .. } => Some(product_id),
            CartChange::Cleared => None,
        }
    }
}

impl fmt::Display for CartChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CartChange::Added { name, quantity, .. } => {
                write!(f, "{} × {} added to cart", quantity, name)
            }
            CartChange::Incremented { name, quantity, .. } => {
                write!(f, "{} in cart: {} units", name, quantity)
            }
            CartChange::QuantityUpdated { name, quantity, .. } => {
                write!(f, "Quantity of {} updated to {}", name, quantity)
            }
            CartChange::Removed { name, .. } => write!(f, "{} removed from cart", name),
            CartChange::Cleared => write!(f, "Cart cleared"),
        }
    }
}

// =============================================================================
// Totals & Checkout DTOs
// =============================================================================

/// Cart totals summary for views and API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    /// Distinct products in the cart.
    pub line_count: usize,

    /// Sum of all quantities (the badge number).
    pub item_count: i64,

    pub total: Money,
}

/// One line of the order handed to the checkout collaborator.
///
/// The payment session is built from these; the cart never calls out to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutLine {
    pub product_id: ProductId,
    pub name: String,
    pub image_url: String,
    pub quantity: i64,
    pub unit_price: Money,
    pub line_total: Money,
}

impl From<&CartLineItem> for CheckoutLine {
    fn from(line: &CartLineItem) -> Self {
        CheckoutLine {
            product_id: line.product_id.clone(),
            name: line.product_snapshot.name.clone(),
            image_url: line.product_snapshot.image_url.clone(),
            quantity: line.quantity,
            unit_price: line.unit_price,
            line_total: line.line_total(),
        }
    }
}

/// Lines discarded while loading a persisted payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SanitizeReport {
    /// Lines with quantity ≤ 0.
    pub non_positive: Vec<ProductId>,

    /// Later occurrences of an id already seen.
    pub duplicates: Vec<ProductId>,

    /// Lines with a negative unit price, or whose total would overflow.
    pub invalid_price: Vec<ProductId>,
}

impl SanitizeReport {
    pub fn is_clean(&self) -> bool {
        self.non_positive.is_empty() && self.duplicates.is_empty() && self.invalid_price.is_empty()
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The shopping cart.
///
/// ## Invariants
/// - Items are unique by `product_id` (adding the same product merges)
/// - Quantity is always ≥ 1 (driving it to 0 deletes the line)
/// - Quantity never exceeds the stock ceiling known at the last mutation
/// - Items keep insertion order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    items: Vec<CartLineItem>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart { items: Vec::new() }
    }

    /// Rebuilds a cart from persisted lines, enforcing the invariants the
    /// mutation methods would have kept.
    ///
    /// Lines with a non-positive quantity are dropped. For duplicate ids the
    /// first occurrence wins. A line with a negative unit price, or one that
    /// would push the cart total past i64, is dropped too. The report lists
    /// what was discarded.
    pub fn from_persisted(items: Vec<CartLineItem>) -> (Self, SanitizeReport) {
        let mut report = SanitizeReport::default();
        let mut seen = HashSet::with_capacity(items.len());
        let mut kept = Vec::with_capacity(items.len());
        let mut total = Money::zero();

        for line in items {
            if line.quantity <= 0 {
                report.non_positive.push(line.product_id);
                continue;
            }
            if seen.contains(&line.product_id) {
                report.duplicates.push(line.product_id);
                continue;
            }

            let running = if line.unit_price.is_negative() {
                None
            } else {
                line.unit_price
                    .checked_mul_quantity(line.quantity)
                    .and_then(|line_total| total.checked_add(line_total))
            };

            match running {
                Some(running) => {
                    total = running;
                    seen.insert(line.product_id.clone());
                    kept.push(line);
                }
                None => report.invalid_price.push(line.product_id),
            }
        }

        (Cart { items: kept }, report)
    }

    /// Adds a product to the cart or increases quantity if already present.
    ///
    /// ## Behavior
    /// - Product not in cart: creates a line if `quantity ≤ product.stock`
    /// - Product in cart: raises the quantity if the new total fits the
    ///   stock, and refreshes the line's stock ceiling to `product.stock`
    ///
    /// The unit price of an existing line is not touched.
    pub fn add_item(&mut self, product: &Product, quantity: i64) -> CoreResult<CartChange> {
        validate_product(product)?;
        validate_quantity(quantity).map_err(|_| CoreError::InvalidQuantity(quantity))?;

        if let Some(index) = self.items.iter().position(|l| l.product_id == product.id) {
            let in_cart = self.items[index].quantity;
            let new_qty = in_cart.checked_add(quantity).filter(|q| *q <= product.stock);

            let Some(new_qty) = new_qty else {
                return Err(CoreError::AddLimitReached {
                    name: product.name.clone(),
                    remaining: (product.stock - in_cart).max(0),
                    in_cart,
                });
            };

            let unit_price = self.items[index].unit_price;
            self.ensure_total_fits(&product.id, unit_price, new_qty, &product.name)?;

            let line = &mut self.items[index];
            line.quantity = new_qty;
            line.product_snapshot.stock_at_add = product.stock;

            return Ok(CartChange::Incremented {
                product_id: product.id.clone(),
                name: product.name.clone(),
                quantity: new_qty,
            });
        }

        if quantity > product.stock {
            return Err(CoreError::InsufficientStock {
                name: product.name.clone(),
                available: product.stock,
                requested: quantity,
            });
        }
        self.ensure_total_fits(&product.id, product.price, quantity, &product.name)?;

        self.items.push(CartLineItem::from_product(product, quantity));
        Ok(CartChange::Added {
            product_id: product.id.clone(),
            name: product.name.clone(),
            quantity,
        })
    }

    /// Sets the quantity of a line.
    ///
    /// ## Behavior
    /// - Quantity ≤ 0: removes the line
    /// - Quantity above the line's stock ceiling: error, line unchanged
    /// - Product not in cart: error
    pub fn update_quantity(&mut self, product_id: &ProductId, quantity: i64) -> CoreResult<CartChange> {
        let index = self
            .items
            .iter()
            .position(|l| &l.product_id == product_id)
            .ok_or_else(|| CoreError::NotInCart(product_id.clone()))?;

        if quantity <= 0 {
            let removed = self.items.remove(index);
            return Ok(CartChange::Removed {
                product_id: removed.product_id,
                name: removed.product_snapshot.name,
            });
        }

        let line = &self.items[index];
        if quantity > line.stock_ceiling() {
            return Err(CoreError::ExceedsStock {
                name: line.name().to_string(),
                max: line.stock_ceiling(),
            });
        }

        let name = line.name().to_string();
        self.ensure_total_fits(product_id, line.unit_price, quantity, &name)?;

        self.items[index].quantity = quantity;
        Ok(CartChange::QuantityUpdated {
            product_id: product_id.clone(),
            name,
            quantity,
        })
    }

    /// Removes an item from the cart by product ID.
    pub fn remove_item(&mut self, product_id: &ProductId) -> CoreResult<CartChange> {
        self.update_quantity(product_id, 0)
    }

    /// Clears all items from the cart.
    pub fn clear(&mut self) -> CartChange {
        self.items.clear();
        CartChange::Cleared
    }

    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    pub fn into_items(self) -> Vec<CartLineItem> {
        self.items
    }

    pub fn get(&self, product_id: &ProductId) -> Option<&CartLineItem> {
        self.items.iter().find(|l| &l.product_id == product_id)
    }

    /// Returns the number of distinct products in the cart.
    pub fn line_count(&self) -> usize {
        self.items.len()
    }

    /// Returns the total quantity of all items.
    pub fn item_count(&self) -> i64 {
        self.items
            .iter()
            .fold(0_i64, |count, l| count.saturating_add(l.quantity))
    }

    /// Sum of `quantity × unit_price`. No rounding happens here; prices were
    /// rounded when the product entered the cart.
    pub fn total(&self) -> Money {
        self.items.iter().map(CartLineItem::line_total).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn totals(&self) -> CartTotals {
        CartTotals {
            line_count: self.line_count(),
            item_count: self.item_count(),
            total: self.total(),
        }
    }

    pub fn checkout_lines(&self) -> Vec<CheckoutLine> {
        self.items.iter().map(CheckoutLine::from).collect()
    }

    /// Rejects a change that would leave the cart total outside i64 once
    /// `product_id` holds `quantity` units at `unit_price`.
    fn ensure_total_fits(
        &self,
        product_id: &ProductId,
        unit_price: Money,
        quantity: i64,
        name: &str,
    ) -> CoreResult<()> {
        let total = self
            .items
            .iter()
            .filter(|l| &l.product_id != product_id)
            .try_fold(Money::zero(), |acc, l| {
                acc.checked_add(l.unit_price.checked_mul_quantity(l.quantity)?)
            })
            .and_then(|others| others.checked_add(unit_price.checked_mul_quantity(quantity)?));

        match total {
            Some(_) => Ok(()),
            None => Err(CoreError::TotalTooLarge {
                name: name.to_string(),
            }),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sofa(stock: i64) -> Product {
        Product::new(ProductId::Int(1), "Sofá", Money::from_minor(150_000), "x", stock).unwrap()
    }

    fn mesa(stock: i64) -> Product {
        Product::new(
            ProductId::Text("mesa-roble".to_string()),
            "Mesa",
            Money::from_minor(89_990),
            "mesa.jpg",
            stock,
        )
        .unwrap()
    }

    fn assert_aggregates_consistent(cart: &Cart) {
        let total: i64 = cart
            .items()
            .iter()
            .map(|l| l.quantity * l.unit_price.minor_units())
            .sum();
        let count: i64 = cart.items().iter().map(|l| l.quantity).sum();
        assert_eq!(cart.total().minor_units(), total);
        assert_eq!(cart.item_count(), count);
    }

    #[test]
    fn test_walkthrough_scenario() {
        let mut cart = Cart::new();
        let product = sofa(3);
        let id = ProductId::Int(1);

        assert!(cart.add_item(&product, 1).is_ok());
        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.total(), Money::from_minor(150_000));

        assert!(cart.add_item(&product, 2).is_ok());
        assert_eq!(cart.get(&id).unwrap().quantity, 3);
        assert_eq!(cart.total(), Money::from_minor(450_000));

        let err = cart.add_item(&product, 1).unwrap_err();
        assert_eq!(err.to_string(), "No more units of Sofá available");
        assert_eq!(cart.get(&id).unwrap().quantity, 3);

        assert!(cart.update_quantity(&id, 1).is_ok());
        assert_eq!(cart.total(), Money::from_minor(150_000));

        assert!(cart.remove_item(&id).is_ok());
        assert!(cart.is_empty());
        assert_eq!(cart.total(), Money::zero());
        assert_eq!(cart.item_count(), 0);
    }

    #[test]
    fn test_add_within_and_beyond_stock() {
        for stock in 0..5 {
            for qty in 1..7 {
                let mut cart = Cart::new();
                let result = cart.add_item(&sofa(stock), qty);
                if qty <= stock {
                    assert!(result.is_ok());
                    assert_eq!(cart.get(&ProductId::Int(1)).unwrap().quantity, qty);
                } else {
                    assert!(matches!(result, Err(CoreError::InsufficientStock { .. })));
                    assert!(cart.is_empty());
                }
            }
        }
    }

    #[test]
    fn test_insufficient_stock_message_states_available_units() {
        let mut cart = Cart::new();
        let err = cart.add_item(&sofa(2), 5).unwrap_err();
        assert_eq!(err.to_string(), "Only 2 units of Sofá available");
    }

    #[test]
    fn test_merge_law() {
        let product = sofa(10);
        for a in 1..=5 {
            for b in 1..=5 {
                let mut merged = Cart::new();
                merged.add_item(&product, a).unwrap();
                merged.add_item(&product, b).unwrap();

                let mut single = Cart::new();
                single.add_item(&product, a + b).unwrap();

                assert_eq!(
                    merged.get(&ProductId::Int(1)).unwrap().quantity,
                    single.get(&ProductId::Int(1)).unwrap().quantity
                );
                assert_eq!(merged.line_count(), 1);
            }
        }
    }

    #[test]
    fn test_add_limit_reports_remaining_units() {
        let mut cart = Cart::new();
        let product = sofa(5);
        cart.add_item(&product, 2).unwrap();

        let err = cart.add_item(&product, 4).unwrap_err();
        assert_eq!(
            err,
            CoreError::AddLimitReached {
                name: "Sofá".to_string(),
                remaining: 3,
                in_cart: 2,
            }
        );
        assert_eq!(cart.get(&ProductId::Int(1)).unwrap().quantity, 2);
    }

    #[test]
    fn test_add_refreshes_stock_ceiling_but_not_price() {
        let mut cart = Cart::new();
        cart.add_item(&sofa(2), 1).unwrap();

        let mut restocked = sofa(8);
        restocked.price = Money::from_minor(120_000);
        cart.add_item(&restocked, 1).unwrap();

        let line = cart.get(&ProductId::Int(1)).unwrap();
        assert_eq!(line.stock_ceiling(), 8);
        assert_eq!(line.unit_price, Money::from_minor(150_000));

        assert!(cart.update_quantity(&ProductId::Int(1), 8).is_ok());
    }

    #[test]
    fn test_add_rejects_non_positive_quantity() {
        let mut cart = Cart::new();
        assert_eq!(
            cart.add_item(&sofa(3), 0),
            Err(CoreError::InvalidQuantity(0))
        );
        assert_eq!(
            cart.add_item(&sofa(3), -2),
            Err(CoreError::InvalidQuantity(-2))
        );
        assert!(cart.is_empty());
    }

    #[test]
    fn test_add_rejects_invalid_product() {
        let mut cart = Cart::new();
        let mut broken = sofa(3);
        broken.name = String::new();
        assert!(matches!(
            cart.add_item(&broken, 1),
            Err(CoreError::Validation(_))
        ));
    }

    #[test]
    fn test_add_overflow_is_a_stock_failure() {
        let mut cart = Cart::new();
        let product =
            Product::new(ProductId::Int(1), "Tornillo", Money::from_minor(1), "x", i64::MAX).unwrap();
        cart.add_item(&product, i64::MAX - 1).unwrap();
        assert!(matches!(
            cart.add_item(&product, i64::MAX),
            Err(CoreError::AddLimitReached { remaining: 1, .. })
        ));
    }

    #[test]
    fn test_add_rejects_total_past_money_range() {
        let mut cart = Cart::new();
        let product = Product::new(
            ProductId::Int(9),
            "Lámpara de lujo",
            Money::from_minor(i64::MAX / 2),
            "x",
            3,
        )
        .unwrap();

        assert_eq!(
            cart.add_item(&product, 3),
            Err(CoreError::TotalTooLarge {
                name: "Lámpara de lujo".to_string()
            })
        );
        assert!(cart.is_empty());

        cart.add_item(&product, 1).unwrap();
        cart.add_item(&product, 1).unwrap();
        assert!(matches!(
            cart.add_item(&product, 1),
            Err(CoreError::TotalTooLarge { .. })
        ));
        assert!(matches!(
            cart.update_quantity(&ProductId::Int(9), 3),
            Err(CoreError::TotalTooLarge { .. })
        ));
        assert_eq!(cart.item_count(), 2);
        assert_eq!(cart.total(), Money::from_minor(i64::MAX / 2 * 2));
        assert_aggregates_consistent(&cart);

        let err = cart.add_item(&sofa(3), 1).unwrap_err();
        assert_eq!(
            err.to_string(),
            "The cart total is too large to add more units of Sofá"
        );
    }

    #[test]
    fn test_update_quantity_boundaries() {
        let mut cart = Cart::new();
        cart.add_item(&sofa(4), 2).unwrap();
        let id = ProductId::Int(1);

        let err = cart.update_quantity(&id, 5).unwrap_err();
        assert_eq!(err.to_string(), "Maximum available for Sofá is 4");
        assert_eq!(cart.get(&id).unwrap().quantity, 2);

        assert!(matches!(
            cart.update_quantity(&id, 4),
            Ok(CartChange::QuantityUpdated { quantity: 4, .. })
        ));

        assert!(matches!(
            cart.update_quantity(&id, -1),
            Ok(CartChange::Removed { .. })
        ));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_update_unknown_product_fails_for_any_quantity() {
        let mut cart = Cart::new();
        cart.add_item(&sofa(4), 1).unwrap();
        let missing = ProductId::Int(99);

        for qty in [-1, 0, 1, 100] {
            assert_eq!(
                cart.update_quantity(&missing, qty),
                Err(CoreError::NotInCart(missing.clone()))
            );
        }
        assert_eq!(cart.line_count(), 1);
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut cart = Cart::new();
        cart.add_item(&sofa(4), 1).unwrap();

        assert_eq!(cart.clear(), CartChange::Cleared);
        assert!(cart.is_empty());
        assert_eq!(cart.clear(), CartChange::Cleared);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_insertion_order_is_stable() {
        let mut cart = Cart::new();
        cart.add_item(&sofa(5), 1).unwrap();
        cart.add_item(&mesa(5), 1).unwrap();
        cart.add_item(&sofa(5), 1).unwrap();

        let ids: Vec<_> = cart.items().iter().map(|l| l.product_id.clone()).collect();
        assert_eq!(
            ids,
            vec![ProductId::Int(1), ProductId::Text("mesa-roble".to_string())]
        );
    }

    #[test]
    fn test_aggregates_after_every_mutation() {
        let mut cart = Cart::new();
        let sofa = sofa(5);
        let mesa = mesa(3);
        let id = ProductId::Int(1);

        cart.add_item(&sofa, 2).unwrap();
        assert_aggregates_consistent(&cart);
        cart.add_item(&mesa, 3).unwrap();
        assert_aggregates_consistent(&cart);
        let _ = cart.add_item(&mesa, 1);
        assert_aggregates_consistent(&cart);
        cart.update_quantity(&id, 5).unwrap();
        assert_aggregates_consistent(&cart);
        cart.remove_item(&id).unwrap();
        assert_aggregates_consistent(&cart);

        assert_eq!(
            cart.totals(),
            CartTotals {
                line_count: 1,
                item_count: 3,
                total: Money::from_minor(269_970),
            }
        );
    }

    #[test]
    fn test_checkout_lines() {
        let mut cart = Cart::new();
        cart.add_item(&sofa(5), 2).unwrap();

        let lines = cart.checkout_lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].quantity, 2);
        assert_eq!(lines[0].line_total, Money::from_minor(300_000));
        assert_eq!(lines[0].name, "Sofá");
    }

    #[test]
    fn test_from_persisted_sanitizes() {
        let mut first = CartLineItem::from_product(&sofa(5), 2);
        let mut duplicate = first.clone();
        duplicate.quantity = 4;
        let mut zero = CartLineItem::from_product(&mesa(5), 1);
        zero.quantity = 0;
        first.quantity = 3;

        let (cart, report) = Cart::from_persisted(vec![first.clone(), zero, duplicate]);

        assert_eq!(cart.items(), &[first]);
        assert_eq!(
            report.non_positive,
            vec![ProductId::Text("mesa-roble".to_string())]
        );
        assert_eq!(report.duplicates, vec![ProductId::Int(1)]);
        assert!(report.invalid_price.is_empty());
        assert!(!report.is_clean());
    }

    #[test]
    fn test_from_persisted_drops_lines_with_unusable_prices() {
        let kept = CartLineItem::from_product(&sofa(5), 2);

        let mut overflowing = CartLineItem::from_product(&mesa(5), 1);
        overflowing.unit_price = Money::from_minor(i64::MAX);
        overflowing.quantity = 2;

        let mut negative = CartLineItem::from_product(
            &Product::new(ProductId::Int(7), "Cojín", Money::from_minor(9_990), "x", 5).unwrap(),
            1,
        );
        negative.unit_price = Money::from_minor(-9_990);

        let mut tips_total = CartLineItem::from_product(
            &Product::new(ProductId::Int(8), "Biombo", Money::from_minor(1), "x", 5).unwrap(),
            1,
        );
        tips_total.unit_price = Money::from_minor(i64::MAX - 1);

        let (cart, report) =
            Cart::from_persisted(vec![kept.clone(), overflowing, negative, tips_total]);

        assert_eq!(cart.items(), &[kept]);
        assert_eq!(
            report.invalid_price,
            vec![
                ProductId::Text("mesa-roble".to_string()),
                ProductId::Int(7),
                ProductId::Int(8),
            ]
        );
        assert_eq!(cart.total(), Money::from_minor(300_000));
        assert_aggregates_consistent(&cart);
    }

    #[test]
    fn test_change_messages() {
        let mut cart = Cart::new();
        let change = cart.add_item(&sofa(5), 2).unwrap();
        assert_eq!(change.to_string(), "2 × Sofá added to cart");
        assert_eq!(change.product_id(), Some(&ProductId::Int(1)));

        let change = cart.remove_item(&ProductId::Int(1)).unwrap();
        assert_eq!(change.to_string(), "Sofá removed from cart");
        assert_eq!(CartChange::Cleared.product_id(), None);
    }
}
