//! # Cart Commands
//!
//! ## Cart Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Lifecycle                                       │
//! │                                                                         │
//! │  ┌──────────┐     ┌──────────┐     ┌──────────┐                        │
//! │  │  Empty   │────►│ In Cart  │────►│ Checkout │                        │
//! │  │  Cart    │     │          │     │  lines   │                        │
//! │  └──────────┘     └──────────┘     └──────────┘                        │
//! │                        │                                                │
//! │                   add <id>                                              │
//! │                   set <id> <qty>                                        │
//! │                   remove <id>                                           │
//! │                        │                                                │
//! │                        ▼                                                │
//! │                   clear ──────────────────────► (back to empty)        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Mutations return the [`CartOutcome`] so `main` can pick the exit status.

use anyhow::{anyhow, Result};
use muebleria_core::{CartChange, CheckoutLine, Money, ProductId};
use muebleria_store::{CartOutcome, CartSnapshot, CartView, StoreHealth, StoreResult};
use serde::Serialize;
use tracing::{debug, warn};

use super::Context;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MutationResponse {
    #[serde(flatten)]
    outcome: CartOutcome,
    cart: CartSnapshot,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CheckoutResponse {
    lines: Vec<CheckoutLine>,
    total: Money,
}

/// Prints the current cart.
pub fn show(ctx: &Context) -> Result<()> {
    debug!("show command");
    let snapshot = snapshot(ctx);

    if ctx.json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        print_cart(ctx, &snapshot);
    }
    Ok(())
}

pub fn add(ctx: &Context, id: &ProductId, quantity: i64) -> Result<CartOutcome> {
    debug!(product_id = %id, quantity, "add command");
    let product = ctx
        .catalog
        .find(id)
        .ok_or_else(|| anyhow!("Product {} is not in the catalog", id))?;

    finish(ctx, ctx.store.add_item(product, quantity).into())
}

pub fn set(ctx: &Context, id: &ProductId, quantity: i64) -> Result<CartOutcome> {
    debug!(product_id = %id, quantity, "set command");
    finish(ctx, ctx.store.update_quantity(id, quantity).into())
}

pub fn remove(ctx: &Context, id: &ProductId) -> Result<CartOutcome> {
    debug!(product_id = %id, "remove command");
    finish(ctx, ctx.store.remove_item(id).into())
}

pub fn clear(ctx: &Context) -> Result<CartOutcome> {
    debug!("clear command");
    ctx.store.clear_cart();
    finish(ctx, CartOutcome::from(StoreResult::Ok(CartChange::Cleared)))
}

/// Prints the payment lines the checkout collaborator would receive.
pub fn checkout(ctx: &Context) -> Result<CartOutcome> {
    debug!("checkout command");
    let lines = ctx.store.checkout_lines();

    if lines.is_empty() {
        let outcome = CartOutcome {
            success: false,
            message: "The cart is empty".to_string(),
        };
        report_failure(ctx, &outcome)?;
        return Ok(outcome);
    }

    let total: Money = lines.iter().map(|line| line.line_total).sum();
    let line_count = lines.len();

    if ctx.json {
        let response = CheckoutResponse { lines, total };
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        for line in &lines {
            println!(
                "{:>3} × {:<26} {:>12}  {:>12}",
                line.quantity,
                line.name,
                ctx.currency.format(line.unit_price),
                ctx.currency.format(line.line_total)
            );
        }
        println!("{:>57}", format!("TOTAL {}", ctx.currency.format(total)));
    }

    Ok(CartOutcome {
        success: true,
        message: format!("{} lines ready for checkout", line_count),
    })
}

// =============================================================================
// Output
// =============================================================================

fn snapshot(ctx: &Context) -> CartSnapshot {
    if ctx.store.health() == StoreHealth::Degraded {
        warn!(key = ctx.store.key(), "Cart storage is degraded");
    }
    CartView::attach(&ctx.store).snapshot()
}

fn finish(ctx: &Context, outcome: CartOutcome) -> Result<CartOutcome> {
    if !outcome.success {
        report_failure(ctx, &outcome)?;
        return Ok(outcome);
    }

    let cart = snapshot(ctx);
    if ctx.json {
        let response = MutationResponse {
            outcome: outcome.clone(),
            cart,
        };
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        println!("✓ {}", outcome.message);
        print_cart(ctx, &cart);
    }
    Ok(outcome)
}

fn report_failure(ctx: &Context, outcome: &CartOutcome) -> Result<()> {
    if ctx.json {
        println!("{}", serde_json::to_string_pretty(outcome)?);
    } else {
        eprintln!("✗ {}", outcome.message);
    }
    Ok(())
}

fn print_cart(ctx: &Context, cart: &CartSnapshot) {
    if cart.items.is_empty() {
        println!("Cart is empty");
        return;
    }

    for line in &cart.items {
        println!(
            "{:<18} {:<26} {:>3} × {:>12}  {:>12}",
            line.product_id.to_string(),
            line.name(),
            line.quantity,
            ctx.currency.format(line.unit_price),
            ctx.currency.format(line.line_total())
        );
    }
    println!(
        "{} items, total {}",
        cart.item_count,
        ctx.currency.format(cart.total)
    );
}
