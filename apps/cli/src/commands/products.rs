use anyhow::Result;
use tracing::debug;

use super::Context;

/// Prints the catalog with prices and availability.
pub fn list(ctx: &Context) -> Result<()> {
    debug!("products command");

    if ctx.json {
        println!("{}", serde_json::to_string_pretty(ctx.catalog.products())?);
        return Ok(());
    }

    println!("{:<18} {:<26} {:>12} {:>7}", "ID", "PRODUCT", "PRICE", "STOCK");
    for product in ctx.catalog.products() {
        let stock = if product.in_stock() {
            product.stock.to_string()
        } else {
            "agotado".to_string()
        };
        println!(
            "{:<18} {:<26} {:>12} {:>7}",
            product.id.to_string(),
            product.name,
            ctx.currency.format(product.price),
            stock
        );
    }
    Ok(())
}
