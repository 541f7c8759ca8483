//! # CLI Commands
//!
//! - [`products`] - Catalog listing
//! - [`cart`] - Cart inspection and mutation

pub mod cart;
pub mod products;

use std::sync::Arc;

use muebleria_core::Currency;
use muebleria_store::CartStore;

use crate::catalog::Catalog;

/// What every command gets handed by `main`.
pub struct Context {
    pub store: Arc<CartStore>,
    pub catalog: Catalog,
    pub currency: Currency,

    /// Print JSON instead of tables.
    pub json: bool,
}
