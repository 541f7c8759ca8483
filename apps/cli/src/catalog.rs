//! # Product Catalog
//!
//! Product lookup for the cart. The storefront reads products from its
//! catalog API; the CLI reads the same JSON shape from a file, or falls back
//! to a small built-in furniture range.
//!
//! ```json
//! [
//!   { "id": 1, "name": "Sofá 3 cuerpos", "price": 349990, "image_url": "/img/sofa.jpg", "stock": 3 },
//!   { "id": "estante-modular", "name": "Estante modular", "price": 129990, "stock": 5 }
//! ]
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use muebleria_core::{Currency, Product, ProductId, ProductListing};
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Reads a JSON array of listings and converts prices to `currency`.
    pub fn load(path: &Path, currency: &Currency) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog {}", path.display()))?;
        let listings: Vec<ProductListing> = serde_json::from_str(&contents)
            .with_context(|| format!("Catalog {} is not a JSON product list", path.display()))?;

        let catalog = Self::from_listings(&listings, currency)?;
        info!(path = %path.display(), products = catalog.products.len(), "Catalog loaded");
        Ok(catalog)
    }

    /// The built-in furniture range.
    pub fn seed(currency: &Currency) -> Result<Self> {
        let catalog = Self::from_listings(&seed_listings(), currency)?;
        debug!(products = catalog.products.len(), "Using built-in catalog");
        Ok(catalog)
    }

    fn from_listings(listings: &[ProductListing], currency: &Currency) -> Result<Self> {
        let products = listings
            .iter()
            .map(|listing| {
                Product::from_listing(listing, currency)
                    .with_context(|| format!("Invalid catalog product {}", listing.id))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Catalog { products })
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn find(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| &p.id == id)
    }
}

fn listing(id: ProductId, name: &str, price: f64, image: &str, stock: i64) -> ProductListing {
    ProductListing {
        id,
        name: name.to_string(),
        price,
        image_url: Some(image.to_string()),
        stock,
    }
}

fn seed_listings() -> Vec<ProductListing> {
    vec![
        listing(1.into(), "Sofá 3 cuerpos", 349_990.0, "/img/sofa-3-cuerpos.jpg", 3),
        listing(2.into(), "Mesa de centro roble", 89_990.0, "/img/mesa-centro.jpg", 10),
        listing(3.into(), "Silla nórdica", 45_000.0, "/img/silla-nordica.jpg", 12),
        listing(4.into(), "Velador", 39_990.0, "/img/velador.jpg", 0),
        listing("estante-modular".into(), "Estante modular", 129_990.0, "/img/estante.jpg", 5),
    ]
}
