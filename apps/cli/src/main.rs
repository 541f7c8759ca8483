//! # Mueblería Cart CLI
//!
//! Drives the persisted cart from a terminal, the way the storefront drives
//! it from the browser.
//!
//! ## Usage
//! ```bash
//! muebleria-cart products
//! muebleria-cart add 1 --quantity 2
//! muebleria-cart set 1 1
//! muebleria-cart remove 1
//! muebleria-cart show --json
//! muebleria-cart checkout
//! ```
//!
//! ## Startup Sequence
//! 1. Initialize tracing (stderr, `RUST_LOG`)
//! 2. Load `CartConfig` (file, then environment)
//! 3. Open the configured storage and cart slot
//! 4. Load the catalog (`--catalog` file or built-in seed)
//! 5. Run the command; a failed cart outcome exits with status 1

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use muebleria_core::{ProductId, ValidationError};
use muebleria_store::{CartConfig, CartOutcome};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod catalog;
mod commands;

use catalog::Catalog;
use commands::Context;

#[derive(Parser)]
#[command(name = "muebleria-cart")]
#[command(author, version, about = "Mueblería shopping cart")]
struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// JSON product list to use instead of the built-in catalog
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Print JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List catalog products
    Products,
    /// Show the cart
    Show,
    /// Add a product to the cart
    Add {
        /// Product id (integer or text)
        #[arg(value_parser = parse_product_id)]
        id: ProductId,

        #[arg(short, long, default_value_t = 1, allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Set a line's quantity (0 removes it)
    Set {
        #[arg(value_parser = parse_product_id)]
        id: ProductId,

        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Remove a product from the cart
    Remove {
        #[arg(value_parser = parse_product_id)]
        id: ProductId,
    },
    /// Empty the cart
    Clear,
    /// Print the lines that would be sent to checkout
    Checkout,
}

/// Integer ids stay integers so `add 1` matches catalog id `1`.
///
/// clap's default parser would pick `From<&str>` and turn every id into text.
fn parse_product_id(raw: &str) -> Result<ProductId, ValidationError> {
    raw.parse()
}

fn main() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();

    match run(cli) {
        Ok(None) => ExitCode::SUCCESS,
        Ok(Some(outcome)) if outcome.success => ExitCode::SUCCESS,
        Ok(Some(_)) => ExitCode::FAILURE,
        Err(e) => {
            error!("Command failed: {:#}", e);
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Runs one command. Mutations hand back their outcome.
fn run(cli: Cli) -> Result<Option<CartOutcome>> {
    let config = CartConfig::load(cli.config).context("Failed to load cart configuration")?;
    info!(
        backend = %config.storage.backend,
        key = %config.storage.key,
        currency = %config.currency.code,
        "Configuration loaded"
    );

    let store = config.open_store().context("Failed to open cart storage")?;
    let catalog = match &cli.catalog {
        Some(path) => Catalog::load(path, &config.currency)?,
        None => Catalog::seed(&config.currency)?,
    };

    let ctx = Context {
        store: Arc::new(store),
        catalog,
        currency: config.currency,
        json: cli.json,
    };

    let outcome = match cli.command {
        Command::Products => {
            commands::products::list(&ctx)?;
            None
        }
        Command::Show => {
            commands::cart::show(&ctx)?;
            None
        }
        Command::Add { id, quantity } => Some(commands::cart::add(&ctx, &id, quantity)?),
        Command::Set { id, quantity } => Some(commands::cart::set(&ctx, &id, quantity)?),
        Command::Remove { id } => Some(commands::cart::remove(&ctx, &id)?),
        Command::Clear => Some(commands::cart::clear(&ctx)?),
        Command::Checkout => Some(commands::cart::checkout(&ctx)?),
    };
    Ok(outcome)
}

/// Logs go to stderr so `--json` output on stdout stays parseable.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,muebleria=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_product_ids_parse_as_int_or_text() {
        let cli = Cli::parse_from(["muebleria-cart", "add", "7", "--quantity", "2"]);
        match cli.command {
            Command::Add { id, quantity } => {
                assert_eq!(id, ProductId::Int(7));
                assert_eq!(quantity, 2);
            }
            _ => panic!("expected add"),
        }

        let cli = Cli::parse_from(["muebleria-cart", "--json", "remove", "estante-modular"]);
        assert!(cli.json);
        match cli.command {
            Command::Remove { id } => assert_eq!(id, ProductId::Text("estante-modular".into())),
            _ => panic!("expected remove"),
        }
    }

    #[test]
    fn test_parsed_integer_id_matches_catalog_product() {
        use muebleria_core::Currency;
        use muebleria_store::{CartStore, MemoryStorage};

        let currency = Currency::clp();
        let ctx = Context {
            store: Arc::new(CartStore::new(Arc::new(MemoryStorage::new()))),
            catalog: Catalog::seed(&currency).unwrap(),
            currency,
            json: false,
        };

        let cli = Cli::parse_from(["muebleria-cart", "add", "1"]);
        let Command::Add { id, quantity } = cli.command else {
            panic!("expected add");
        };
        assert!(commands::cart::add(&ctx, &id, quantity).unwrap().success);
        assert_eq!(ctx.store.get_item_count(), 1);

        let cli = Cli::parse_from(["muebleria-cart", "set", "1", "3"]);
        let Command::Set { id, quantity } = cli.command else {
            panic!("expected set");
        };
        assert!(commands::cart::set(&ctx, &id, quantity).unwrap().success);
        assert_eq!(ctx.store.get_item_count(), 3);

        let cli = Cli::parse_from(["muebleria-cart", "remove", "1"]);
        let Command::Remove { id } = cli.command else {
            panic!("expected remove");
        };
        assert!(commands::cart::remove(&ctx, &id).unwrap().success);
        assert!(ctx.store.get_items().is_empty());
    }

    #[test]
    fn test_set_accepts_zero_and_negative() {
        let cli = Cli::parse_from(["muebleria-cart", "set", "1", "-1"]);
        assert!(matches!(cli.command, Command::Set { quantity: -1, .. }));
    }
}
