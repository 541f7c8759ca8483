//! # Cart Configuration
//!
//! Where the cart is stored and which currency it is priced in.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     MUEBLERIA_STORAGE=memory                                           │
//! │     MUEBLERIA_CART_KEY=cart                                            │
//! │     MUEBLERIA_DATA_DIR=/var/lib/muebleria                              │
//! │     MUEBLERIA_CURRENCY=CLP                                             │
//! │     MUEBLERIA_CURRENCY_SYMBOL=$                                        │
//! │     MUEBLERIA_CURRENCY_DECIMALS=0                                      │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/muebleria-cart/cart.toml (Linux)                         │
//! │     ~/Library/Application Support/com.muebleria.cart/cart.toml (macOS) │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     file backend, key "cart", CLP                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # cart.toml
//! [storage]
//! backend = "file"      # file | memory
//! key = "cart"
//! data_dir = "/var/lib/muebleria"
//!
//! [currency]
//! code = "CLP"
//! symbol = "$"
//! decimals = 0
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use muebleria_core::validation::validate_storage_key;
use muebleria_core::{Currency, DEFAULT_CART_KEY};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{ConfigError, ConfigResult};
use crate::storage::{CartStorage, FileStorage, MemoryStorage};
use crate::store::CartStore;

/// Largest number of currency decimals accepted.
pub const MAX_CURRENCY_DECIMALS: u8 = 4;

// =============================================================================
// Storage Backend
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    /// JSON files under the data directory. Survives restarts.
    #[default]
    File,

    /// Process memory only. Lost on exit.
    Memory,
}

impl std::fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackend::File => write!(f, "file"),
            StorageBackend::Memory => write!(f, "memory"),
        }
    }
}

impl std::str::FromStr for StorageBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "file" | "disk" => Ok(StorageBackend::File),
            "memory" | "mem" => Ok(StorageBackend::Memory),
            other => Err(ConfigError::Invalid(format!(
                "Unknown storage backend: '{}'. Valid options: file, memory",
                other
            ))),
        }
    }
}

// =============================================================================
// Storage Settings
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageSettings {
    #[serde(default)]
    pub backend: StorageBackend,

    /// Slot name the cart is persisted under.
    #[serde(default = "default_key")]
    pub key: String,

    /// Directory for the file backend. The platform data directory is used
    /// when unset.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

fn default_key() -> String {
    DEFAULT_CART_KEY.to_string()
}

impl Default for StorageSettings {
    fn default() -> Self {
        StorageSettings {
            backend: StorageBackend::default(),
            key: default_key(),
            data_dir: None,
        }
    }
}

// =============================================================================
// Cart Configuration
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CartConfig {
    #[serde(default)]
    pub storage: StorageSettings,

    #[serde(default)]
    pub currency: Currency,
}

impl CartConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (cart.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading cart config from file");
                config = Self::from_file(&path)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load cart config: {}. Using defaults.", e);
            Self::default()
        })
    }

    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> ConfigResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or(ConfigError::NoPath)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Cart config saved");
        Ok(())
    }

    pub fn validate(&self) -> ConfigResult<()> {
        validate_storage_key(&self.storage.key).map_err(|e| {
            ConfigError::Invalid(format!("storage.key: {}", e))
        })?;

        if self.currency.code.trim().is_empty() {
            return Err(ConfigError::Invalid("currency.code must not be empty".into()));
        }

        if self.currency.decimals > MAX_CURRENCY_DECIMALS {
            return Err(ConfigError::Invalid(format!(
                "currency.decimals must be at most {}, got {}",
                MAX_CURRENCY_DECIMALS, self.currency.decimals
            )));
        }

        Ok(())
    }

    /// Applies environment variable overrides.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(backend) = var("MUEBLERIA_STORAGE") {
            match backend.parse() {
                Ok(parsed) => {
                    debug!(backend = %backend, "Overriding storage backend from environment");
                    self.storage.backend = parsed;
                }
                Err(e) => warn!(error = %e, "Ignoring MUEBLERIA_STORAGE"),
            }
        }

        if let Some(key) = var("MUEBLERIA_CART_KEY") {
            debug!(key = %key, "Overriding cart key from environment");
            self.storage.key = key;
        }

        if let Some(dir) = var("MUEBLERIA_DATA_DIR") {
            debug!(dir = %dir, "Overriding data directory from environment");
            self.storage.data_dir = Some(PathBuf::from(dir));
        }

        // A new code without a symbol would still print "$", so the code
        // itself stands in until MUEBLERIA_CURRENCY_SYMBOL says otherwise.
        // Separators are left as configured.
        if let Some(code) = var("MUEBLERIA_CURRENCY") {
            if code != self.currency.code {
                debug!(code = %code, "Overriding currency from environment");
                self.currency.symbol = format!("{} ", code);
                self.currency.code = code;
            }
        }

        if let Some(symbol) = var("MUEBLERIA_CURRENCY_SYMBOL") {
            self.currency.symbol = symbol;
        }

        if let Some(decimals) = var("MUEBLERIA_CURRENCY_DECIMALS") {
            match decimals.parse::<u8>() {
                Ok(d) => self.currency.decimals = d,
                Err(_) => warn!(value = %decimals, "Ignoring MUEBLERIA_CURRENCY_DECIMALS"),
            }
        }
    }

    fn project_dirs() -> Option<directories::ProjectDirs> {
        directories::ProjectDirs::from("com", "muebleria", "cart")
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join("cart.toml"))
    }

    /// Directory the file backend writes to.
    pub fn data_dir(&self) -> Option<PathBuf> {
        self.storage
            .data_dir
            .clone()
            .or_else(|| Self::project_dirs().map(|dirs| dirs.data_dir().to_path_buf()))
    }

    // =========================================================================
    // Wiring
    // =========================================================================

    /// Builds the configured storage backend.
    pub fn build_storage(&self) -> ConfigResult<Arc<dyn CartStorage>> {
        match self.storage.backend {
            StorageBackend::Memory => Ok(Arc::new(MemoryStorage::new())),
            StorageBackend::File => {
                let dir = self.data_dir().ok_or(ConfigError::NoPath)?;
                debug!(?dir, "Using file cart storage");
                Ok(Arc::new(FileStorage::new(dir)))
            }
        }
    }

    /// Builds the storage backend and opens the configured cart slot.
    pub fn open_store(&self) -> ConfigResult<CartStore> {
        let storage = self.build_storage()?;
        CartStore::open(storage, &self.storage.key)
            .map_err(|e| ConfigError::Invalid(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use muebleria_core::Money;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_backend_parsing() {
        assert_eq!("file".parse::<StorageBackend>().unwrap(), StorageBackend::File);
        assert_eq!("MEMORY".parse::<StorageBackend>().unwrap(), StorageBackend::Memory);
        assert!("redis".parse::<StorageBackend>().is_err());
    }

    #[test]
    fn test_default_config() {
        let config = CartConfig::default();
        assert_eq!(config.storage.backend, StorageBackend::File);
        assert_eq!(config.storage.key, "cart");
        assert_eq!(config.currency, Currency::clp());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: CartConfig = toml::from_str(
            r#"
            [storage]
            backend = "memory"

            [currency]
            code = "USD"
            decimals = 2
            "#,
        )
        .unwrap();

        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert_eq!(config.storage.key, "cart");
        assert_eq!(config.currency.code, "USD");
        assert_eq!(config.currency.decimals, 2);
        assert_eq!(config.currency.symbol, "$");
    }

    #[test]
    fn test_env_overrides() {
        let mut config = CartConfig::default();
        config.apply_overrides(env(&[
            ("MUEBLERIA_STORAGE", "memory"),
            ("MUEBLERIA_CART_KEY", "cart-test"),
            ("MUEBLERIA_DATA_DIR", "/tmp/muebleria"),
            ("MUEBLERIA_CURRENCY_DECIMALS", "2"),
        ]));

        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert_eq!(config.storage.key, "cart-test");
        assert_eq!(config.data_dir(), Some(PathBuf::from("/tmp/muebleria")));
        assert_eq!(config.currency.decimals, 2);
    }

    #[test]
    fn test_currency_code_override_replaces_symbol() {
        let mut config = CartConfig::default();
        config.apply_overrides(env(&[("MUEBLERIA_CURRENCY", "USD")]));
        assert_eq!(config.currency.code, "USD");
        assert_eq!(config.currency.symbol, "USD ");
        assert_eq!(
            config.currency.format(Money::from_minor(1_500)),
            "USD 1.500"
        );

        let mut config = CartConfig::default();
        config.apply_overrides(env(&[
            ("MUEBLERIA_CURRENCY", "USD"),
            ("MUEBLERIA_CURRENCY_SYMBOL", "US$"),
            ("MUEBLERIA_CURRENCY_DECIMALS", "2"),
        ]));
        assert_eq!(
            config.currency.format(Money::from_minor(1_500)),
            "US$15,00"
        );

        let mut config = CartConfig::default();
        config.apply_overrides(env(&[("MUEBLERIA_CURRENCY", "CLP")]));
        assert_eq!(config.currency, Currency::clp());
    }

    #[test]
    fn test_unparseable_env_values_are_ignored() {
        let mut config = CartConfig::default();
        config.apply_overrides(env(&[
            ("MUEBLERIA_STORAGE", "cloud"),
            ("MUEBLERIA_CURRENCY_DECIMALS", "many"),
        ]));

        assert_eq!(config.storage.backend, StorageBackend::File);
        assert_eq!(config.currency.decimals, 0);
    }

    #[test]
    fn test_validation() {
        let mut config = CartConfig::default();

        config.storage.key = "bad/key".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        config.storage.key = "cart".to_string();
        config.currency.decimals = 5;
        assert!(config.validate().is_err());

        config.currency.decimals = 2;
        config.currency.code = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("conf/cart.toml");

        let mut config = CartConfig::default();
        config.storage.backend = StorageBackend::Memory;
        config.storage.data_dir = Some(dir.path().join("data"));
        config.save(Some(path.clone())).unwrap();

        let loaded = CartConfig::from_file(&path).unwrap();
        assert_eq!(loaded.storage.backend, StorageBackend::Memory);
        assert_eq!(loaded.storage.data_dir, Some(dir.path().join("data")));
        assert_eq!(loaded.currency, Currency::clp());
    }

    #[test]
    fn test_open_store_uses_configured_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = CartConfig::default();
        config.storage.data_dir = Some(dir.path().to_path_buf());
        config.storage.key = "cart-e2e".to_string();

        let store = config.open_store().unwrap();
        assert_eq!(store.key(), "cart-e2e");

        let product = muebleria_core::Product::new(
            muebleria_core::ProductId::Int(1),
            "Sofá",
            muebleria_core::Money::from_minor(150_000),
            "",
            3,
        )
        .unwrap();
        store.add_item(&product, 1).unwrap();
        assert!(dir.path().join("cart-e2e.json").exists());
    }
}
