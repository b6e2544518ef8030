//! # Configuration
//!
//! Where the cart lives on disk and where the product catalog comes from.
//! Values come from the environment (with `.env` support), and command-line
//! flags override them.

use anyhow::Context;
use shop_core::ProductCatalog;
use std::path::{Path, PathBuf};

/// Default data directory, relative to the working directory
const DEFAULT_DATA_DIR: &str = ".shop";

/// Searched in order when no catalog path is configured
const CATALOG_SEARCH_PATHS: [&str; 3] = [
    "config/products.toml",
    "../config/products.toml",
    "../../config/products.toml",
];

/// CLI configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShopConfig {
    /// Directory for the cart snapshot and session token
    pub data_dir: PathBuf,
    /// Explicit catalog file (`.json` or `.toml`)
    pub catalog_path: Option<PathBuf>,
}

impl ShopConfig {
    /// Load from environment variables
    ///
    /// - `SHOP_DATA_DIR` (default `.shop`)
    /// - `SHOP_CATALOG` (default: search `config/products.toml`)
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary variable lookup
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            data_dir: non_empty("SHOP_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR)),
            catalog_path: non_empty("SHOP_CATALOG").map(PathBuf::from),
        }
    }

    /// Builder: override the data directory
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    /// Builder: override the catalog path
    pub fn with_catalog_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.catalog_path = Some(path.into());
        self
    }

    /// Load the product catalog.
    ///
    /// An explicit path must exist. Without one, the search paths are tried
    /// and a missing catalog yields an empty one.
    pub fn load_catalog(&self) -> anyhow::Result<ProductCatalog> {
        if let Some(path) = &self.catalog_path {
            return read_catalog(path);
        }

        for path in CATALOG_SEARCH_PATHS {
            let path = Path::new(path);
            if path.is_file() {
                return read_catalog(path);
            }
        }

        tracing::warn!("No product catalog found, using empty catalog");
        Ok(ProductCatalog::new())
    }
}

impl Default for ShopConfig {
    fn default() -> Self {
        Self::from_vars(|_| None)
    }
}

/// Parse a catalog file, picking the format from its extension
fn read_catalog(path: &Path) -> anyhow::Result<ProductCatalog> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read catalog {}", path.display()))?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let catalog = if is_json {
        ProductCatalog::from_json(&content)
    } else {
        ProductCatalog::from_toml(&content)
    }
    .with_context(|| format!("Failed to parse {}", path.display()))?;

    tracing::info!("Loaded {} products from {}", catalog.len(), path.display());
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("shop-cli-{name}-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_config_defaults() {
        let config = ShopConfig::from_vars(|_| None);
        assert_eq!(config.data_dir, PathBuf::from(".shop"));
        assert_eq!(config.catalog_path, None);
    }

    #[test]
    fn test_config_from_vars() {
        let vars: HashMap<&str, &str> = [
            ("SHOP_DATA_DIR", "/tmp/shop-data"),
            ("SHOP_CATALOG", "catalog.json"),
        ]
        .into_iter()
        .collect();
        let config = ShopConfig::from_vars(|k| vars.get(k).map(|v| v.to_string()));

        assert_eq!(config.data_dir, PathBuf::from("/tmp/shop-data"));
        assert_eq!(config.catalog_path, Some(PathBuf::from("catalog.json")));
    }

    #[test]
    fn test_blank_vars_fall_back() {
        let config = ShopConfig::from_vars(|_| Some("  ".to_string()));
        assert_eq!(config, ShopConfig::default());
    }

    #[test]
    fn test_load_json_catalog() {
        let dir = scratch_dir("json");
        let path = dir.join("products.json");
        std::fs::write(&path, r#"[{"id": 1, "title": "Backpack", "price": 109.95}]"#).unwrap();

        let catalog = ShopConfig::default()
            .with_catalog_path(&path)
            .load_catalog()
            .unwrap();
        assert_eq!(catalog.get(1).unwrap().title, "Backpack");

        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_load_toml_catalog() {
        let dir = scratch_dir("toml");
        let path = dir.join("products.toml");
        std::fs::write(&path, "[[products]]\nid = 2\ntitle = \"Drive\"\nprice = 64.0\n").unwrap();

        let catalog = ShopConfig::default()
            .with_catalog_path(&path)
            .load_catalog()
            .unwrap();
        assert_eq!(catalog.get(2).unwrap().price.cents(), 6400);

        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_missing_explicit_catalog_is_error() {
        let result = ShopConfig::default()
            .with_catalog_path("/nonexistent/products.toml")
            .load_catalog();
        assert!(result.is_err());
    }
}
