use crate::catalog::{load_catalog, StaticCatalog};
use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

pub const DEFAULT_ADDR: &str = "0.0.0.0:3000";

/// Runtime configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Optional .json or .csv provider catalog. Built-in fixture when unset.
    pub catalog_path: Option<PathBuf>,
    /// Bind address for the API server
    pub addr: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenvy::dotenv();

        Ok(Self {
            catalog_path: env::var("CARE_FINDER_CATALOG")
                .ok()
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
            addr: env::var("CARE_FINDER_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string()),
        })
    }

    pub fn load_catalog(&self) -> Result<StaticCatalog> {
        match &self.catalog_path {
            Some(path) => load_catalog(path)
                .with_context(|| format!("Failed to load provider catalog from {:?}", path)),
            None => {
                tracing::debug!("No CARE_FINDER_CATALOG set, using built-in providers");
                Ok(StaticCatalog::fixture())
            }
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            catalog_path: None,
            addr: DEFAULT_ADDR.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_uses_fixture() {
        let config = Config::default();
        assert_eq!(config.addr, DEFAULT_ADDR);
        assert_eq!(config.load_catalog().unwrap().len(), 4);
    }

    #[test]
    fn test_missing_catalog_file_reports_path() {
        let config = Config {
            catalog_path: Some(PathBuf::from("/nonexistent/providers.json")),
            ..Config::default()
        };

        let err = config.load_catalog().unwrap_err();
        assert!(format!("{:#}", err).contains("/nonexistent/providers.json"));
    }
}
