//! User configuration.
//!
//! Loaded from `<config dir>/storefront/config.toml` unless `--config` names
//! another file. Every key is optional:
//!
//! ```toml
//! [database]
//! path = "/srv/storefront/catalog.db"
//!
//! [slugs.symbols]
//! "™" = "tm"
//!
//! [import]
//! existing = "update"
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use storefront_catalog::{Normalizer, SymbolTable};
use storefront_import::ExistingMode;

use crate::CliError;

/// Environment variable that overrides the configured database path.
pub(crate) const DB_ENV_VAR: &str = "STOREFRONT_DB";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct Config {
    pub database: DatabaseConfig,
    pub slugs: SlugsConfig,
    pub import: ImportConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct DatabaseConfig {
    pub path: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct SlugsConfig {
    /// Extra symbol → word replacements, merged over the built-in table.
    pub symbols: HashMap<String, String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct ImportConfig {
    pub existing: ExistingSetting,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum ExistingSetting {
    #[default]
    Skip,
    Update,
}

/// Return the path to the default config file.
pub(crate) fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("storefront").join("config.toml"))
}

/// Default catalog database location.
pub(crate) fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("storefront"))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("catalog.db")
}

impl Config {
    /// Load the config file.
    ///
    /// An explicit path must exist. The default file is optional and its
    /// absence yields the defaults.
    pub(crate) fn load(explicit: Option<&Path>) -> Result<Self, CliError> {
        let path = match explicit {
            Some(p) => p.to_path_buf(),
            None => match config_path() {
                Some(p) if p.exists() => p,
                _ => return Ok(Self::default()),
            },
        };

        let contents = std::fs::read_to_string(&path).map_err(|e| {
            CliError::config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let config = Self::parse(&contents)
            .map_err(|e| CliError::config(format!("{}: {}", path.display(), e)))?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub(crate) fn parse(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Resolve the database path: `--db`, then `$STOREFRONT_DB`, then the
    /// config file, then the default location.
    pub(crate) fn db_path(&self, cli: Option<PathBuf>) -> PathBuf {
        cli.or_else(|| std::env::var_os(DB_ENV_VAR).map(PathBuf::from))
            .or_else(|| self.database.path.clone())
            .unwrap_or_else(default_db_path)
    }

    pub(crate) fn normalizer(&self) -> Result<Normalizer, CliError> {
        let symbols = SymbolTable::with_extra(&self.slugs.symbols)
            .map_err(|e| CliError::config(format!("[slugs.symbols]: {}", e)))?;
        Ok(Normalizer::new(symbols))
    }

    pub(crate) fn existing_mode(&self) -> ExistingMode {
        match self.import.existing {
            ExistingSetting::Skip => ExistingMode::Skip,
            ExistingSetting::Update => ExistingMode::Update,
        }
    }
}
