//! Configuration module for mediacat
//!
//! Manages named database paths and view defaults. Configuration is stored
//! in the user's config directory as TOML.

use crate::params::ViewParameters;
use crate::query::SourcePath;
use crate::view::{PageRequest, SortKey};
use config::{Config, ConfigError, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_DATABASE: &str = "default";

const fn default_page_size() -> usize {
    20
}

/// Application configuration structure
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct MediacatConfig {
    /// Map of database names to their filesystem paths
    #[serde(default)]
    pub databases: HashMap<String, PathBuf>,

    /// The default database to use when none is specified
    #[serde(default)]
    pub default_database: Option<String>,

    /// Suppress informational output by default
    #[serde(default)]
    pub quiet: bool,

    #[serde(default = "default_page_size")]
    pub page_size: usize,

    #[serde(default = "ViewParameters::default_sort")]
    pub default_sort: Vec<SortKey>,

    #[serde(default = "ViewParameters::default_sources")]
    pub default_sources: Vec<SourcePath>,
}

impl Default for MediacatConfig {
    fn default() -> Self {
        Self {
            databases: HashMap::new(),
            default_database: None,
            quiet: false,
            page_size: default_page_size(),
            default_sort: ViewParameters::default_sort(),
            default_sources: ViewParameters::default_sources(),
        }
    }
}

impl MediacatConfig {
    /// Get the path to the config file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the system config directory cannot be determined.
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| ConfigError::Message("Could not determine config directory".to_string()))?;
        Ok(config_dir.join("mediacat").join("config.toml"))
    }

    /// Load configuration from the user config file, creating it if missing
    ///
    /// A fresh configuration registers one database named `default` in the
    /// user data directory.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the config file cannot be read, parsed, or created.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            let data_dir = dirs::data_local_dir()
                .ok_or_else(|| ConfigError::Message("Could not determine data directory".to_string()))?;
            let mut config = Self::default();
            config.databases.insert(
                DEFAULT_DATABASE.to_string(),
                data_dir.join("mediacat").join(DEFAULT_DATABASE),
            );
            config.default_database = Some(DEFAULT_DATABASE.to_string());
            config.save_to(&config_path)?;
            tracing::info!(path = %config_path.display(), "wrote default configuration");
            return Ok(config);
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from an explicit file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file is missing or cannot be parsed.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path).format(FileFormat::Toml))
            .build()?;
        settings.try_deserialize()
    }

    /// Save configuration to the user config file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the config directory cannot be determined.
    /// Otherwise fails like [`Self::save_to`].
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::config_path()?)
    }

    /// # Errors
    ///
    /// Returns `ConfigError` if the parent directory cannot be created, the
    /// configuration cannot be serialized to TOML, or the file cannot be written.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| ConfigError::Message(format!("Failed to create config directory: {e}")))?;
        }

        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Message(format!("Failed to serialize config: {e}")))?;

        fs::write(path, toml_string)
            .map_err(|e| ConfigError::Message(format!("Failed to write config file: {e}")))?;

        Ok(())
    }

    #[must_use]
    pub fn get_database(&self, name: &str) -> Option<&PathBuf> {
        self.databases.get(name)
    }

    /// Set the default database
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the database name doesn't exist in the configuration.
    pub fn set_default_database(&mut self, name: &str) -> Result<(), ConfigError> {
        if !self.databases.contains_key(name) {
            return Err(ConfigError::Message(format!(
                "Database '{name}' does not exist in configuration"
            )));
        }
        self.default_database = Some(name.to_string());
        Ok(())
    }

    /// Path of the named database, or of the default one
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the name is unknown or no default is configured.
    pub fn resolve_database(&self, name: Option<&str>) -> Result<&PathBuf, ConfigError> {
        let name = name
            .or(self.default_database.as_deref())
            .ok_or_else(|| ConfigError::Message("No default database configured".to_string()))?;
        self.get_database(name)
            .ok_or_else(|| ConfigError::Message(format!("Database '{name}' not found in configuration")))
    }

    /// View parameters seeded with the configured defaults
    #[must_use]
    pub fn view_parameters(&self) -> ViewParameters {
        ViewParameters {
            sources: self.default_sources.clone(),
            sort: self.default_sort.clone(),
            ..ViewParameters::default()
        }
    }

    #[must_use]
    pub const fn page_request(&self, page_number: usize) -> PageRequest {
        PageRequest::new(self.page_size, page_number)
    }
}
