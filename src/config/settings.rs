//! Application settings loaded from `config.toml`.
//!
//! The file is optional. `DATABASE_URL` and `WEB_ROOT` from the environment
//! (or `.env`) win over whatever the file says.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::database::DEFAULT_DATABASE_URL;

/// Web root used when nothing else is configured
pub const DEFAULT_WEB_ROOT: &str = "wwwroot";

/// Settings shared by every command
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AppConfig {
    /// Connection string for the catalog database
    #[serde(default = "default_database_url")]
    pub database_url: String,
    /// Directory UI attachments are stored under
    #[serde(default = "default_web_root")]
    pub web_root: PathBuf,
}

fn default_database_url() -> String {
    DEFAULT_DATABASE_URL.to_string()
}

fn default_web_root() -> PathBuf {
    PathBuf::from(DEFAULT_WEB_ROOT)
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            web_root: default_web_root(),
        }
    }
}

impl AppConfig {
    /// Applies `DATABASE_URL` and `WEB_ROOT` when they are set.
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var("DATABASE_URL") {
            self.database_url = url;
        }
        if let Ok(root) = std::env::var("WEB_ROOT") {
            self.web_root = PathBuf::from(root);
        }
        self
    }
}

/// Parses settings from TOML text.
///
/// # Errors
/// Returns [`Error::Config`] when the TOML is invalid.
pub fn parse_config(contents: &str) -> Result<AppConfig> {
    toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config: {e}"),
    })
}

/// Loads settings from a TOML file.
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path_ref = path.as_ref();
    debug!("Attempting to load configuration from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path_ref.display()),
    })?;
    parse_config(&contents)
}

/// Loads `path` when it exists, otherwise starts from defaults, then applies
/// the environment overrides.
pub fn load_app_configuration<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path_ref = path.as_ref();
    let config = if path_ref.exists() {
        load_config(path_ref)?
    } else {
        debug!("No config file at {:?}, using defaults", path_ref);
        AppConfig::default()
    };
    Ok(config.with_env_overrides())
}
