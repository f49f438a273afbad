//! Configuration file handling for ~/.flightwatch/config.ini.
//!
//! Loads and saves user configuration with sensible defaults. Settings
//! structs live in [`super::settings`], constants in [`super::defaults`],
//! parsing in [`super::parser`], and serialization in [`super::writer`].

use std::path::{Path, PathBuf};

use ini::Ini;
use thiserror::Error;

use super::defaults::{ENV_ADSB_API_KEY, ENV_FLIGHT_AWARE_API_KEY};
use super::settings::ConfigFile;

/// Name of the directory under the home directory.
pub const CONFIG_DIR_NAME: &str = ".flightwatch";

/// Name of the config file inside the config directory.
pub const CONFIG_FILE_NAME: &str = "config.ini";

/// Name of the default log file inside the config directory.
pub const DEFAULT_LOG_FILE_NAME: &str = "flightwatch.log";

/// Configuration file errors.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] ini::Error),

    /// Failed to write config file
    #[error("Failed to write config file: {0}")]
    WriteError(String),

    /// Invalid configuration value
    #[error("Invalid configuration: {section}.{key} = '{value}' - {reason}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },

    /// A provider credential is neither in the file nor in the environment
    #[error("Missing credential {section}.{key} (set it in config.ini or export {env})")]
    MissingCredential {
        section: String,
        key: String,
        env: String,
    },

    /// Failed to create config directory
    #[error("Failed to create config directory: {0}")]
    DirectoryError(std::io::Error),
}

impl ConfigFile {
    /// Load configuration from the default path (~/.flightwatch/config.ini).
    pub fn load() -> Result<Self, ConfigFileError> {
        Self::load_from(&config_file_path())
    }

    /// Load configuration from a specific path.
    ///
    /// If the file doesn't exist, returns defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigFileError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let ini = Ini::load_from_file(path)?;
        super::parser::parse_ini(&ini)
    }

    /// Save configuration to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigFileError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigFileError::DirectoryError)?;
        }

        let content = super::writer::to_config_string(self);
        std::fs::write(path, content).map_err(|e| ConfigFileError::WriteError(e.to_string()))
    }

    /// Create the default config file if it doesn't exist.
    ///
    /// Returns the path to the config file.
    pub fn ensure_exists() -> Result<PathBuf, ConfigFileError> {
        let path = config_file_path();
        if !path.exists() {
            Self::default().save_to(&path)?;
        }
        Ok(path)
    }

    /// Override credentials from `ADSB_API_KEY` and `FLIGHT_AWARE_API_KEY`.
    pub fn apply_env(&mut self) {
        self.apply_env_from(|name| std::env::var(name).ok());
    }

    /// Override credentials using `lookup` in place of the process
    /// environment. Empty values are ignored.
    pub fn apply_env_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_empty = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        if let Some(key) = non_empty(ENV_ADSB_API_KEY) {
            self.status.api_key = Some(key);
        }
        if let Some(key) = non_empty(ENV_FLIGHT_AWARE_API_KEY) {
            self.itinerary.api_key = Some(key);
        }
    }

    /// Check that everything needed to start the tracker is present.
    pub fn validate(&self) -> Result<(), ConfigFileError> {
        if self.status.api_key.is_none() {
            return Err(ConfigFileError::MissingCredential {
                section: "status".to_string(),
                key: "api_key".to_string(),
                env: ENV_ADSB_API_KEY.to_string(),
            });
        }
        if self.itinerary.api_key.is_none() {
            return Err(ConfigFileError::MissingCredential {
                section: "itinerary".to_string(),
                key: "api_key".to_string(),
                env: ENV_FLIGHT_AWARE_API_KEY.to_string(),
            });
        }
        Ok(())
    }
}

/// Get the path to the config directory (~/.flightwatch).
pub fn config_directory() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR_NAME)
}

/// Get the path to the config file (~/.flightwatch/config.ini).
pub fn config_file_path() -> PathBuf {
    config_directory().join(CONFIG_FILE_NAME)
}
