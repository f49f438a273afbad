//! CLI runner for common setup.
//!
//! Encapsulates config loading, logging initialization and runtime creation
//! so command handlers stay short.

use std::path::PathBuf;

use tokio::runtime::Runtime;
use tracing::info;

use flightwatch::config::{config_file_path, ConfigFile};
use flightwatch::logging::{init_logging, LoggingGuard, LoggingOptions};

use crate::error::CliError;

/// Runner that manages CLI lifecycle and common operations.
pub struct CliRunner {
    /// Keeps logging active while the runner exists
    _logging_guard: LoggingGuard,
    config: ConfigFile,
    config_path: PathBuf,
}

impl CliRunner {
    /// Load configuration and initialize logging.
    ///
    /// # Arguments
    ///
    /// * `config_path` - Config file to load; the default path when `None`
    /// * `stdout` - Mirror log output to stdout
    /// * `debug` - Enable debug-level logging when `RUST_LOG` is unset
    pub fn new(config_path: Option<PathBuf>, stdout: bool, debug: bool) -> Result<Self, CliError> {
        let config_path = config_path.unwrap_or_else(config_file_path);
        let mut config = ConfigFile::load_from(&config_path)?;
        config.apply_env();

        let options = LoggingOptions::new(config.logging.file.clone())
            .with_stdout(stdout)
            .with_debug(debug);
        let logging_guard =
            init_logging(&options).map_err(|e| CliError::LoggingInit(e.to_string()))?;

        Ok(Self {
            _logging_guard: logging_guard,
            config,
            config_path,
        })
    }

    /// Get the loaded configuration.
    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// Log startup information for a command.
    pub fn log_startup(&self, command: &str) {
        info!("FlightWatch v{}", env!("CARGO_PKG_VERSION"));
        info!(
            config = %self.config_path.display(),
            log = %self.config.logging.file.display(),
            "FlightWatch CLI: {} command",
            command
        );
    }

    /// Create the multi-threaded runtime the tracker runs on.
    pub fn runtime(&self) -> Result<Runtime, CliError> {
        tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .thread_name("flightwatch")
            .build()
            .map_err(CliError::Runtime)
    }
}
