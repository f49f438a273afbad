//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::process;

use flightwatch::app::AppError;
use flightwatch::config::{ConfigFileError, ENV_ADSB_API_KEY, ENV_FLIGHT_AWARE_API_KEY};
use flightwatch::provider::ProviderError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration error
    Config(String),
    /// Config file could not be read, written or validated
    ConfigFile(ConfigFileError),
    /// Failed to start the application
    Startup(AppError),
    /// A provider request failed
    Provider(ProviderError),
    /// Failed to create the async runtime
    Runtime(std::io::Error),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        match self {
            CliError::ConfigFile(ConfigFileError::MissingCredential { .. })
            | CliError::Startup(AppError::Config(ConfigFileError::MissingCredential { .. })) => {
                eprintln!();
                eprintln!("FlightWatch needs two API keys:");
                eprintln!("  1. ADS-B Exchange (RapidAPI): [status] api_key or {}", ENV_ADSB_API_KEY);
                eprintln!(
                    "  2. FlightAware AeroAPI: [itinerary] api_key or {}",
                    ENV_FLIGHT_AWARE_API_KEY
                );
                eprintln!();
                eprintln!("Run 'flightwatch init' to create a config file.");
            }
            CliError::Provider(_) => {
                eprintln!();
                eprintln!("Common issues:");
                eprintln!("  1. API key is missing, wrong or out of quota");
                eprintln!("  2. No network connection");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::ConfigFile(e) => write!(f, "{}", e),
            CliError::Startup(e) => write!(f, "Failed to start: {}", e),
            CliError::Provider(e) => write!(f, "Lookup failed: {}", e),
            CliError::Runtime(e) => write!(f, "Failed to create async runtime: {}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::ConfigFile(e) => Some(e),
            CliError::Startup(e) => Some(e),
            CliError::Provider(e) => Some(e),
            CliError::Runtime(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::ConfigFile(e)
    }
}

impl From<AppError> for CliError {
    fn from(e: AppError) -> Self {
        CliError::Startup(e)
    }
}

impl From<ProviderError> for CliError {
    fn from(e: ProviderError) -> Self {
        CliError::Provider(e)
    }
}
