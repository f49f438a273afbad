//! Application error types.

use std::fmt;

use crate::config::ConfigFileError;
use crate::provider::ProviderError;

/// Errors that can occur while starting the application.
#[derive(Debug)]
pub enum AppError {
    /// Configuration could not be loaded or is incomplete.
    Config(ConfigFileError),

    /// Failed to build a provider client.
    ProviderSetup(ProviderError),

    /// Failed to set up logging.
    Logging(std::io::Error),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(e) => write!(f, "Configuration error: {}", e),
            AppError::ProviderSetup(e) => write!(f, "Failed to set up provider: {}", e),
            AppError::Logging(e) => write!(f, "Failed to initialize logging: {}", e),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(e) => Some(e),
            AppError::ProviderSetup(e) => Some(e),
            AppError::Logging(e) => Some(e),
        }
    }
}

impl From<ConfigFileError> for AppError {
    fn from(e: ConfigFileError) -> Self {
        AppError::Config(e)
    }
}

impl From<ProviderError> for AppError {
    fn from(e: ProviderError) -> Self {
        AppError::ProviderSetup(e)
    }
}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        AppError::Logging(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_app_error_display() {
        let err = AppError::Config(ConfigFileError::MissingCredential {
            section: "status".to_string(),
            key: "api_key".to_string(),
            env: "ADSB_API_KEY".to_string(),
        });
        assert!(err.to_string().contains("Configuration error"));
        assert!(err.to_string().contains("ADSB_API_KEY"));
    }

    #[test]
    fn test_app_error_from_provider_error() {
        let app_err: AppError = ProviderError::unreachable("no TLS backend").into();
        assert!(matches!(app_err, AppError::ProviderSetup(_)));
        assert!(app_err.source().is_some());
    }
}
