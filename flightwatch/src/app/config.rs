//! Application configuration for FlightWatchApp.
//!
//! `AppConfig` gathers everything the bootstrap needs from a validated
//! [`ConfigFile`]: provider endpoints and credentials, tracker settings,
//! the notification destination and the flights to track from startup.

use std::time::Duration;

use crate::config::{ConfigFile, ConfigFileError, FlightSeed};
use crate::scheduler::TrackerConfig;

/// Status feed connection settings.
#[derive(Clone, Debug, PartialEq)]
pub struct StatusEndpoint {
    pub api_key: String,
    pub api_host: String,
    pub base_url: String,
}

/// Itinerary feed connection settings.
#[derive(Clone, Debug, PartialEq)]
pub struct ItineraryEndpoint {
    pub api_key: String,
    pub base_url: String,
}

/// Application configuration combining all component configs.
///
/// This is the top-level configuration passed to `FlightWatchApp::start()`.
#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub status: StatusEndpoint,
    pub itinerary: ItineraryEndpoint,
    pub tracker: TrackerConfig,
    /// Webhook for notifications; `None` logs them instead.
    pub webhook_url: Option<String>,
    /// Flights added once the tracker is running, in order.
    pub flights: Vec<FlightSeed>,
}

impl AppConfig {
    /// Build the application config from a loaded config file.
    ///
    /// # Errors
    ///
    /// Returns `MissingCredential` when either provider key is absent.
    pub fn from_config_file(file: &ConfigFile) -> Result<Self, ConfigFileError> {
        file.validate()?;

        // validate() guarantees both keys are present
        let status_key = file.status.api_key.clone().unwrap_or_default();
        let itinerary_key = file.itinerary.api_key.clone().unwrap_or_default();

        Ok(Self {
            status: StatusEndpoint {
                api_key: status_key,
                api_host: file.status.api_host.clone(),
                base_url: file.status.base_url.clone(),
            },
            itinerary: ItineraryEndpoint {
                api_key: itinerary_key,
                base_url: file.itinerary.base_url.clone(),
            },
            tracker: TrackerConfig::from_config_file(file),
            webhook_url: file.notify.webhook_url.clone(),
            flights: file.tracking.flights.clone(),
        })
    }

    /// Append flights to the startup list, skipping ones already present.
    pub fn with_flights(mut self, flights: impl IntoIterator<Item = FlightSeed>) -> Self {
        for seed in flights {
            let duplicate = self
                .flights
                .iter()
                .any(|existing| existing.identifier.eq_ignore_ascii_case(&seed.identifier));
            if !duplicate {
                self.flights.push(seed);
            }
        }
        self
    }

    /// HTTP client timeout, taken from the tracker's request timeout.
    pub fn http_timeout(&self) -> Duration {
        self.tracker.request_timeout
    }
}
