//! Default values for every configuration setting.

use super::file::{config_directory, DEFAULT_LOG_FILE_NAME};
use super::settings::*;
use crate::flight::{ActiveWindow, DEFAULT_GROUND_ALTITUDE_FT};
use crate::provider::{DEFAULT_ADSB_API_HOST, DEFAULT_ADSB_BASE_URL, DEFAULT_AEROAPI_BASE_URL};

/// Environment variable holding the ADS-B Exchange key.
pub const ENV_ADSB_API_KEY: &str = "ADSB_API_KEY";

/// Environment variable holding the FlightAware AeroAPI key.
pub const ENV_FLIGHT_AWARE_API_KEY: &str = "FLIGHT_AWARE_API_KEY";

/// Default takeoff check period (5 minutes).
pub const DEFAULT_AIRBORNE_INTERVAL_SECS: u64 = 300;

/// Default landing check period (5 minutes).
pub const DEFAULT_LANDING_INTERVAL_SECS: u64 = 300;

/// Default delay between the takeoff notification and the first landing check.
pub const DEFAULT_LANDING_FIRST_DELAY_SECS: u64 = 2;

/// Default provider request timeout.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Default silence tolerated before a quiet airborne flight counts as landed.
pub const DEFAULT_LANDING_GAP_TOLERANCE_SECS: u64 = 0;

impl Default for StatusSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            api_host: DEFAULT_ADSB_API_HOST.to_string(),
            base_url: DEFAULT_ADSB_BASE_URL.to_string(),
        }
    }
}

impl Default for ItinerarySettings {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_AEROAPI_BASE_URL.to_string(),
        }
    }
}

impl Default for ScheduleSettings {
    fn default() -> Self {
        Self {
            airborne_interval: DEFAULT_AIRBORNE_INTERVAL_SECS,
            landing_interval: DEFAULT_LANDING_INTERVAL_SECS,
            landing_first_delay: DEFAULT_LANDING_FIRST_DELAY_SECS,
            request_timeout: DEFAULT_REQUEST_TIMEOUT_SECS,
            landing_gap_tolerance: DEFAULT_LANDING_GAP_TOLERANCE_SECS,
            active_hours: ActiveWindow::default(),
            ground_altitude: DEFAULT_GROUND_ALTITUDE_FT,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            file: config_directory().join(DEFAULT_LOG_FILE_NAME),
        }
    }
}
