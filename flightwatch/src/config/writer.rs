//! INI serialization logic for converting `ConfigFile` → INI string.

use super::settings::ConfigFile;

/// Convert a `ConfigFile` to a commented INI string for saving.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    let status_key = config.status.api_key.as_deref().unwrap_or("");
    let itinerary_key = config.itinerary.api_key.as_deref().unwrap_or("");
    let webhook_url = config.notify.webhook_url.as_deref().unwrap_or("");
    let flights = config
        .tracking
        .flights
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    let schedule = &config.schedule;

    format!(
        r#"[status]
; ADS-B Exchange key from RapidAPI. ADSB_API_KEY overrides it.
api_key = {}
api_host = {}
base_url = {}

[itinerary]
; FlightAware AeroAPI key. FLIGHT_AWARE_API_KEY overrides it.
api_key = {}
base_url = {}

[schedule]
; All durations in seconds
airborne_interval = {}
landing_interval = {}
; First landing check after takeoff (later if the ETA is later)
landing_first_delay = {}
request_timeout = {}
; How long an airborne flight may stop broadcasting before it counts as landed
landing_gap_tolerance = {}
; Local hours during which takeoff checks run (inclusive)
active_hours = {}
; Altitude in feet below which an aircraft is on the ground
ground_altitude = {}

[notify]
; Webhook receiving {{"text": "..."}} posts. Empty logs notifications instead.
webhook_url = {}

[tracking]
; Flights to track from startup: id:kind[:recurring], kind is hex or reg
flights = {}

[logging]
file = {}
"#,
        status_key,
        config.status.api_host,
        config.status.base_url,
        itinerary_key,
        config.itinerary.base_url,
        schedule.airborne_interval,
        schedule.landing_interval,
        schedule.landing_first_delay,
        schedule.request_timeout,
        schedule.landing_gap_tolerance,
        schedule.active_hours,
        schedule.ground_altitude,
        webhook_url,
        flights,
        config.logging.file.to_string_lossy(),
    )
}
