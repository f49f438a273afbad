//! Tracker configuration.

use std::time::Duration;

use crate::config::{
    ConfigFile, DEFAULT_AIRBORNE_INTERVAL_SECS, DEFAULT_LANDING_FIRST_DELAY_SECS,
    DEFAULT_LANDING_GAP_TOLERANCE_SECS, DEFAULT_LANDING_INTERVAL_SECS,
    DEFAULT_REQUEST_TIMEOUT_SECS,
};
use crate::flight::{ActiveWindow, DEFAULT_GROUND_ALTITUDE_FT};

/// Default delay before the first airborne check after startup.
pub const DEFAULT_AIRBORNE_FIRST_DELAY: Duration = Duration::from_secs(1);

/// Default capacity of the tracker's event queue.
pub const DEFAULT_EVENT_CHANNEL_CAPACITY: usize = 256;

/// Configuration for the flight tracker.
#[derive(Clone, Debug, PartialEq)]
pub struct TrackerConfig {
    /// Period of the takeoff check across all tracked flights.
    pub airborne_interval: Duration,

    /// Delay before the first takeoff check.
    pub airborne_first_delay: Duration,

    /// Period of each flight's landing check.
    pub landing_interval: Duration,

    /// Minimum delay between the takeoff notification and the first landing
    /// check.
    pub landing_first_delay: Duration,

    /// Silence tolerated before an airborne flight counts as landed.
    pub landing_gap_tolerance: Duration,

    /// Timeout applied to each provider call.
    pub request_timeout: Duration,

    /// Local hours during which takeoff checks run.
    pub active_window: ActiveWindow,

    /// Altitude in feet below which an aircraft is on the ground.
    pub ground_altitude: f64,

    /// Event queue capacity.
    pub channel_capacity: usize,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            airborne_interval: Duration::from_secs(DEFAULT_AIRBORNE_INTERVAL_SECS),
            airborne_first_delay: DEFAULT_AIRBORNE_FIRST_DELAY,
            landing_interval: Duration::from_secs(DEFAULT_LANDING_INTERVAL_SECS),
            landing_first_delay: Duration::from_secs(DEFAULT_LANDING_FIRST_DELAY_SECS),
            landing_gap_tolerance: Duration::from_secs(DEFAULT_LANDING_GAP_TOLERANCE_SECS),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            active_window: ActiveWindow::default(),
            ground_altitude: DEFAULT_GROUND_ALTITUDE_FT,
            channel_capacity: DEFAULT_EVENT_CHANNEL_CAPACITY,
        }
    }
}

impl TrackerConfig {
    /// Build tracker settings from the `[schedule]` section.
    pub fn from_config_file(config: &ConfigFile) -> Self {
        let schedule = &config.schedule;
        Self::default()
            .with_airborne_interval(Duration::from_secs(schedule.airborne_interval))
            .with_landing_interval(Duration::from_secs(schedule.landing_interval))
            .with_landing_first_delay(Duration::from_secs(schedule.landing_first_delay))
            .with_landing_gap_tolerance(Duration::from_secs(schedule.landing_gap_tolerance))
            .with_request_timeout(Duration::from_secs(schedule.request_timeout))
            .with_active_window(schedule.active_hours)
            .with_ground_altitude(schedule.ground_altitude)
    }

    pub fn with_airborne_interval(mut self, interval: Duration) -> Self {
        self.airborne_interval = interval;
        self
    }

    pub fn with_airborne_first_delay(mut self, delay: Duration) -> Self {
        self.airborne_first_delay = delay;
        self
    }

    pub fn with_landing_interval(mut self, interval: Duration) -> Self {
        self.landing_interval = interval;
        self
    }

    pub fn with_landing_first_delay(mut self, delay: Duration) -> Self {
        self.landing_first_delay = delay;
        self
    }

    pub fn with_landing_gap_tolerance(mut self, tolerance: Duration) -> Self {
        self.landing_gap_tolerance = tolerance;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_active_window(mut self, window: ActiveWindow) -> Self {
        self.active_window = window;
        self
    }

    pub fn with_ground_altitude(mut self, feet: f64) -> Self {
        self.ground_altitude = feet;
        self
    }

    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity.max(1);
        self
    }
}
