//! Poll scheduling for tracked flights.
//!
//! - [`FlightTracker`] - the daemon owning all tracking state
//! - [`TrackerHandle`] - add/remove/list commands from any task
//! - [`LandingTimer`] - per-flight landing check, cancelled by handle
//! - [`TrackerConfig`] - periods, active hours and thresholds

mod config;
mod daemon;
mod handle;
mod timer;
mod tracker;

pub use config::{TrackerConfig, DEFAULT_AIRBORNE_FIRST_DELAY, DEFAULT_EVENT_CHANNEL_CAPACITY};
pub use daemon::FlightTracker;
pub use handle::{CommandError, Confirmation, TrackerHandle};
pub use timer::{first_landing_check_delay, spawn_recurring, LandingTimer, TimerId};
