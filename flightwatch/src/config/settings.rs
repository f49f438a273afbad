//! Settings structs, one per `[section]` of the INI config file.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::flight::ActiveWindow;
use crate::provider::IdentifierKind;

/// Complete configuration loaded from config.ini.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConfigFile {
    /// ADS-B status feed
    pub status: StatusSettings,
    /// Itinerary feed
    pub itinerary: ItinerarySettings,
    /// Poll periods, active hours and thresholds
    pub schedule: ScheduleSettings,
    /// Notification destination
    pub notify: NotifySettings,
    /// Flights tracked from startup
    pub tracking: TrackingSettings,
    pub logging: LoggingSettings,
}

/// ADS-B Exchange (RapidAPI) settings.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusSettings {
    pub api_key: Option<String>,
    pub api_host: String,
    pub base_url: String,
}

/// FlightAware AeroAPI settings.
#[derive(Debug, Clone, PartialEq)]
pub struct ItinerarySettings {
    pub api_key: Option<String>,
    pub base_url: String,
}

/// Scheduling settings. Durations are in seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleSettings {
    pub airborne_interval: u64,
    pub landing_interval: u64,
    pub landing_first_delay: u64,
    pub request_timeout: u64,
    /// How long an airborne flight may go silent before it counts as landed.
    pub landing_gap_tolerance: u64,
    pub active_hours: ActiveWindow,
    /// Altitude in feet below which an aircraft is on the ground.
    pub ground_altitude: f64,
}

/// Where notifications go.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NotifySettings {
    /// Webhook receiving `{"text": ...}` posts. `None` logs notifications.
    pub webhook_url: Option<String>,
}

/// Flights added when the tracker starts.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TrackingSettings {
    pub flights: Vec<FlightSeed>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    pub file: PathBuf,
}

/// A flight to track from startup, written `id:kind[:recurring]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlightSeed {
    pub identifier: String,
    pub kind: IdentifierKind,
    pub recurring: bool,
}

impl FlightSeed {
    pub fn new(identifier: impl Into<String>, kind: IdentifierKind, recurring: bool) -> Self {
        Self {
            identifier: identifier.into(),
            kind,
            recurring,
        }
    }
}

impl fmt::Display for FlightSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.identifier, self.kind)?;
        if self.recurring {
            f.write_str(":recurring")?;
        }
        Ok(())
    }
}

impl FromStr for FlightSeed {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.trim().split(':');
        let identifier = parts
            .next()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| "missing identifier".to_string())?;
        let kind: IdentifierKind = parts
            .next()
            .ok_or_else(|| format!("'{}' needs a kind, e.g. {}:hex", s.trim(), identifier))?
            .parse()?;
        let recurring = match parts.next().map(|r| r.trim().to_lowercase()) {
            None => false,
            Some(flag) => parse_recurring(&flag)
                .ok_or_else(|| format!("'{}' is not a recurring flag", flag))?,
        };
        if parts.next().is_some() {
            return Err(format!("'{}' has too many fields", s.trim()));
        }

        Ok(Self::new(kind.normalize(identifier), kind, recurring))
    }
}

/// Accepted spellings of the recurring flag.
pub fn parse_recurring(flag: &str) -> Option<bool> {
    match flag.trim().to_lowercase().as_str() {
        "recurring" | "true" | "yes" | "1" => Some(true),
        "once" | "false" | "no" | "0" => Some(false),
        _ => None,
    }
}
