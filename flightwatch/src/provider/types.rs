//! Provider types and traits

use std::fmt;
use std::future::Future;
use std::str::FromStr;

use thiserror::Error;

/// Which of the two interchangeable identifiers a string is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdentifierKind {
    /// ICAO 24-bit transponder address, e.g. `a1013f`.
    Hex,
    /// Registration (tail number), e.g. `N621MM`.
    Registration,
}

impl IdentifierKind {
    /// Short name used on the command surface (`"hex"` / `"reg"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            IdentifierKind::Hex => "hex",
            IdentifierKind::Registration => "reg",
        }
    }

    /// Normalize an identifier of this kind.
    ///
    /// Hex addresses are lower-cased, registrations upper-cased. Both are
    /// trimmed.
    pub fn normalize(&self, identifier: &str) -> String {
        let trimmed = identifier.trim();
        match self {
            IdentifierKind::Hex => trimmed.to_lowercase(),
            IdentifierKind::Registration => trimmed.to_uppercase(),
        }
    }
}

impl fmt::Display for IdentifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IdentifierKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "hex" | "icao" => Ok(IdentifierKind::Hex),
            "reg" | "registration" => Ok(IdentifierKind::Registration),
            other => Err(format!("unknown identifier kind '{}' (expected reg or hex)", other)),
        }
    }
}

/// Category of a provider failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderErrorKind {
    /// The provider refused the request because of its rate limit.
    RateLimited,
    /// The provider does not know the requested identifier.
    NotFound,
    /// The response could not be decoded or the provider reported an error.
    Invalid,
    /// No response within the request timeout.
    Timeout,
    /// Connection failed or the provider answered with a server error.
    Unreachable,
}

impl fmt::Display for ProviderErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProviderErrorKind::RateLimited => "rate limited",
            ProviderErrorKind::NotFound => "not found",
            ProviderErrorKind::Invalid => "invalid response",
            ProviderErrorKind::Timeout => "timed out",
            ProviderErrorKind::Unreachable => "unreachable",
        };
        f.write_str(name)
    }
}

/// Errors that can occur during provider operations.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("provider {kind}: {detail}")]
pub struct ProviderError {
    pub kind: ProviderErrorKind,
    pub detail: String,
}

impl ProviderError {
    pub fn new(kind: ProviderErrorKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }

    pub fn rate_limited(detail: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::RateLimited, detail)
    }

    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::NotFound, detail)
    }

    pub fn invalid(detail: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Invalid, detail)
    }

    pub fn timeout(detail: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Timeout, detail)
    }

    pub fn unreachable(detail: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Unreachable, detail)
    }
}

/// Barometric altitude as reported by the tracking feed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Altitude {
    /// The feed's explicit "on the ground" sentinel.
    Ground,
    /// Altitude in feet.
    Feet(f64),
}

/// One position report for an aircraft.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Position {
    pub altitude: Option<Altitude>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub ground_speed: Option<f64>,
}

impl Position {
    /// Position carrying only an altitude reading.
    pub fn at(altitude: Altitude) -> Self {
        Self {
            altitude: Some(altitude),
            ..Default::default()
        }
    }
}

/// Current status of an aircraft as known by the tracking feed.
///
/// An empty `positions` list means the aircraft is not broadcasting right
/// now. That is a normal outcome, not an error.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatusSnapshot {
    /// Hex transponder address.
    pub primary_code: Option<String>,
    /// Registration, withheld by the feed for some flights.
    pub secondary_code: Option<String>,
    /// Call sign / flight number.
    pub flight_number: Option<String>,
    pub positions: Vec<Position>,
}

impl StatusSnapshot {
    /// A snapshot with no position data.
    pub fn silent() -> Self {
        Self::default()
    }

    /// Whether the feed reported any position for the aircraft.
    pub fn is_reporting(&self) -> bool {
        !self.positions.is_empty()
    }

    /// The first altitude reading, if any.
    pub fn altitude(&self) -> Option<Altitude> {
        self.positions.iter().find_map(|p| p.altitude)
    }
}

/// Schedule and route data for a flight in progress.
///
/// Fields are kept as delivered; the enrichment resolver decides whether
/// they are usable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItinerarySnapshot {
    pub origin_name: Option<String>,
    pub destination_name: Option<String>,
    /// Estimated runway arrival, `YYYY-MM-DDTHH:MM:SSZ`.
    pub estimated_on: Option<String>,
    pub status: Option<String>,
}

/// Source of live aircraft status.
pub trait StatusProvider: Send + Sync {
    /// Fetch the current status for an identifier.
    fn fetch_status(
        &self,
        identifier: &str,
        kind: IdentifierKind,
    ) -> impl Future<Output = Result<StatusSnapshot, ProviderError>> + Send;

    /// Returns the provider's name for logging and identification.
    fn name(&self) -> &str;
}

/// Source of itinerary data for flights in progress.
pub trait ItineraryProvider: Send + Sync {
    /// Fetch the itinerary of the flight currently flown by `registration`.
    ///
    /// `Ok(None)` means no flight is in progress for this aircraft.
    fn fetch_itinerary(
        &self,
        registration: &str,
    ) -> impl Future<Output = Result<Option<ItinerarySnapshot>, ProviderError>> + Send;

    /// Returns the provider's name for logging and identification.
    fn name(&self) -> &str;
}
