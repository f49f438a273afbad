//! Itinerary payload parsing.

use chrono::{DateTime, NaiveDateTime, Utc};
use thiserror::Error;

use crate::provider::ItinerarySnapshot;

/// Format of `estimated_on` timestamps (always UTC).
pub const ESTIMATED_ON_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Reasons an itinerary payload could not be used.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnrichmentError {
    #[error("itinerary has no origin name")]
    MissingOrigin,

    #[error("itinerary has no destination name")]
    MissingDestination,

    #[error("malformed estimated_on '{value}'")]
    MalformedTimestamp { value: String },
}

/// Fields extracted from an itinerary payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedItinerary {
    pub origin: String,
    pub destination: String,
    pub estimated_landing: DateTime<Utc>,
}

/// Extract origin, destination and estimated landing.
///
/// All three succeed or the whole parse fails. An absent `estimated_on`
/// becomes `now`.
pub fn parse_itinerary(
    itinerary: &ItinerarySnapshot,
    now: DateTime<Utc>,
) -> Result<ParsedItinerary, EnrichmentError> {
    let origin = itinerary
        .origin_name
        .clone()
        .ok_or(EnrichmentError::MissingOrigin)?;
    let destination = itinerary
        .destination_name
        .clone()
        .ok_or(EnrichmentError::MissingDestination)?;

    let estimated_landing = match itinerary.estimated_on.as_deref() {
        Some(value) => parse_estimated_on(value)?,
        None => now,
    };

    Ok(ParsedItinerary {
        origin,
        destination,
        estimated_landing,
    })
}

fn parse_estimated_on(value: &str) -> Result<DateTime<Utc>, EnrichmentError> {
    NaiveDateTime::parse_from_str(value, ESTIMATED_ON_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|_| EnrichmentError::MalformedTimestamp {
            value: value.to_string(),
        })
}
