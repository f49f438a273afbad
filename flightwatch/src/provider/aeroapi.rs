//! FlightAware AeroAPI itinerary provider.
//!
//! `GET {base}/{registration}` returns the recent and scheduled flights of an
//! aircraft. Only the flight whose status reads "En Route" is of interest; if
//! there is none the aircraft has no itinerary in progress.

use serde::Deserialize;
use tracing::debug;

use super::http::AsyncHttpClient;
use super::types::{ItineraryProvider, ItinerarySnapshot, ProviderError};

/// Default AeroAPI flights endpoint.
pub const DEFAULT_AEROAPI_BASE_URL: &str = "https://aeroapi.flightaware.com/aeroapi/flights";

/// Status fragment marking the flight currently in the air.
const EN_ROUTE: &str = "En Route";

#[derive(Debug, Deserialize)]
struct FlightsResponse {
    #[serde(default)]
    flights: Option<Vec<AeroFlight>>,
}

#[derive(Debug, Deserialize)]
struct AeroFlight {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    origin: Option<AeroAirport>,
    #[serde(default)]
    destination: Option<AeroAirport>,
    #[serde(default)]
    estimated_on: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AeroAirport {
    #[serde(default)]
    name: Option<String>,
}

/// Itinerary provider backed by FlightAware AeroAPI.
pub struct AeroApiProvider<C: AsyncHttpClient> {
    http_client: C,
    api_key: String,
    base_url: String,
}

impl<C: AsyncHttpClient> AeroApiProvider<C> {
    /// Creates a provider against the default AeroAPI endpoint.
    pub fn new(http_client: C, api_key: impl Into<String>) -> Self {
        Self {
            http_client,
            api_key: api_key.into(),
            base_url: DEFAULT_AEROAPI_BASE_URL.to_string(),
        }
    }

    /// Override the flights endpoint.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

impl<C: AsyncHttpClient> ItineraryProvider for AeroApiProvider<C> {
    async fn fetch_itinerary(
        &self,
        registration: &str,
    ) -> Result<Option<ItinerarySnapshot>, ProviderError> {
        let url = format!("{}/{}", self.base_url, registration);
        debug!(registration, url = %url, "Fetching AeroAPI itinerary");

        let body = self
            .http_client
            .get_with_headers(
                &url,
                &[
                    ("Accept", "application/json; charset=UTF-8"),
                    ("x-apikey", self.api_key.as_str()),
                ],
            )
            .await?;

        let itinerary = parse_itinerary(&body)?;
        if itinerary.is_none() {
            debug!(registration, "No flight en route");
        }
        Ok(itinerary)
    }

    fn name(&self) -> &str {
        "FlightAware AeroAPI"
    }
}

/// Decode an AeroAPI flights response, keeping only the flight en route.
fn parse_itinerary(body: &[u8]) -> Result<Option<ItinerarySnapshot>, ProviderError> {
    let response: FlightsResponse = serde_json::from_slice(body)
        .map_err(|e| ProviderError::invalid(format!("Failed to parse AeroAPI response: {}", e)))?;

    let en_route = response
        .flights
        .unwrap_or_default()
        .into_iter()
        .rev()
        .find(|f| f.status.as_deref().is_some_and(|s| s.contains(EN_ROUTE)));

    Ok(en_route.map(|flight| ItinerarySnapshot {
        origin_name: flight.origin.and_then(|a| a.name),
        destination_name: flight.destination.and_then(|a| a.name),
        estimated_on: flight.estimated_on,
        status: flight.status,
    }))
}
