//! ADS-B Exchange status provider (RapidAPI v2 endpoints).
//!
//! Looks an aircraft up by hex address (`/icao/{hex}/`) or registration
//! (`/registration/{reg}/`). A successful lookup returns
//! `{"msg": "No error", "ac": [...]}` where `ac` is empty or null while the
//! aircraft is not broadcasting. RapidAPI reports quota and key problems with
//! a top-level `message` field instead.

use serde::Deserialize;
use tracing::debug;

use super::http::AsyncHttpClient;
use super::types::{
    Altitude, IdentifierKind, Position, ProviderError, StatusProvider, StatusSnapshot,
};

/// Default RapidAPI base URL for ADS-B Exchange.
pub const DEFAULT_ADSB_BASE_URL: &str = "https://adsbexchange-com1.p.rapidapi.com/v2";

/// Default RapidAPI host header value.
pub const DEFAULT_ADSB_API_HOST: &str = "adsbexchange-com1.p.rapidapi.com";

/// Value of `msg` on a successful lookup.
const MSG_NO_ERROR: &str = "No error";

/// Sentinel `alt_baro` value for aircraft on the ground.
const GROUND_SENTINEL: &str = "ground";

#[derive(Debug, Deserialize)]
struct AdsbResponse {
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    ac: Option<Vec<AdsbAircraft>>,
    /// Only present when RapidAPI rejects the request.
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AdsbAircraft {
    #[serde(default)]
    hex: Option<String>,
    /// Registration; omitted for blocked or military flights.
    #[serde(default)]
    r: Option<String>,
    #[serde(default)]
    flight: Option<String>,
    #[serde(default)]
    alt_baro: Option<RawAltitude>,
    #[serde(default)]
    lat: Option<f64>,
    #[serde(default)]
    lon: Option<f64>,
    #[serde(default)]
    gs: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawAltitude {
    Feet(f64),
    Label(String),
}

impl RawAltitude {
    fn into_altitude(self) -> Option<Altitude> {
        match self {
            RawAltitude::Feet(feet) => Some(Altitude::Feet(feet)),
            RawAltitude::Label(label) if label.eq_ignore_ascii_case(GROUND_SENTINEL) => {
                Some(Altitude::Ground)
            }
            RawAltitude::Label(_) => None,
        }
    }
}

/// Status provider backed by the ADS-B Exchange API.
pub struct AdsbExchangeProvider<C: AsyncHttpClient> {
    http_client: C,
    api_key: String,
    api_host: String,
    base_url: String,
}

impl<C: AsyncHttpClient> AdsbExchangeProvider<C> {
    /// Creates a provider against the default RapidAPI endpoint.
    pub fn new(http_client: C, api_key: impl Into<String>) -> Self {
        Self {
            http_client,
            api_key: api_key.into(),
            api_host: DEFAULT_ADSB_API_HOST.to_string(),
            base_url: DEFAULT_ADSB_BASE_URL.to_string(),
        }
    }

    /// Override the base URL and RapidAPI host.
    pub fn with_endpoint(mut self, base_url: impl Into<String>, api_host: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self.api_host = api_host.into();
        self
    }

    fn lookup_url(&self, identifier: &str, kind: IdentifierKind) -> String {
        let segment = match kind {
            IdentifierKind::Hex => "icao",
            IdentifierKind::Registration => "registration",
        };
        format!("{}/{}/{}/", self.base_url, segment, identifier)
    }
}

impl<C: AsyncHttpClient> StatusProvider for AdsbExchangeProvider<C> {
    async fn fetch_status(
        &self,
        identifier: &str,
        kind: IdentifierKind,
    ) -> Result<StatusSnapshot, ProviderError> {
        let url = self.lookup_url(identifier, kind);
        debug!(identifier, kind = %kind, url = %url, "Fetching ADS-B status");

        let body = self
            .http_client
            .get_with_headers(
                &url,
                &[
                    ("X-RapidAPI-Key", self.api_key.as_str()),
                    ("X-RapidAPI-Host", self.api_host.as_str()),
                ],
            )
            .await?;

        parse_status(&body)
    }

    fn name(&self) -> &str {
        "ADS-B Exchange"
    }
}

/// Decode an ADS-B Exchange response body into a snapshot.
fn parse_status(body: &[u8]) -> Result<StatusSnapshot, ProviderError> {
    let response: AdsbResponse = serde_json::from_slice(body)
        .map_err(|e| ProviderError::invalid(format!("Failed to parse ADS-B response: {}", e)))?;

    if let Some(message) = response.message {
        let lowered = message.to_lowercase();
        return Err(if lowered.contains("rate limit") || lowered.contains("quota") {
            ProviderError::rate_limited(message)
        } else {
            ProviderError::invalid(message)
        });
    }

    match response.msg.as_deref() {
        Some(MSG_NO_ERROR) => {}
        Some(other) => return Err(ProviderError::invalid(other.to_string())),
        None => return Err(ProviderError::invalid("ADS-B response carries no status message")),
    }

    let aircraft = response.ac.unwrap_or_default();
    let Some(first) = aircraft.first() else {
        return Ok(StatusSnapshot::silent());
    };

    let snapshot = StatusSnapshot {
        primary_code: non_empty(first.hex.as_deref()).map(|h| h.to_lowercase()),
        secondary_code: non_empty(first.r.as_deref()).map(str::to_string),
        flight_number: non_empty(first.flight.as_deref()).map(str::to_string),
        positions: aircraft.into_iter().map(into_position).collect(),
    };

    Ok(snapshot)
}

fn into_position(aircraft: AdsbAircraft) -> Position {
    Position {
        altitude: aircraft.alt_baro.and_then(RawAltitude::into_altitude),
        latitude: aircraft.lat,
        longitude: aircraft.lon,
        ground_speed: aircraft.gs,
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::http::tests::MockAsyncHttpClient;
    use crate::provider::ProviderErrorKind;

    const AIRBORNE_BODY: &str = r#"{
        "ac": [{
            "hex": "a1013f",
            "type": "adsb_icao",
            "flight": "N621MM  ",
            "r": "N621MM",
            "t": "C68A",
            "alt_baro": 5000,
            "gs": 312.4,
            "lat": 40.1,
            "lon": -75.2
        }],
        "msg": "No error",
        "now": 1700000000000,
        "total": 1
    }"#;

    #[tokio::test]
    async fn test_fetch_by_hex_uses_icao_endpoint() {
        let mock = MockAsyncHttpClient::with_body(AIRBORNE_BODY);
        let provider = AdsbExchangeProvider::new(mock, "key-123");

        let snapshot = provider
            .fetch_status("a1013f", IdentifierKind::Hex)
            .await
            .unwrap();

        assert_eq!(
            provider.http_client.last_url().as_deref(),
            Some("https://adsbexchange-com1.p.rapidapi.com/v2/icao/a1013f/")
        );
        assert_eq!(
            provider.http_client.last_header("X-RapidAPI-Key").as_deref(),
            Some("key-123")
        );
        assert_eq!(snapshot.primary_code.as_deref(), Some("a1013f"));
        assert_eq!(snapshot.secondary_code.as_deref(), Some("N621MM"));
        assert_eq!(snapshot.flight_number.as_deref(), Some("N621MM"));
        assert_eq!(snapshot.altitude(), Some(Altitude::Feet(5000.0)));
    }

    #[tokio::test]
    async fn test_fetch_by_registration_uses_registration_endpoint() {
        let mock = MockAsyncHttpClient::with_body(AIRBORNE_BODY);
        let provider = AdsbExchangeProvider::new(mock, "key")
            .with_endpoint("http://localhost:9000/v2/", "localhost");

        provider
            .fetch_status("N621MM", IdentifierKind::Registration)
            .await
            .unwrap();

        assert_eq!(
            provider.http_client.last_url().as_deref(),
            Some("http://localhost:9000/v2/registration/N621MM/")
        );
        assert_eq!(
            provider.http_client.last_header("X-RapidAPI-Host").as_deref(),
            Some("localhost")
        );
    }

    #[test]
    fn test_ground_sentinel() {
        let body = br#"{"msg": "No error", "ac": [{"hex": "a1013f", "alt_baro": "ground"}]}"#;
        let snapshot = parse_status(body).unwrap();
        assert_eq!(snapshot.altitude(), Some(Altitude::Ground));
        assert!(snapshot.secondary_code.is_none());
    }

    #[test]
    fn test_empty_or_null_aircraft_list_is_silent() {
        let empty = parse_status(br#"{"msg": "No error", "ac": []}"#).unwrap();
        let null = parse_status(br#"{"msg": "No error", "ac": null}"#).unwrap();
        assert!(!empty.is_reporting());
        assert!(!null.is_reporting());
    }

    #[test]
    fn test_rate_limit_message() {
        let body = br#"{"message": "You have exceeded the rate limit per minute for your plan"}"#;
        let err = parse_status(body).unwrap_err();
        assert_eq!(err.kind, ProviderErrorKind::RateLimited);
    }

    #[test]
    fn test_other_api_message_is_invalid() {
        let body = br#"{"message": "Invalid API key. Go to https://docs.rapidapi.com"}"#;
        let err = parse_status(body).unwrap_err();
        assert_eq!(err.kind, ProviderErrorKind::Invalid);
    }

    #[test]
    fn test_unexpected_msg_is_invalid() {
        let err = parse_status(br#"{"msg": "bad request", "ac": []}"#).unwrap_err();
        assert_eq!(err.kind, ProviderErrorKind::Invalid);
        assert!(err.detail.contains("bad request"));
    }

    #[test]
    fn test_malformed_json_is_invalid() {
        let err = parse_status(b"<html>").unwrap_err();
        assert_eq!(err.kind, ProviderErrorKind::Invalid);
    }

    #[test]
    fn test_unknown_altitude_label_is_dropped() {
        let body = br#"{"msg": "No error", "ac": [{"hex": "abc123", "alt_baro": "n/a"}]}"#;
        let snapshot = parse_status(body).unwrap();
        assert!(snapshot.is_reporting());
        assert_eq!(snapshot.altitude(), None);
    }
}
