//! Flight data provider abstraction
//!
//! This module provides the two external feeds the tracker depends on:
//!
//! - [`StatusProvider`] - live ADS-B status (is the aircraft reporting, at
//!   what altitude, under which identifiers)
//! - [`ItineraryProvider`] - route and schedule of the flight in progress
//!
//! Responses are decoded once, here, into [`StatusSnapshot`] and
//! [`ItinerarySnapshot`] with explicit optional fields. Everything past this
//! boundary works with typed values.
//!
//! # Example
//!
//! ```ignore
//! use flightwatch::provider::{AdsbExchangeProvider, AsyncReqwestClient, IdentifierKind};
//!
//! let http_client = AsyncReqwestClient::new()?;
//! let provider = AdsbExchangeProvider::new(http_client, api_key);
//! let snapshot = provider.fetch_status("a1013f", IdentifierKind::Hex).await?;
//! ```

mod adsb;
mod aeroapi;
mod http;
mod types;

pub use adsb::{AdsbExchangeProvider, DEFAULT_ADSB_API_HOST, DEFAULT_ADSB_BASE_URL};
pub use aeroapi::{AeroApiProvider, DEFAULT_AEROAPI_BASE_URL};
pub use http::{AsyncHttpClient, AsyncReqwestClient, DEFAULT_HTTP_TIMEOUT};
pub use types::{
    Altitude, IdentifierKind, ItineraryProvider, ItinerarySnapshot, Position, ProviderError,
    ProviderErrorKind, StatusProvider, StatusSnapshot,
};

#[cfg(test)]
pub use http::tests::MockAsyncHttpClient;
