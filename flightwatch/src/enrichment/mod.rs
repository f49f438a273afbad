//! Itinerary enrichment for airborne flights.
//!
//! When a flight takes off, the [`EnrichmentResolver`] looks up its
//! itinerary by registration and fills in origin, destination and the
//! estimated landing time. The raw payload is cached on the record, so the
//! itinerary provider is called at most once per airborne period; the cache
//! is dropped when the flight lands.
//!
//! Enrichment is all or nothing. If any field cannot be parsed the record's
//! origin, destination and ETA stay unset and `enrich` returns `false`.

mod parse;

pub use parse::{parse_itinerary, EnrichmentError, ParsedItinerary, ESTIMATED_ON_FORMAT};

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::flight::FlightHandle;
use crate::provider::{ItineraryProvider, ItinerarySnapshot, DEFAULT_HTTP_TIMEOUT};
use crate::time::Clock;

/// Fetches, caches and applies itinerary data.
pub struct EnrichmentResolver<I: ItineraryProvider> {
    provider: I,
    timeout: Duration,
    clock: Arc<dyn Clock>,
}

impl<I: ItineraryProvider> EnrichmentResolver<I> {
    pub fn new(provider: I, clock: Arc<dyn Clock>) -> Self {
        Self {
            provider,
            timeout: DEFAULT_HTTP_TIMEOUT,
            clock,
        }
    }

    /// Bound each provider call by `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn provider(&self) -> &I {
        &self.provider
    }

    /// Enrich a flight with its itinerary.
    ///
    /// Returns `true` when origin, destination and ETA were applied. A
    /// cached payload is reused without a provider call. Without a
    /// registration there is nothing to look up and no call is made.
    pub async fn enrich(&self, flight: &FlightHandle) -> bool {
        let (cached, registration, code) = {
            let record = flight.lock();
            (
                record.itinerary.clone(),
                record.secondary_code.clone(),
                record.display_code().to_string(),
            )
        };

        let itinerary = match cached {
            Some(itinerary) => {
                debug!(flight = %code, "Reusing cached itinerary");
                itinerary
            }
            None => {
                let Some(registration) = registration else {
                    debug!(flight = %code, "No registration known, skipping itinerary lookup");
                    return false;
                };
                match self.fetch(&registration).await {
                    Some(itinerary) => {
                        flight.lock().itinerary = Some(itinerary.clone());
                        itinerary
                    }
                    None => return false,
                }
            }
        };

        match parse_itinerary(&itinerary, self.clock.now_utc()) {
            Ok(parsed) => {
                info!(
                    flight = %code,
                    origin = %parsed.origin,
                    destination = %parsed.destination,
                    eta = %parsed.estimated_landing,
                    "Itinerary applied"
                );
                let mut record = flight.lock();
                record.origin = Some(parsed.origin);
                record.destination = Some(parsed.destination);
                record.estimated_landing = Some(parsed.estimated_landing);
                true
            }
            Err(e) => {
                warn!(flight = %code, error = %e, "Failed to process itinerary");
                false
            }
        }
    }

    async fn fetch(&self, registration: &str) -> Option<ItinerarySnapshot> {
        let request = self.provider.fetch_itinerary(registration);
        match tokio::time::timeout(self.timeout, request).await {
            Ok(Ok(Some(itinerary))) => Some(itinerary),
            Ok(Ok(None)) => {
                debug!(registration, "No itinerary in progress");
                None
            }
            Ok(Err(e)) => {
                warn!(
                    registration,
                    provider = self.provider.name(),
                    error = %e,
                    "Itinerary lookup failed"
                );
                None
            }
            Err(_) => {
                warn!(
                    registration,
                    timeout_secs = self.timeout.as_secs(),
                    "Itinerary lookup timed out"
                );
                None
            }
        }
    }
}
