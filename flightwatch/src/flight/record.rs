//! Flight record and its shared handle.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::{Mutex, MutexGuard};

use super::state::FlightState;
use crate::provider::{IdentifierKind, ItinerarySnapshot, StatusSnapshot};

/// Everything known about one tracked aircraft.
#[derive(Debug, Clone, PartialEq)]
pub struct FlightRecord {
    /// Hex transponder address (lower case).
    pub primary_code: Option<String>,
    /// Registration (upper case), withheld by the feed for some flights.
    pub secondary_code: Option<String>,
    pub flight_number: Option<String>,
    pub state: FlightState,
    pub origin: Option<String>,
    pub destination: Option<String>,
    /// `None` means unknown; landing checks start right away.
    pub estimated_landing: Option<DateTime<Utc>>,
    /// Raw itinerary payload, cached for the current airborne period.
    pub itinerary: Option<ItinerarySnapshot>,
    /// When the landing check first saw the aircraft go quiet.
    pub silent_since: Option<DateTime<Utc>>,
}

impl FlightRecord {
    fn empty() -> Self {
        Self {
            primary_code: None,
            secondary_code: None,
            flight_number: None,
            state: FlightState::Unresolved,
            origin: None,
            destination: None,
            estimated_landing: None,
            itinerary: None,
            silent_since: None,
        }
    }

    /// Build a fresh record from a status lookup.
    ///
    /// The record starts `Unresolved`; the airborne check decides its state.
    pub fn from_snapshot(snapshot: &StatusSnapshot) -> Self {
        let mut record = Self::empty();
        record.primary_code = snapshot
            .primary_code
            .as_deref()
            .map(|c| IdentifierKind::Hex.normalize(c));
        record.secondary_code = snapshot
            .secondary_code
            .as_deref()
            .map(|c| IdentifierKind::Registration.normalize(c));
        record.flight_number = snapshot.flight_number.clone();
        record
    }

    /// Build a record that only knows the identifier it was requested by.
    pub fn seeded(identifier: &str, kind: IdentifierKind) -> Self {
        let mut record = Self::empty();
        record.adopt(identifier, kind);
        record
    }

    /// Fill the code slot for `kind` if it is still empty.
    ///
    /// Returns `true` if the slot was filled.
    pub fn adopt(&mut self, identifier: &str, kind: IdentifierKind) -> bool {
        let slot = match kind {
            IdentifierKind::Hex => &mut self.primary_code,
            IdentifierKind::Registration => &mut self.secondary_code,
        };
        if slot.is_some() || identifier.trim().is_empty() {
            return false;
        }
        *slot = Some(kind.normalize(identifier));
        true
    }

    /// Identifiers this record can be indexed under (at most two).
    pub fn identifiers(&self) -> Vec<String> {
        self.primary_code
            .iter()
            .chain(self.secondary_code.iter())
            .cloned()
            .collect()
    }

    /// The best identifier for display: primary code, then registration.
    pub fn display_code(&self) -> &str {
        self.primary_code
            .as_deref()
            .or(self.secondary_code.as_deref())
            .unwrap_or("unknown")
    }

    /// Drop everything learned during the last airborne period.
    pub fn clear_itinerary(&mut self) {
        self.itinerary = None;
        self.origin = None;
        self.destination = None;
        self.estimated_landing = None;
    }
}

/// Shared handle to a [`FlightRecord`].
///
/// Several identifiers may resolve to the same handle; a change made through
/// one is visible through all. The lock is never held across an `.await`.
#[derive(Debug, Clone)]
pub struct FlightHandle(Arc<Mutex<FlightRecord>>);

impl FlightHandle {
    pub fn new(record: FlightRecord) -> Self {
        Self(Arc::new(Mutex::new(record)))
    }

    pub fn lock(&self) -> MutexGuard<'_, FlightRecord> {
        self.0.lock()
    }

    /// Copy of the current record.
    pub fn snapshot(&self) -> FlightRecord {
        self.0.lock().clone()
    }

    /// Whether two handles point at the same record instance.
    pub fn ptr_eq(&self, other: &FlightHandle) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}
