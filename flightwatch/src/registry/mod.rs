//! Tracking registry: the flights users asked to follow.
//!
//! One [`TrackingEntry`] per requested identifier, kept in insertion order.
//! An entry exists independently of whether its identifier has resolved to
//! a flight record. The entry owns the flight's landing timer, if one is
//! running; dropping the entry cancels it.

use std::fmt;

use crate::provider::IdentifierKind;
use crate::scheduler::LandingTimer;

/// A flight under tracking.
#[derive(Debug)]
pub struct TrackingEntry {
    pub identifier: String,
    pub kind: IdentifierKind,
    /// Keep tracking after a landing instead of removing the entry.
    pub recurring: bool,
    pub landing_timer: Option<LandingTimer>,
}

impl TrackingEntry {
    pub fn new(identifier: impl Into<String>, kind: IdentifierKind, recurring: bool) -> Self {
        Self {
            identifier: identifier.into(),
            kind,
            recurring,
            landing_timer: None,
        }
    }

    /// Stop the landing timer, if one is running.
    pub fn cancel_landing_timer(&mut self) -> bool {
        match self.landing_timer.take() {
            Some(timer) => {
                timer.cancel();
                true
            }
            None => false,
        }
    }

    pub fn summary(&self) -> TrackedFlight {
        TrackedFlight {
            identifier: self.identifier.clone(),
            kind: self.kind,
            recurring: self.recurring,
        }
    }
}

/// Read-only view of an entry, as returned by `list`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedFlight {
    pub identifier: String,
    pub kind: IdentifierKind,
    pub recurring: bool,
}

impl fmt::Display for TrackedFlight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.identifier, self.kind)?;
        if self.recurring {
            write!(f, " recurring")?;
        }
        Ok(())
    }
}

/// The set of tracked flights.
#[derive(Debug, Default)]
pub struct TrackingRegistry {
    entries: Vec<TrackingEntry>,
}

impl TrackingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry, replacing one with the same identifier.
    ///
    /// The replaced entry is returned with its landing timer already
    /// cancelled.
    pub fn add(
        &mut self,
        identifier: impl Into<String>,
        kind: IdentifierKind,
        recurring: bool,
    ) -> Option<TrackingEntry> {
        let entry = TrackingEntry::new(identifier, kind, recurring);
        match self.position(&entry.identifier) {
            Some(index) => {
                let mut previous = std::mem::replace(&mut self.entries[index], entry);
                previous.cancel_landing_timer();
                Some(previous)
            }
            None => {
                self.entries.push(entry);
                None
            }
        }
    }

    /// Remove an entry, cancelling its landing timer.
    pub fn remove(&mut self, identifier: &str) -> Option<TrackingEntry> {
        let index = self.position(identifier)?;
        let mut entry = self.entries.remove(index);
        entry.cancel_landing_timer();
        Some(entry)
    }

    pub fn get(&self, identifier: &str) -> Option<&TrackingEntry> {
        self.position(identifier).map(|i| &self.entries[i])
    }

    pub fn get_mut(&mut self, identifier: &str) -> Option<&mut TrackingEntry> {
        self.position(identifier).map(move |i| &mut self.entries[i])
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.position(identifier).is_some()
    }

    pub fn list(&self) -> Vec<TrackedFlight> {
        self.entries.iter().map(TrackingEntry::summary).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TrackingEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry identifiers are matched without regard to case.
    fn position(&self, identifier: &str) -> Option<usize> {
        let identifier = identifier.trim();
        self.entries
            .iter()
            .position(|e| e.identifier.eq_ignore_ascii_case(identifier))
    }
}
