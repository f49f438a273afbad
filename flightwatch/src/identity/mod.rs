//! Identity index: either identifier of an aircraft resolves to one record.
//!
//! An aircraft has a hex address and, usually, a registration. Both are
//! keys in the index and both resolve to the same [`FlightHandle`], so an
//! update made through one is seen through the other.
//!
//! # Example
//!
//! ```ignore
//! use flightwatch::identity::IdentityIndex;
//!
//! let mut index = IdentityIndex::new();
//! index.bind(&handle, &["a1013f".to_string(), "N621MM".to_string()])?;
//!
//! assert!(index.resolve("a1013f").unwrap().ptr_eq(&index.resolve("N621MM").unwrap()));
//! ```

use std::collections::HashMap;

use thiserror::Error;
use tracing::debug;

use crate::flight::FlightHandle;

/// Maximum number of keys one record may hold.
pub const MAX_KEYS_PER_RECORD: usize = 2;

/// Errors from binding identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    /// A record with no identifier cannot be indexed.
    #[error("record has no identifiers to index")]
    NoIdentifiers,

    /// Binding would give the record more keys than it may hold.
    #[error("record would have {keys} keys, at most {MAX_KEYS_PER_RECORD} allowed")]
    TooManyKeys { keys: usize },
}

/// Mapping from identifier to shared flight record.
#[derive(Debug, Default)]
pub struct IdentityIndex {
    keys: HashMap<String, FlightHandle>,
}

impl IdentityIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up an identifier. `None` means not tracked or not resolved yet.
    pub fn resolve(&self, identifier: &str) -> Option<FlightHandle> {
        self.keys.get(identifier).cloned()
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.keys.contains_key(identifier)
    }

    /// Associate every identifier with `record`, replacing prior bindings of
    /// those keys.
    pub fn bind(&mut self, record: &FlightHandle, identifiers: &[String]) -> Result<(), IdentityError> {
        if identifiers.is_empty() {
            return Err(IdentityError::NoIdentifiers);
        }

        let mut keys = self.keys_for(record);
        for identifier in identifiers {
            if !keys.contains(identifier) {
                keys.push(identifier.clone());
            }
        }
        if keys.len() > MAX_KEYS_PER_RECORD {
            return Err(IdentityError::TooManyKeys { keys: keys.len() });
        }

        for identifier in identifiers {
            debug!(identifier = %identifier, "Binding identifier");
            self.keys.insert(identifier.clone(), record.clone());
        }
        Ok(())
    }

    /// Point one existing key at a freshly built record.
    ///
    /// Other keys of the previous record keep pointing at the previous
    /// record. Returns the record the key pointed at before.
    pub fn rebind(
        &mut self,
        identifier: &str,
        record: &FlightHandle,
    ) -> Result<Option<FlightHandle>, IdentityError> {
        let held = self.keys_for(record);
        if !held.iter().any(|k| k == identifier) && held.len() >= MAX_KEYS_PER_RECORD {
            return Err(IdentityError::TooManyKeys {
                keys: held.len() + 1,
            });
        }

        let previous = self.keys.insert(identifier.to_string(), record.clone());
        if let Some(previous) = &previous {
            let orphaned: Vec<String> = self
                .keys_for(previous)
                .into_iter()
                .filter(|k| k != identifier)
                .collect();
            if !orphaned.is_empty() {
                debug!(
                    identifier,
                    orphaned = ?orphaned,
                    "Rebound identifier; other keys keep the previous record"
                );
            }
        }
        Ok(previous)
    }

    /// Remove one key. The record stays reachable through its other keys.
    pub fn unbind(&mut self, identifier: &str) -> Option<FlightHandle> {
        let removed = self.keys.remove(identifier);
        if removed.is_some() {
            debug!(identifier, "Unbound identifier");
        }
        removed
    }

    /// Every key currently resolving to `record`.
    pub fn keys_for(&self, record: &FlightHandle) -> Vec<String> {
        let mut keys: Vec<String> = self
            .keys
            .iter()
            .filter(|(_, handle)| handle.ptr_eq(record))
            .map(|(key, _)| key.clone())
            .collect();
        keys.sort();
        keys
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Number of distinct records reachable through the index.
    pub fn record_count(&self) -> usize {
        let mut distinct: Vec<&FlightHandle> = Vec::new();
        for handle in self.keys.values() {
            if !distinct.iter().any(|seen| seen.ptr_eq(handle)) {
                distinct.push(handle);
            }
        }
        distinct.len()
    }
}
