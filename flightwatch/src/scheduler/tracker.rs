//! Tracker state and the work done for each event.
//!
//! [`TrackerState`] owns the identity index, the registry and, through
//! them, every flight record. It is only ever driven by the daemon loop,
//! one event at a time, so none of it needs a lock beyond the per-record
//! mutex that lets two identifiers share one record.

use std::collections::VecDeque;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::config::TrackerConfig;
use super::handle::{CommandError, CommandReply, Confirmation, TrackerEvent};
use super::timer::{first_landing_check_delay, LandingTimer, TimerId};
use crate::enrichment::EnrichmentResolver;
use crate::flight::{
    landing_step, takeoff_step, FlightHandle, FlightRecord, LandingOutcome, TakeoffOutcome,
};
use crate::identity::IdentityIndex;
use crate::notify::{Notification, Notifier};
use crate::provider::{
    IdentifierKind, ItineraryProvider, ProviderError, StatusProvider, StatusSnapshot,
};
use crate::registry::TrackingRegistry;
use crate::time::Clock;

/// Upper bound used when the configured gap tolerance does not fit a
/// `chrono::Duration`.
const MAX_GAP_TOLERANCE_DAYS: i64 = 365;

pub(crate) struct TrackerState<S: StatusProvider, I: ItineraryProvider> {
    config: TrackerConfig,
    status: S,
    enrichment: EnrichmentResolver<I>,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
    index: IdentityIndex,
    registry: TrackingRegistry,
    /// Sender used by timers this state spawns.
    events: mpsc::Sender<TrackerEvent>,
    next_timer_id: TimerId,
    /// Events raised while handling another event; run before new input.
    pending: VecDeque<TrackerEvent>,
}

impl<S: StatusProvider, I: ItineraryProvider> TrackerState<S, I> {
    pub(crate) fn new(
        config: TrackerConfig,
        status: S,
        itinerary: I,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock>,
        events: mpsc::Sender<TrackerEvent>,
    ) -> Self {
        let enrichment =
            EnrichmentResolver::new(itinerary, Arc::clone(&clock)).with_timeout(config.request_timeout);
        Self {
            config,
            status,
            enrichment,
            notifier,
            clock,
            index: IdentityIndex::new(),
            registry: TrackingRegistry::new(),
            events,
            next_timer_id: TimerId::new(1),
            pending: VecDeque::new(),
        }
    }

    pub(crate) fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub(crate) fn events(&self) -> mpsc::Sender<TrackerEvent> {
        self.events.clone()
    }

    pub(crate) fn next_pending(&mut self) -> Option<TrackerEvent> {
        self.pending.pop_front()
    }

    pub(crate) async fn handle(&mut self, event: TrackerEvent) {
        match event {
            TrackerEvent::AirborneCheck => self.airborne_check().await,
            TrackerEvent::LandingCheck {
                identifier,
                timer_id,
            } => self.landing_check(&identifier, timer_id).await,
            TrackerEvent::Add {
                identifier,
                kind,
                recurring,
                reply,
            } => {
                let result = self.add_flight(&identifier, kind, recurring).await;
                respond(reply, result);
            }
            TrackerEvent::Remove { identifier, reply } => {
                let result = self.remove_flight(&identifier);
                respond(reply, result);
            }
            TrackerEvent::List { reply } => {
                let _ = reply.send(self.registry.list());
            }
            TrackerEvent::Snapshot { identifier, reply } => {
                let record = self.resolve_any(&identifier).map(|flight| flight.snapshot());
                let _ = reply.send(record);
            }
        }
    }

    // =========================================================================
    // Airborne check
    // =========================================================================

    /// Takeoff check across every tracked flight.
    async fn airborne_check(&mut self) {
        let hour = self.clock.local_hour();
        if !self.config.active_window.contains(hour) {
            debug!(
                hour,
                window = %self.config.active_window,
                "Outside active hours, skipping airborne check"
            );
            return;
        }

        let entries: Vec<(String, IdentifierKind)> = self
            .registry
            .iter()
            .map(|entry| (entry.identifier.clone(), entry.kind))
            .collect();
        debug!(flights = entries.len(), "Running airborne check");

        for (identifier, kind) in entries {
            let Some(flight) = self.index.resolve(&identifier) else {
                debug!(identifier = %identifier, "Flight not resolved yet, skipping");
                continue;
            };
            if flight.lock().state.is_airborne() {
                continue;
            }

            let snapshot = match self.fetch_status(&identifier, kind).await {
                Ok(snapshot) => snapshot,
                Err(e) => {
                    warn!(identifier = %identifier, error = %e, "Airborne check failed");
                    continue;
                }
            };

            let outcome = takeoff_step(&mut flight.lock(), &snapshot, self.config.ground_altitude);
            if outcome == TakeoffOutcome::TookOff {
                self.index_new_identifiers(&flight);
                self.on_takeoff(&identifier, &flight).await;
            }
        }
    }

    async fn on_takeoff(&mut self, identifier: &str, flight: &FlightHandle) {
        info!(identifier, "Flight is airborne");

        if !self.enrichment.enrich(flight).await {
            debug!(identifier, "Announcing takeoff without itinerary");
        }

        let now = self.clock.now_utc();
        let record = flight.snapshot();
        self.notifier.notify(&Notification::Airborne {
            flight: record.display_code().to_string(),
            origin: record.origin.clone(),
            destination: record.destination.clone(),
            estimated_landing: record.estimated_landing.filter(|eta| *eta > now),
        });

        let delay =
            first_landing_check_delay(record.estimated_landing, now, self.config.landing_first_delay);
        self.start_landing_timer(identifier, delay);
    }

    /// Index identifiers learned at takeoff that nothing else holds yet.
    fn index_new_identifiers(&mut self, flight: &FlightHandle) {
        let identifiers = flight.lock().identifiers();
        for identifier in identifiers {
            if self.index.contains(&identifier) {
                continue;
            }
            if let Err(e) = self.index.bind(flight, std::slice::from_ref(&identifier)) {
                warn!(identifier = %identifier, error = %e, "Could not index new identifier");
            }
        }
    }

    // =========================================================================
    // Landing check
    // =========================================================================

    fn start_landing_timer(&mut self, identifier: &str, first_delay: std::time::Duration) {
        let Some(entry) = self.registry.get_mut(identifier) else {
            debug!(identifier, "Flight no longer tracked, no landing timer");
            return;
        };

        let timer_id = self.next_timer_id;
        self.next_timer_id = timer_id.next();

        let event_identifier = entry.identifier.clone();
        let timer = LandingTimer::spawn(
            timer_id,
            first_delay,
            self.config.landing_interval,
            self.events.clone(),
            move || TrackerEvent::LandingCheck {
                identifier: event_identifier.clone(),
                timer_id,
            },
        );
        info!(
            identifier,
            timer = %timer_id,
            first_check_secs = first_delay.as_secs(),
            "Starting landing check"
        );

        if let Some(previous) = entry.landing_timer.replace(timer) {
            previous.cancel();
        }
    }

    fn stop_landing_timer(&mut self, identifier: &str) {
        if let Some(entry) = self.registry.get_mut(identifier) {
            entry.cancel_landing_timer();
        }
    }

    async fn landing_check(&mut self, identifier: &str, timer_id: TimerId) {
        let Some(entry) = self.registry.get(identifier) else {
            debug!(identifier, "Landing check for untracked flight, ignoring");
            return;
        };
        if entry.landing_timer.as_ref().map(LandingTimer::id) != Some(timer_id) {
            debug!(identifier, timer = %timer_id, "Stale landing check, ignoring");
            return;
        }
        let kind = entry.kind;
        let recurring = entry.recurring;

        let Some(flight) = self.index.resolve(identifier) else {
            warn!(identifier, "Landing check found no flight record, stopping it");
            self.stop_landing_timer(identifier);
            return;
        };
        if !flight.lock().state.is_airborne() {
            debug!(identifier, "Flight is not airborne, stopping landing check");
            self.stop_landing_timer(identifier);
            return;
        }

        let snapshot = match self.fetch_status(identifier, kind).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(identifier, error = %e, "Landing check failed");
                return;
            }
        };

        let outcome = landing_step(
            &mut flight.lock(),
            &snapshot,
            self.config.ground_altitude,
            self.gap_tolerance(),
            self.clock.now_utc(),
        );

        match outcome {
            LandingOutcome::Landed => {
                info!(identifier, recurring, "Flight has landed");
                self.stop_landing_timer(identifier);
                let code = flight.lock().display_code().to_string();
                self.notifier.notify(&Notification::Landed { flight: code });
                if !recurring {
                    self.pending.push_back(TrackerEvent::Remove {
                        identifier: identifier.to_string(),
                        reply: None,
                    });
                }
            }
            LandingOutcome::AwaitingGap => {
                debug!(identifier, "No broadcast, waiting out the gap tolerance");
            }
            LandingOutcome::StillAirborne => {
                debug!(identifier, "Still airborne");
            }
            LandingOutcome::NotAirborne => self.stop_landing_timer(identifier),
        }
    }

    fn gap_tolerance(&self) -> chrono::Duration {
        chrono::Duration::from_std(self.config.landing_gap_tolerance)
            .unwrap_or_else(|_| chrono::Duration::days(MAX_GAP_TOLERANCE_DAYS))
    }

    // =========================================================================
    // Commands
    // =========================================================================

    async fn add_flight(
        &mut self,
        raw_identifier: &str,
        kind: IdentifierKind,
        recurring: bool,
    ) -> Result<Confirmation, CommandError> {
        let identifier = kind.normalize(raw_identifier);
        match self.try_add_flight(&identifier, kind, recurring).await {
            Ok(confirmation) => Ok(confirmation),
            Err(e) => {
                warn!(identifier = %identifier, error = %e, "Could not add flight");
                self.notifier.notify(&Notification::AddFailed {
                    identifier,
                    reason: e.to_string(),
                });
                Err(e)
            }
        }
    }

    async fn try_add_flight(
        &mut self,
        identifier: &str,
        kind: IdentifierKind,
        recurring: bool,
    ) -> Result<Confirmation, CommandError> {
        if identifier.is_empty() {
            return Err(CommandError::EmptyIdentifier);
        }

        let snapshot = self
            .fetch_status(identifier, kind)
            .await
            .map_err(|source| CommandError::Provider {
                identifier: identifier.to_string(),
                source,
            })?;

        let reporting = snapshot.is_reporting();
        let mut record = if reporting {
            FlightRecord::from_snapshot(&snapshot)
        } else {
            debug!(identifier, "Not broadcasting, seeding record from identifier");
            FlightRecord::seeded(identifier, kind)
        };
        record.adopt(identifier, kind);
        let identifiers = record.identifiers();
        let flight = FlightHandle::new(record);

        let index_error = |source| CommandError::Index {
            identifier: identifier.to_string(),
            source,
        };
        if self.index.contains(identifier) {
            debug!(identifier, "Replacing flight record");
            self.index.rebind(identifier, &flight).map_err(index_error)?;
            let others: Vec<String> = identifiers
                .into_iter()
                .filter(|key| key != identifier && !self.index.contains(key))
                .collect();
            if !others.is_empty() {
                self.index.bind(&flight, &others).map_err(index_error)?;
            }
        } else {
            self.index.bind(&flight, &identifiers).map_err(index_error)?;
        }

        if self.registry.add(identifier, kind, recurring).is_some() {
            debug!(identifier, "Replaced existing tracking entry");
        }

        let notification = Notification::Added {
            identifier: identifier.to_string(),
            assigned: self.index.keys_for(&flight),
            reporting,
        };
        info!(identifier, kind = %kind, recurring, reporting, "Flight added");
        self.notifier.notify(&notification);

        Ok(Confirmation {
            identifier: identifier.to_string(),
            message: notification.text(),
        })
    }

    fn remove_flight(&mut self, raw_identifier: &str) -> Result<Confirmation, CommandError> {
        let needle = raw_identifier.trim();
        if needle.is_empty() {
            return Err(CommandError::EmptyIdentifier);
        }

        let entry_identifier = match self.registry.get(needle) {
            Some(entry) => Some(entry.identifier.clone()),
            None => self.entry_for_alias(needle),
        };
        let Some(entry) = entry_identifier.and_then(|id| self.registry.remove(&id)) else {
            debug!(identifier = needle, "Remove for untracked flight");
            self.notifier.notify(&Notification::NotTracked {
                identifier: needle.to_string(),
            });
            return Err(CommandError::NotTracked(needle.to_string()));
        };

        if let Some(flight) = self.index.resolve(&entry.identifier) {
            let shared = self
                .registry
                .iter()
                .filter_map(|other| self.index.resolve(&other.identifier))
                .any(|other| other.ptr_eq(&flight));
            if !shared {
                for key in self.index.keys_for(&flight) {
                    self.index.unbind(&key);
                }
            }
        }

        info!(identifier = %entry.identifier, "Flight removed");
        let notification = Notification::Removed {
            identifier: entry.identifier.clone(),
        };
        self.notifier.notify(&notification);

        Ok(Confirmation {
            identifier: entry.identifier.clone(),
            message: notification.text(),
        })
    }

    /// Tracking entry whose record is also reachable as `alias`.
    fn entry_for_alias(&self, alias: &str) -> Option<String> {
        let flight = self.resolve_any(alias)?;
        self.registry
            .iter()
            .find(|entry| {
                self.index
                    .resolve(&entry.identifier)
                    .is_some_and(|other| other.ptr_eq(&flight))
            })
            .map(|entry| entry.identifier.clone())
    }

    /// Resolve an identifier of unknown kind.
    fn resolve_any(&self, identifier: &str) -> Option<FlightHandle> {
        let trimmed = identifier.trim();
        self.index
            .resolve(trimmed)
            .or_else(|| self.index.resolve(&IdentifierKind::Hex.normalize(trimmed)))
            .or_else(|| self.index.resolve(&IdentifierKind::Registration.normalize(trimmed)))
    }

    async fn fetch_status(
        &self,
        identifier: &str,
        kind: IdentifierKind,
    ) -> Result<StatusSnapshot, ProviderError> {
        let request = self.status.fetch_status(identifier, kind);
        match tokio::time::timeout(self.config.request_timeout, request).await {
            Ok(result) => result,
            Err(_) => Err(ProviderError::timeout(format!(
                "{} did not answer within {}s",
                self.status.name(),
                self.config.request_timeout.as_secs()
            ))),
        }
    }
}

fn respond(reply: Option<CommandReply>, result: Result<Confirmation, CommandError>) {
    if let Some(reply) = reply {
        let _ = reply.send(result);
    }
}
