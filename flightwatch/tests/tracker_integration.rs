//! Integration tests for the flight tracker.
//!
//! These tests drive a running [`FlightTracker`] end to end:
//! - Commands through the [`TrackerHandle`]
//! - Takeoff and landing detection on paused tokio time
//! - Notifications collected from a [`ChannelNotifier`]
//!
//! Run with: `cargo test --test tracker_integration`

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use flightwatch::flight::FlightState;
use flightwatch::notify::{ChannelNotifier, Notification};
use flightwatch::provider::{
    Altitude, IdentifierKind, ItineraryProvider, ItinerarySnapshot, Position, ProviderError,
    StatusProvider, StatusSnapshot,
};
use flightwatch::scheduler::{CommandError, FlightTracker, TrackerConfig, TrackerHandle};
use flightwatch::time::{Clock, ManualClock};

// ============================================================================
// Scripted Providers
// ============================================================================

/// Status provider answering from a per-identifier script.
///
/// Identifiers without a script entry are reported as silent.
#[derive(Clone, Default)]
struct ScriptedStatus {
    responses: Arc<Mutex<HashMap<String, Result<StatusSnapshot, ProviderError>>>>,
    calls: Arc<AtomicUsize>,
}

impl ScriptedStatus {
    fn set(&self, identifier: &str, response: Result<StatusSnapshot, ProviderError>) {
        self.responses.lock().insert(identifier.to_string(), response);
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl StatusProvider for ScriptedStatus {
    async fn fetch_status(
        &self,
        identifier: &str,
        _kind: IdentifierKind,
    ) -> Result<StatusSnapshot, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.responses
            .lock()
            .get(identifier)
            .cloned()
            .unwrap_or_else(|| Ok(StatusSnapshot::silent()))
    }

    fn name(&self) -> &str {
        "scripted status"
    }
}

/// Itinerary provider returning one scripted answer for every registration.
#[derive(Clone, Default)]
struct ScriptedItinerary {
    response: Arc<Mutex<Option<ItinerarySnapshot>>>,
    calls: Arc<AtomicUsize>,
}

impl ScriptedItinerary {
    fn set(&self, itinerary: Option<ItinerarySnapshot>) {
        *self.response.lock() = itinerary;
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ItineraryProvider for ScriptedItinerary {
    async fn fetch_itinerary(
        &self,
        _registration: &str,
    ) -> Result<Option<ItinerarySnapshot>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.response.lock().clone())
    }

    fn name(&self) -> &str {
        "scripted itinerary"
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

struct Harness {
    handle: TrackerHandle,
    notifications: mpsc::UnboundedReceiver<Notification>,
    status: ScriptedStatus,
    itinerary: ScriptedItinerary,
    clock: ManualClock,
    shutdown: CancellationToken,
    task: JoinHandle<()>,
}

impl Harness {
    /// Start a tracker at 12:00 local time with one-minute takeoff checks
    /// and 30 second landing checks.
    fn start() -> Self {
        Self::start_at_hour(12)
    }

    fn start_at_hour(local_hour: u32) -> Self {
        let config = TrackerConfig::default()
            .with_airborne_interval(Duration::from_secs(60))
            .with_landing_interval(Duration::from_secs(30));
        let status = ScriptedStatus::default();
        let itinerary = ScriptedItinerary::default();
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(), local_hour);
        let (notifier, notifications) = ChannelNotifier::new();

        let (tracker, handle) = FlightTracker::new(
            config,
            status.clone(),
            itinerary.clone(),
            Arc::new(notifier),
            Arc::new(clock.clone()),
        );
        let shutdown = CancellationToken::new();
        let task = tracker.start(shutdown.clone());

        Self {
            handle,
            notifications,
            status,
            itinerary,
            clock,
            shutdown,
            task,
        }
    }

    /// Wait for the next notification, letting paused time run forward.
    async fn next_notification(&mut self) -> Notification {
        tokio::time::timeout(Duration::from_secs(6 * 3600), self.notifications.recv())
            .await
            .expect("no notification within six hours")
            .expect("notification channel closed")
    }

    /// Notifications already delivered, without waiting.
    fn drain(&mut self) -> Vec<Notification> {
        let mut delivered = Vec::new();
        while let Ok(notification) = self.notifications.try_recv() {
            delivered.push(notification);
        }
        delivered
    }

    async fn state_of(&self, identifier: &str) -> Option<FlightState> {
        self.handle
            .snapshot(identifier)
            .await
            .unwrap()
            .map(|record| record.state)
    }

    async fn stop(self) {
        self.shutdown.cancel();
        self.task.await.unwrap();
    }
}

fn reporting(hex: &str, registration: Option<&str>, altitude: Altitude) -> StatusSnapshot {
    StatusSnapshot {
        primary_code: Some(hex.to_string()),
        secondary_code: registration.map(str::to_string),
        flight_number: Some("EJA621".to_string()),
        positions: vec![Position::at(altitude)],
    }
}

fn cruising(hex: &str, registration: Option<&str>) -> StatusSnapshot {
    reporting(hex, registration, Altitude::Feet(5000.0))
}

fn on_ground(hex: &str, registration: Option<&str>) -> StatusSnapshot {
    reporting(hex, registration, Altitude::Ground)
}

fn itinerary(estimated_on: Option<String>) -> ItinerarySnapshot {
    ItinerarySnapshot {
        origin_name: Some("Teterboro".to_string()),
        destination_name: Some("Palm Beach Intl".to_string()),
        estimated_on,
        status: Some("En Route / On Time".to_string()),
    }
}

fn is_airborne(notification: &Notification) -> bool {
    matches!(notification, Notification::Airborne { .. })
}

// ============================================================================
// Lifecycle
// ============================================================================

/// A one-shot hex flight is announced airborne, then landed once the feed
/// goes silent, and is dropped from tracking.
#[tokio::test(start_paused = true)]
async fn test_one_shot_flight_lifecycle() {
    let mut h = Harness::start();
    h.status.set("a1013f", Ok(cruising("a1013f", None)));

    let confirmation = h.handle.add("A1013F", IdentifierKind::Hex, false).await.unwrap();
    assert_eq!(confirmation.identifier, "a1013f");
    assert!(matches!(h.next_notification().await, Notification::Added { .. }));

    let airborne = h.next_notification().await;
    assert_eq!(
        airborne,
        Notification::Airborne {
            flight: "a1013f".to_string(),
            origin: None,
            destination: None,
            estimated_landing: None,
        }
    );
    assert_eq!(h.itinerary.calls(), 0, "no registration, no itinerary lookup");

    h.status.set("a1013f", Ok(StatusSnapshot::silent()));

    assert_eq!(
        h.next_notification().await,
        Notification::Landed {
            flight: "a1013f".to_string()
        }
    );
    assert_eq!(
        h.next_notification().await,
        Notification::Removed {
            identifier: "a1013f".to_string()
        }
    );

    assert!(h.handle.list().await.unwrap().is_empty());
    assert_eq!(h.state_of("a1013f").await, None);

    // Nothing polls a removed flight.
    let calls = h.status.calls();
    tokio::time::sleep(Duration::from_secs(600)).await;
    assert_eq!(h.status.calls(), calls);

    h.stop().await;
}

/// A recurring registration stays tracked after landing and is announced
/// again on its next takeoff.
#[tokio::test(start_paused = true)]
async fn test_recurring_flight_is_announced_again() {
    let mut h = Harness::start();
    h.status.set("N621MM", Ok(on_ground("a1013f", Some("N621MM"))));
    h.itinerary.set(Some(itinerary(None)));

    h.handle
        .add("n621mm", IdentifierKind::Registration, true)
        .await
        .unwrap();
    match h.next_notification().await {
        Notification::Added {
            identifier,
            assigned,
            reporting,
        } => {
            assert_eq!(identifier, "N621MM");
            assert_eq!(assigned, vec!["N621MM".to_string(), "a1013f".to_string()]);
            assert!(reporting);
        }
        other => panic!("expected Added, got {:?}", other),
    }

    tokio::time::sleep(Duration::from_secs(2)).await;
    assert_eq!(
        h.state_of("N621MM").await,
        Some(FlightState::Grounded { landed: false })
    );

    h.status.set("N621MM", Ok(cruising("a1013f", Some("N621MM"))));
    match h.next_notification().await {
        Notification::Airborne {
            flight,
            origin,
            destination,
            ..
        } => {
            assert_eq!(flight, "a1013f");
            assert_eq!(origin.as_deref(), Some("Teterboro"));
            assert_eq!(destination.as_deref(), Some("Palm Beach Intl"));
        }
        other => panic!("expected Airborne, got {:?}", other),
    }

    h.status.set("N621MM", Ok(on_ground("a1013f", Some("N621MM"))));
    assert!(matches!(h.next_notification().await, Notification::Landed { .. }));

    let tracked = h.handle.list().await.unwrap();
    assert_eq!(tracked.len(), 1);
    assert!(tracked[0].recurring);
    let record = h.handle.snapshot("a1013f").await.unwrap().unwrap();
    assert_eq!(record.state, FlightState::Grounded { landed: true });
    assert_eq!(record.itinerary, None);

    h.status.set("N621MM", Ok(cruising("a1013f", Some("N621MM"))));
    assert!(is_airborne(&h.next_notification().await));
    assert_eq!(h.itinerary.calls(), 2, "itinerary is fetched again per flight");

    h.stop().await;
}

// ============================================================================
// Landing check timing
// ============================================================================

/// Without an estimated landing time the first landing check runs a couple
/// of seconds after takeoff.
#[tokio::test(start_paused = true)]
async fn test_landing_check_without_eta_runs_immediately() {
    let mut h = Harness::start();
    h.status.set("N621MM", Ok(cruising("a1013f", Some("N621MM"))));
    h.itinerary.set(Some(itinerary(None)));

    h.handle
        .add("N621MM", IdentifierKind::Registration, false)
        .await
        .unwrap();
    h.next_notification().await;

    assert!(is_airborne(&h.next_notification().await));
    let airborne_at = Instant::now();
    h.status.set("N621MM", Ok(on_ground("a1013f", Some("N621MM"))));

    assert!(matches!(h.next_notification().await, Notification::Landed { .. }));
    assert!(airborne_at.elapsed() <= Duration::from_secs(5));

    h.stop().await;
}

/// A future estimated landing time defers the first landing check.
#[tokio::test(start_paused = true)]
async fn test_landing_check_waits_for_eta() {
    let mut h = Harness::start();
    let eta = h.clock.now_utc() + chrono::Duration::hours(1);
    h.status.set("N621MM", Ok(cruising("a1013f", Some("N621MM"))));
    h.itinerary
        .set(Some(itinerary(Some(eta.format("%Y-%m-%dT%H:%M:%SZ").to_string()))));

    h.handle
        .add("N621MM", IdentifierKind::Registration, false)
        .await
        .unwrap();
    h.next_notification().await;

    match h.next_notification().await {
        Notification::Airborne {
            estimated_landing, ..
        } => assert_eq!(estimated_landing, Some(eta)),
        other => panic!("expected Airborne, got {:?}", other),
    }
    let airborne_at = Instant::now();
    h.status.set("N621MM", Ok(on_ground("a1013f", Some("N621MM"))));

    tokio::time::sleep(Duration::from_secs(600)).await;
    assert!(h.drain().is_empty(), "landing checked before the ETA");
    assert_eq!(h.state_of("N621MM").await, Some(FlightState::Airborne));

    assert!(matches!(h.next_notification().await, Notification::Landed { .. }));
    assert!(airborne_at.elapsed() >= Duration::from_secs(3600));

    h.stop().await;
}

// ============================================================================
// Active window and idempotence
// ============================================================================

/// Outside active hours takeoff checks neither poll nor change state.
#[tokio::test(start_paused = true)]
async fn test_no_polling_outside_active_hours() {
    let mut h = Harness::start_at_hour(3);
    h.status.set("a1013f", Ok(cruising("a1013f", None)));

    h.handle.add("a1013f", IdentifierKind::Hex, false).await.unwrap();
    h.next_notification().await;
    let calls_after_add = h.status.calls();

    tokio::time::sleep(Duration::from_secs(600)).await;

    assert_eq!(h.status.calls(), calls_after_add);
    assert!(h.drain().is_empty());
    assert_eq!(h.state_of("a1013f").await, Some(FlightState::Unresolved));

    h.clock.set_local_hour(7);
    assert!(is_airborne(&h.next_notification().await));

    h.stop().await;
}

/// A flight that stays airborne is announced once and enriched once.
#[tokio::test(start_paused = true)]
async fn test_takeoff_is_announced_once() {
    let mut h = Harness::start();
    h.status.set("N621MM", Ok(cruising("a1013f", Some("N621MM"))));
    h.itinerary.set(Some(itinerary(None)));

    h.handle
        .add("N621MM", IdentifierKind::Registration, false)
        .await
        .unwrap();
    h.next_notification().await;
    assert!(is_airborne(&h.next_notification().await));

    tokio::time::sleep(Duration::from_secs(1800)).await;

    let later = h.drain();
    assert!(
        !later.iter().any(is_airborne),
        "unexpected repeat announcement: {:?}",
        later
    );
    assert_eq!(h.itinerary.calls(), 1);
    assert_eq!(h.state_of("N621MM").await, Some(FlightState::Airborne));

    h.stop().await;
}

/// A failing poll for one flight does not hold up the others.
#[tokio::test(start_paused = true)]
async fn test_poll_failure_is_isolated() {
    let mut h = Harness::start();
    h.status.set("a1013f", Ok(on_ground("a1013f", None)));
    h.status.set("c0ffee", Ok(on_ground("c0ffee", None)));

    h.handle.add("a1013f", IdentifierKind::Hex, false).await.unwrap();
    h.handle.add("c0ffee", IdentifierKind::Hex, false).await.unwrap();
    assert_eq!(h.drain().len(), 2);

    h.status.set("a1013f", Err(ProviderError::unreachable("connection reset")));
    h.status.set("c0ffee", Ok(cruising("c0ffee", None)));

    match h.next_notification().await {
        Notification::Airborne { flight, .. } => assert_eq!(flight, "c0ffee"),
        other => panic!("expected Airborne, got {:?}", other),
    }
    assert_eq!(h.handle.list().await.unwrap().len(), 2);

    h.stop().await;
}

// ============================================================================
// Commands
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_remove_and_not_tracked() {
    let mut h = Harness::start();
    h.status.set("a1013f", Ok(on_ground("a1013f", None)));
    h.handle.add("a1013f", IdentifierKind::Hex, false).await.unwrap();
    h.drain();

    let removed = h.handle.remove("a1013f").await.unwrap();
    assert_eq!(removed.message, "Removing ID: [a1013f] from list");
    assert_eq!(
        h.drain(),
        vec![Notification::Removed {
            identifier: "a1013f".to_string()
        }]
    );

    assert_eq!(
        h.handle.remove("a1013f").await,
        Err(CommandError::NotTracked("a1013f".to_string()))
    );
    assert_eq!(
        h.drain(),
        vec![Notification::NotTracked {
            identifier: "a1013f".to_string()
        }]
    );

    h.stop().await;
}

/// Removing an airborne flight stops its landing checks; no landing is
/// ever announced for it.
#[tokio::test(start_paused = true)]
async fn test_remove_airborne_flight_stops_landing_checks() {
    let mut h = Harness::start();
    h.status.set("a1013f", Ok(cruising("a1013f", None)));
    h.handle.add("a1013f", IdentifierKind::Hex, false).await.unwrap();
    h.next_notification().await;
    assert!(is_airborne(&h.next_notification().await));

    h.handle.remove("a1013f").await.unwrap();
    assert_eq!(
        h.drain(),
        vec![Notification::Removed {
            identifier: "a1013f".to_string()
        }]
    );

    h.status.set("a1013f", Ok(on_ground("a1013f", None)));
    let calls = h.status.calls();
    tokio::time::sleep(Duration::from_secs(30 * 5)).await;

    assert_eq!(h.status.calls(), calls);
    assert!(h.drain().is_empty());
    assert_eq!(h.state_of("a1013f").await, None);

    h.stop().await;
}

/// Re-adding an airborne flight replaces its record and entry. The old
/// landing timer stops, and the registration stays on the old record.
#[tokio::test(start_paused = true)]
async fn test_re_add_replaces_record_and_landing_timer() {
    let mut h = Harness::start();
    h.status.set("a1013f", Ok(cruising("a1013f", Some("N621MM"))));
    h.handle.add("a1013f", IdentifierKind::Hex, false).await.unwrap();
    h.next_notification().await;
    assert!(is_airborne(&h.next_notification().await));
    assert_eq!(h.state_of("N621MM").await, Some(FlightState::Airborne));

    h.handle.add("a1013f", IdentifierKind::Hex, true).await.unwrap();
    match h.next_notification().await {
        Notification::Added {
            identifier,
            assigned,
            ..
        } => {
            assert_eq!(identifier, "a1013f");
            assert_eq!(assigned, vec!["a1013f".to_string()]);
        }
        other => panic!("expected Added, got {:?}", other),
    }
    h.status.set("a1013f", Ok(on_ground("a1013f", Some("N621MM"))));

    assert_eq!(h.state_of("a1013f").await, Some(FlightState::Unresolved));
    assert_eq!(h.state_of("N621MM").await, Some(FlightState::Airborne));

    tokio::time::sleep(Duration::from_secs(150)).await;

    let later = h.drain();
    assert!(
        !later
            .iter()
            .any(|n| matches!(n, Notification::Landed { .. })),
        "old landing timer still running: {:?}",
        later
    );
    assert_eq!(
        h.state_of("a1013f").await,
        Some(FlightState::Grounded { landed: false })
    );
    assert_eq!(h.state_of("N621MM").await, Some(FlightState::Airborne));

    let tracked = h.handle.list().await.unwrap();
    assert_eq!(tracked.len(), 1);
    assert!(tracked[0].recurring);

    h.stop().await;
}

/// Remove and snapshot accept any identifier the record is known by.
#[tokio::test(start_paused = true)]
async fn test_commands_by_alias() {
    let mut h = Harness::start();
    h.status.set("N621MM", Ok(on_ground("a1013f", Some("N621MM"))));
    h.handle
        .add("N621MM", IdentifierKind::Registration, true)
        .await
        .unwrap();
    h.drain();

    let record = h.handle.snapshot("A1013F").await.unwrap().unwrap();
    assert_eq!(record.secondary_code.as_deref(), Some("N621MM"));

    let removed = h.handle.remove("a1013f").await.unwrap();
    assert_eq!(removed.identifier, "N621MM");
    assert!(h.handle.list().await.unwrap().is_empty());
    assert_eq!(h.handle.snapshot("a1013f").await.unwrap(), None);
    assert_eq!(h.handle.snapshot("N621MM").await.unwrap(), None);

    h.stop().await;
}

/// A provider failure during add refuses the add.
#[tokio::test(start_paused = true)]
async fn test_add_provider_failure() {
    let mut h = Harness::start();
    h.status.set("ffffff", Err(ProviderError::rate_limited("quota exceeded")));

    let err = h.handle.add("ffffff", IdentifierKind::Hex, false).await.unwrap_err();
    assert!(matches!(err, CommandError::Provider { ref identifier, .. } if identifier == "ffffff"));

    match h.next_notification().await {
        Notification::AddFailed { identifier, reason } => {
            assert_eq!(identifier, "ffffff");
            assert!(reason.contains("quota exceeded"));
        }
        other => panic!("expected AddFailed, got {:?}", other),
    }
    assert!(h.handle.list().await.unwrap().is_empty());

    h.stop().await;
}

/// A flight that is not broadcasting is still tracked, and picked up once
/// it takes off.
#[tokio::test(start_paused = true)]
async fn test_silent_flight_is_tracked() {
    let mut h = Harness::start();

    h.handle.add("a1013f", IdentifierKind::Hex, false).await.unwrap();
    match h.next_notification().await {
        Notification::Added { reporting, .. } => assert!(!reporting),
        other => panic!("expected Added, got {:?}", other),
    }
    assert_eq!(h.handle.list().await.unwrap().len(), 1);

    h.status.set("a1013f", Ok(cruising("a1013f", None)));
    assert!(is_airborne(&h.next_notification().await));

    h.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_handle_reports_stopped_after_shutdown() {
    let h = Harness::start();
    let handle = h.handle.clone();
    h.stop().await;

    assert_eq!(handle.list().await, Err(CommandError::Stopped));
}
