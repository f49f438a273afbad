//! Flight tracker daemon.
//!
//! The [`FlightTracker`] is a long-running background service that:
//! - Runs a takeoff check over every tracked flight on a fixed period
//! - Runs a landing check per airborne flight until it lands
//! - Applies add/remove commands sent through a [`TrackerHandle`]
//! - Emits a notification for every transition and command
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                          FlightTracker                           │
//! │                                                                  │
//! │  airborne timer ──┐                                              │
//! │  landing timers ──┼──► event queue ──► TrackerState (one at a    │
//! │  TrackerHandle ───┘                     time)                    │
//! │                                           │                      │
//! │                     StatusProvider ◄──────┤                      │
//! │                  EnrichmentResolver ◄─────┤                      │
//! │                            Notifier ◄─────┘                      │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Timers and handles only post events. Every change to the registry, the
//! identity index and the flight records happens inside the loop.
//!
//! # Example
//!
//! ```ignore
//! use flightwatch::scheduler::{FlightTracker, TrackerConfig};
//!
//! let (tracker, handle) = FlightTracker::new(config, status, itinerary, notifier, clock);
//!
//! let shutdown = CancellationToken::new();
//! tokio::spawn(tracker.run(shutdown.clone()));
//!
//! handle.add("a1013f", IdentifierKind::Hex, false).await?;
//! ```

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::config::TrackerConfig;
use super::handle::{TrackerEvent, TrackerHandle};
use super::timer::spawn_recurring;
use super::tracker::TrackerState;
use crate::notify::Notifier;
use crate::provider::{ItineraryProvider, StatusProvider};
use crate::time::Clock;

/// The flight tracker daemon.
///
/// # Type Parameters
///
/// * `S` - Live status provider
/// * `I` - Itinerary provider used for enrichment
pub struct FlightTracker<S, I>
where
    S: StatusProvider + 'static,
    I: ItineraryProvider + 'static,
{
    state: TrackerState<S, I>,
    events_rx: mpsc::Receiver<TrackerEvent>,
}

impl<S, I> FlightTracker<S, I>
where
    S: StatusProvider + 'static,
    I: ItineraryProvider + 'static,
{
    /// Creates a new tracker and the handle for sending it commands.
    ///
    /// # Arguments
    ///
    /// * `config` - Poll periods, active window and thresholds
    /// * `status` - Source of live aircraft status
    /// * `itinerary` - Source of itinerary data
    /// * `notifier` - Destination for notifications
    /// * `clock` - Wall clock used for the active window and ETAs
    pub fn new(
        config: TrackerConfig,
        status: S,
        itinerary: I,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock>,
    ) -> (Self, TrackerHandle) {
        let (events_tx, events_rx) = mpsc::channel(config.channel_capacity.max(1));
        let handle = TrackerHandle::new(events_tx.clone());
        let state = TrackerState::new(config, status, itinerary, notifier, clock, events_tx);

        (Self { state, events_rx }, handle)
    }

    /// Runs the tracker until shutdown is signalled.
    pub async fn run(self, shutdown: CancellationToken) {
        let Self {
            mut state,
            mut events_rx,
        } = self;

        let config = state.config().clone();
        info!(
            airborne_interval_secs = config.airborne_interval.as_secs(),
            landing_interval_secs = config.landing_interval.as_secs(),
            active_window = %config.active_window,
            "Flight tracker starting"
        );

        let airborne_timer = shutdown.child_token();
        spawn_recurring(
            config.airborne_first_delay,
            config.airborne_interval,
            state.events(),
            airborne_timer.clone(),
            || TrackerEvent::AirborneCheck,
        );

        loop {
            if let Some(event) = state.next_pending() {
                state.handle(event).await;
                continue;
            }

            tokio::select! {
                biased;

                _ = shutdown.cancelled() => {
                    info!("Flight tracker shutting down");
                    break;
                }

                event = events_rx.recv() => match event {
                    Some(event) => state.handle(event).await,
                    None => {
                        debug!("Event queue closed");
                        break;
                    }
                },
            }
        }

        airborne_timer.cancel();
        info!("Flight tracker stopped");
    }

    /// Spawn the tracker on the current runtime.
    pub fn start(self, shutdown: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(self.run(shutdown))
    }
}
