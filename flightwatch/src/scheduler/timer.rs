//! Recurring timers that feed the tracker's event queue.
//!
//! A timer never touches tracker state. It is a spawned task that posts an
//! event on every tick until it is cancelled or the queue closes.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Shortest period a timer will tick at.
const MIN_TIMER_PERIOD: Duration = Duration::from_millis(10);

/// Identity of one landing timer instance.
///
/// Replacing a timer gives the new one a fresh id, so a tick already queued
/// by the old timer can be recognised and dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

impl TimerId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Handle to a running per-flight landing timer.
///
/// Cancelled explicitly or when dropped.
#[derive(Debug)]
pub struct LandingTimer {
    id: TimerId,
    cancel: CancellationToken,
}

impl LandingTimer {
    /// Start a landing timer that posts `make_event()` on every tick.
    pub fn spawn<E, F>(
        id: TimerId,
        first_delay: Duration,
        period: Duration,
        events: mpsc::Sender<E>,
        make_event: F,
    ) -> Self
    where
        E: Send + 'static,
        F: Fn() -> E + Send + 'static,
    {
        let cancel = CancellationToken::new();
        spawn_recurring(first_delay, period, events, cancel.clone(), make_event);
        Self { id, cancel }
    }

    /// Wrap an existing token without spawning anything.
    #[cfg(test)]
    pub(crate) fn from_parts(id: TimerId, cancel: CancellationToken) -> Self {
        Self { id, cancel }
    }

    pub fn id(&self) -> TimerId {
        self.id
    }

    pub fn cancel(&self) {
        if !self.cancel.is_cancelled() {
            debug!(timer = %self.id, "Cancelling landing timer");
            self.cancel.cancel();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

impl Drop for LandingTimer {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Spawn a task that posts an event after `first_delay` and then every
/// `period`, until `cancel` fires or the receiver is gone.
pub fn spawn_recurring<E, F>(
    first_delay: Duration,
    period: Duration,
    events: mpsc::Sender<E>,
    cancel: CancellationToken,
    make_event: F,
) -> tokio::task::JoinHandle<()>
where
    E: Send + 'static,
    F: Fn() -> E + Send + 'static,
{
    let period = period.max(MIN_TIMER_PERIOD);
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval_at(Instant::now() + first_delay, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;

                _ = cancel.cancelled() => break,

                _ = ticker.tick() => {
                    if events.send(make_event()).await.is_err() {
                        break;
                    }
                }
            }
        }
    })
}

/// Delay before the first landing check.
///
/// Checks start `min_delay` after takeoff is announced, or at the estimated
/// landing time when that is later. An unknown ETA means no extra wait.
pub fn first_landing_check_delay(
    estimated_landing: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    min_delay: Duration,
) -> Duration {
    estimated_landing
        .and_then(|eta| (eta - now).to_std().ok())
        .map_or(min_delay, |until_eta| until_eta.max(min_delay))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_SECONDS: Duration = Duration::from_secs(2);

    #[test]
    fn test_unknown_eta_uses_min_delay() {
        assert_eq!(first_landing_check_delay(None, Utc::now(), TWO_SECONDS), TWO_SECONDS);
    }

    #[test]
    fn test_past_eta_uses_min_delay() {
        let now = Utc::now();
        let eta = now - chrono::Duration::minutes(3);
        assert_eq!(first_landing_check_delay(Some(eta), now, TWO_SECONDS), TWO_SECONDS);
    }

    #[test]
    fn test_future_eta_waits_until_eta() {
        let now = Utc::now();
        let eta = now + chrono::Duration::minutes(45);
        assert_eq!(
            first_landing_check_delay(Some(eta), now, TWO_SECONDS),
            Duration::from_secs(45 * 60)
        );
    }

    #[test]
    fn test_timer_id_next() {
        assert_eq!(TimerId::new(4).next(), TimerId::new(5));
        assert_eq!(TimerId::new(4).to_string(), "#4");
    }

    #[tokio::test(start_paused = true)]
    async fn test_recurring_timer_ticks_until_cancelled() {
        let (tx, mut rx) = mpsc::channel(8);
        let timer = LandingTimer::spawn(
            TimerId::new(1),
            TWO_SECONDS,
            Duration::from_secs(300),
            tx,
            || "tick",
        );

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(rx.try_recv().is_err(), "no tick before the first delay");

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(rx.recv().await, Some("tick"));

        tokio::time::sleep(Duration::from_secs(300)).await;
        assert_eq!(rx.recv().await, Some("tick"));

        timer.cancel();
        assert!(timer.is_cancelled());
        tokio::time::sleep(Duration::from_secs(600)).await;
        assert_eq!(rx.recv().await, None, "task exits and drops its sender");
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_timer_cancels_it() {
        let (tx, mut rx) = mpsc::channel::<u8>(8);
        let timer = LandingTimer::spawn(TimerId::new(2), TWO_SECONDS, TWO_SECONDS, tx, || 1);

        drop(timer);

        assert_eq!(rx.recv().await, None);
    }
}
