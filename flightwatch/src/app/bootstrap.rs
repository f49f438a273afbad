//! Application bootstrap implementation.
//!
//! This module contains `FlightWatchApp`, which wires the provider clients,
//! the notification sinks and the flight tracker together and owns the
//! tracker task until shutdown.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::config::AppConfig;
use super::error::AppError;
use crate::config::FlightSeed;
use crate::notify::{FanoutNotifier, LogNotifier, Notifier, WebhookNotifier};
use crate::provider::{AdsbExchangeProvider, AeroApiProvider, AsyncReqwestClient};
use crate::scheduler::{FlightTracker, TrackerHandle};
use crate::time::SystemClock;

/// FlightWatch application with service lifecycle management.
///
/// Services are started in this order:
/// 1. HTTP client and provider adapters
/// 2. Notification sinks
/// 3. The flight tracker task
/// 4. Startup flights, added through the normal command path
///
/// # Example
///
/// ```ignore
/// use flightwatch::app::{AppConfig, FlightWatchApp};
///
/// let config = AppConfig::from_config_file(&file)?;
/// let app = FlightWatchApp::start(config).await?;
///
/// app.handle().add("N621MM", IdentifierKind::Registration, true).await?;
///
/// // Later: graceful shutdown
/// app.shutdown().await;
/// ```
pub struct FlightWatchApp {
    handle: TrackerHandle,
    shutdown: CancellationToken,
    tracker_task: JoinHandle<()>,
}

impl FlightWatchApp {
    /// Start the application with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub async fn start(config: AppConfig) -> Result<Self, AppError> {
        Self::start_with_sink(config, None).await
    }

    /// Start the application with an extra notification sink.
    ///
    /// Every notification goes to the configured destination and to `sink`.
    pub async fn start_with_sink(
        config: AppConfig,
        sink: Option<Arc<dyn Notifier>>,
    ) -> Result<Self, AppError> {
        let http = AsyncReqwestClient::with_timeout(config.http_timeout())?;

        let status = AdsbExchangeProvider::new(http.clone(), config.status.api_key.clone())
            .with_endpoint(config.status.base_url.clone(), config.status.api_host.clone());
        let itinerary = AeroApiProvider::new(http.clone(), config.itinerary.api_key.clone())
            .with_base_url(config.itinerary.base_url.clone());

        let notifier = build_notifier(&config, http, sink);

        let shutdown = CancellationToken::new();
        let (tracker, handle) = FlightTracker::new(
            config.tracker.clone(),
            status,
            itinerary,
            notifier,
            Arc::new(SystemClock),
        );
        let tracker_task = tracker.start(shutdown.clone());

        info!(
            flights = config.flights.len(),
            webhook = config.webhook_url.is_some(),
            "FlightWatch started"
        );

        seed_flights(&handle, &config.flights).await;

        Ok(Self {
            handle,
            shutdown,
            tracker_task,
        })
    }

    /// Handle for sending commands to the tracker.
    pub fn handle(&self) -> TrackerHandle {
        self.handle.clone()
    }

    /// Token cancelled when the application shuts down.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Stop the tracker and wait for its task to finish.
    ///
    /// All landing timers are cancelled along with the tracker.
    pub async fn shutdown(self) {
        info!("Shutting down FlightWatch");
        self.shutdown.cancel();
        if let Err(e) = self.tracker_task.await {
            warn!(error = %e, "Flight tracker task ended abnormally");
        }
    }
}

fn build_notifier(
    config: &AppConfig,
    http: AsyncReqwestClient,
    sink: Option<Arc<dyn Notifier>>,
) -> Arc<dyn Notifier> {
    let primary: Arc<dyn Notifier> = match &config.webhook_url {
        Some(url) => Arc::new(WebhookNotifier::new(Arc::new(http), url.clone())),
        None => Arc::new(LogNotifier),
    };

    match sink {
        Some(sink) => Arc::new(FanoutNotifier::new().with(primary).with(sink)),
        None => primary,
    }
}

/// Add the startup flights. Failures are logged and do not stop startup.
async fn seed_flights(handle: &TrackerHandle, flights: &[FlightSeed]) {
    for seed in flights {
        match handle.add(&seed.identifier, seed.kind, seed.recurring).await {
            Ok(confirmation) => {
                info!(identifier = %confirmation.identifier, "Startup flight added")
            }
            Err(e) => warn!(flight = %seed, error = %e, "Could not add startup flight"),
        }
    }
}
