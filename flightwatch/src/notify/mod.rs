//! Outbound notifications.
//!
//! The tracker hands every [`Notification`] to a [`Notifier`] and moves on.
//! Delivery is fire-and-forget: a sink that fails logs the failure and
//! never reports it back.
//!
//! Sinks:
//!
//! - [`LogNotifier`] - writes notifications to the log
//! - [`ChannelNotifier`] - forwards them to an in-process receiver
//! - [`WebhookNotifier`] - posts `{"text": ...}` to a URL
//! - [`FanoutNotifier`] - delivers to several sinks

mod message;

pub use message::Notification;

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::provider::AsyncHttpClient;

/// Destination for notifications.
pub trait Notifier: Send + Sync {
    /// Deliver a notification. Must not block.
    fn notify(&self, notification: &Notification);
}

/// Writes notifications to the log at `info` level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: &Notification) {
        info!(text = %notification, "Notification");
    }
}

/// Forwards notifications over an unbounded channel.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    tx: mpsc::UnboundedSender<Notification>,
}

impl ChannelNotifier {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Notifier for ChannelNotifier {
    fn notify(&self, notification: &Notification) {
        if self.tx.send(notification.clone()).is_err() {
            debug!("Notification receiver dropped");
        }
    }
}

#[derive(Serialize)]
struct WebhookPayload<'a> {
    text: &'a str,
}

/// Posts each notification as JSON to a webhook.
pub struct WebhookNotifier<C: AsyncHttpClient + 'static> {
    http_client: Arc<C>,
    url: String,
}

impl<C: AsyncHttpClient + 'static> WebhookNotifier<C> {
    pub fn new(http_client: Arc<C>, url: impl Into<String>) -> Self {
        Self {
            http_client,
            url: url.into(),
        }
    }
}

impl<C: AsyncHttpClient + 'static> Notifier for WebhookNotifier<C> {
    fn notify(&self, notification: &Notification) {
        let text = notification.text();
        let body = match serde_json::to_string(&WebhookPayload { text: &text }) {
            Ok(body) => body,
            Err(e) => {
                warn!(error = %e, "Failed to encode notification");
                return;
            }
        };

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            warn!(text = %text, "No async runtime, notification dropped");
            return;
        };

        let client = Arc::clone(&self.http_client);
        let url = self.url.clone();
        runtime.spawn(async move {
            match client.post_json(&url, &body).await {
                Ok(_) => debug!(url = %url, "Notification delivered"),
                Err(e) => warn!(url = %url, error = %e, "Notification delivery failed"),
            }
        });
    }
}

/// Delivers every notification to each inner sink in order.
#[derive(Default, Clone)]
pub struct FanoutNotifier {
    sinks: Vec<Arc<dyn Notifier>>,
}

impl FanoutNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, sink: Arc<dyn Notifier>) -> Self {
        self.sinks.push(sink);
        self
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl Notifier for FanoutNotifier {
    fn notify(&self, notification: &Notification) {
        for sink in &self.sinks {
            sink.notify(notification);
        }
    }
}
