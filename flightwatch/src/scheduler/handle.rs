//! Command surface of the tracker.
//!
//! Callers never touch tracker state. Each command is queued as an event
//! and answered over a oneshot channel once the tracker has processed it,
//! so commands serialize with the poll timers.

use std::fmt;

use thiserror::Error;
use tokio::sync::{mpsc, oneshot};

use super::timer::TimerId;
use crate::flight::FlightRecord;
use crate::identity::IdentityError;
use crate::provider::{IdentifierKind, ProviderError};
use crate::registry::TrackedFlight;

/// Reply channel for add/remove.
pub(crate) type CommandReply = oneshot::Sender<Result<Confirmation, CommandError>>;

/// Work items processed one at a time by the tracker task.
#[derive(Debug)]
pub(crate) enum TrackerEvent {
    AirborneCheck,
    LandingCheck {
        identifier: String,
        timer_id: TimerId,
    },
    Add {
        identifier: String,
        kind: IdentifierKind,
        recurring: bool,
        reply: Option<CommandReply>,
    },
    Remove {
        identifier: String,
        reply: Option<CommandReply>,
    },
    List {
        reply: oneshot::Sender<Vec<TrackedFlight>>,
    },
    Snapshot {
        identifier: String,
        reply: oneshot::Sender<Option<FlightRecord>>,
    },
}

/// Successful outcome of an add or remove.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
    /// Identifier the command applied to, normalized.
    pub identifier: String,
    /// Human readable confirmation, as sent to the notification sink.
    pub message: String,
}

impl fmt::Display for Confirmation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Reasons an add or remove was refused.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CommandError {
    #[error("no identifier given")]
    EmptyIdentifier,

    #[error("{0}")]
    InvalidKind(String),

    #[error("ID: [{0}] not found in list")]
    NotTracked(String),

    #[error("could not look up {identifier}: {source}")]
    Provider {
        identifier: String,
        #[source]
        source: ProviderError,
    },

    #[error("could not index {identifier}: {source}")]
    Index {
        identifier: String,
        #[source]
        source: IdentityError,
    },

    #[error("flight tracker is not running")]
    Stopped,
}

/// Cloneable handle for sending commands to a running tracker.
#[derive(Debug, Clone)]
pub struct TrackerHandle {
    tx: mpsc::Sender<TrackerEvent>,
}

impl TrackerHandle {
    pub(crate) fn new(tx: mpsc::Sender<TrackerEvent>) -> Self {
        Self { tx }
    }

    /// Start tracking a flight.
    ///
    /// The flight is looked up once so it can be indexed under all of its
    /// identifiers. A provider failure refuses the add; a flight that is
    /// simply not broadcasting is still added.
    pub async fn add(
        &self,
        identifier: &str,
        kind: IdentifierKind,
        recurring: bool,
    ) -> Result<Confirmation, CommandError> {
        if identifier.trim().is_empty() {
            return Err(CommandError::EmptyIdentifier);
        }
        let (reply, rx) = oneshot::channel();
        self.send(TrackerEvent::Add {
            identifier: identifier.to_string(),
            kind,
            recurring,
            reply: Some(reply),
        })
        .await?;
        rx.await.map_err(|_| CommandError::Stopped)?
    }

    /// Stop tracking a flight, by either of its identifiers.
    pub async fn remove(&self, identifier: &str) -> Result<Confirmation, CommandError> {
        if identifier.trim().is_empty() {
            return Err(CommandError::EmptyIdentifier);
        }
        let (reply, rx) = oneshot::channel();
        self.send(TrackerEvent::Remove {
            identifier: identifier.to_string(),
            reply: Some(reply),
        })
        .await?;
        rx.await.map_err(|_| CommandError::Stopped)?
    }

    /// Tracked flights in the order they were added.
    pub async fn list(&self) -> Result<Vec<TrackedFlight>, CommandError> {
        let (reply, rx) = oneshot::channel();
        self.send(TrackerEvent::List { reply }).await?;
        rx.await.map_err(|_| CommandError::Stopped)
    }

    /// Copy of the record an identifier resolves to.
    pub async fn snapshot(&self, identifier: &str) -> Result<Option<FlightRecord>, CommandError> {
        let (reply, rx) = oneshot::channel();
        self.send(TrackerEvent::Snapshot {
            identifier: identifier.to_string(),
            reply,
        })
        .await?;
        rx.await.map_err(|_| CommandError::Stopped)
    }

    /// Whether the tracker has stopped.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    async fn send(&self, event: TrackerEvent) -> Result<(), CommandError> {
        self.tx.send(event).await.map_err(|_| CommandError::Stopped)
    }
}
