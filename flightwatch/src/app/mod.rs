//! Application bootstrap and lifecycle management.
//!
//! This module provides the `FlightWatchApp` type which handles
//! initialization sequencing and graceful shutdown of the tracker.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        FlightWatchApp                            │
//! │                                                                  │
//! │  1. AsyncReqwestClient ──┬──► AdsbExchangeProvider (status)      │
//! │                          ├──► AeroApiProvider (itinerary)        │
//! │                          └──► WebhookNotifier (if configured)    │
//! │                                                                  │
//! │  2. FlightTracker task ◄──── TrackerHandle (commands)            │
//! │                                                                  │
//! │  3. Startup flights ─────► TrackerHandle::add                    │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use flightwatch::app::{AppConfig, FlightWatchApp};
//!
//! // Start the application
//! let app = FlightWatchApp::start(config).await?;
//!
//! // Send commands
//! let tracked = app.handle().list().await?;
//!
//! // Graceful shutdown
//! app.shutdown().await;
//! ```

mod bootstrap;
mod config;
mod error;

pub use bootstrap::FlightWatchApp;
pub use config::{AppConfig, ItineraryEndpoint, StatusEndpoint};
pub use error::AppError;
