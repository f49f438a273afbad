//! FlightWatch - flight lifecycle tracking for individual aircraft
//!
//! This library follows a list of aircraft, identified by transponder hex
//! code or registration, through an ADS-B status feed. It announces when a
//! tracked aircraft takes off (with route and ETA from an itinerary feed)
//! and when it lands, polling on a schedule within configured active hours.
//!
//! # Modules
//!
//! - [`scheduler`] - the tracker daemon, its timers and command handle
//! - [`flight`] - flight records and the takeoff/landing state machine
//! - [`identity`] - maps every known identifier to a shared flight record
//! - [`registry`] - the list of tracked flights and their landing timers
//! - [`enrichment`] - itinerary lookup and parsing
//! - [`provider`] - ADS-B Exchange and FlightAware clients
//! - [`notify`] - notification text and delivery sinks
//! - [`config`] - `~/.flightwatch/config.ini`
//! - [`app`] - bootstrap and shutdown
//! - [`logging`] - tracing subscriber setup

pub mod app;
pub mod config;
pub mod enrichment;
pub mod flight;
pub mod identity;
pub mod logging;
pub mod notify;
pub mod provider;
pub mod registry;
pub mod scheduler;
pub mod time;
