//! CLI command implementations.
//!
//! # Command Modules
//!
//! - [`init`] - Configuration initialization
//! - [`run`] - Main command (track flights, interactive console)
//! - [`status`] - One-shot status lookup

pub mod init;
pub mod run;
pub mod status;
