//! User configuration.
//!
//! Configuration lives in `~/.flightwatch/config.ini`. A missing file means
//! defaults; provider credentials may also come from the environment.
//!
//! # Example
//!
//! ```ignore
//! use flightwatch::config::ConfigFile;
//!
//! let mut config = ConfigFile::load()?;
//! config.apply_env();
//! config.validate()?;
//! ```

mod defaults;
mod file;
mod parser;
mod settings;
mod writer;

pub use defaults::*;
pub use file::{
    config_directory, config_file_path, ConfigFileError, CONFIG_DIR_NAME, CONFIG_FILE_NAME,
    DEFAULT_LOG_FILE_NAME,
};
pub use settings::{
    parse_recurring, ConfigFile, FlightSeed, ItinerarySettings, LoggingSettings, NotifySettings,
    ScheduleSettings, StatusSettings, TrackingSettings,
};
