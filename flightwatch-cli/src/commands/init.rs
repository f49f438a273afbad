//! Init command - initialize configuration file.

use std::path::PathBuf;

use flightwatch::config::{config_file_path, ConfigFile, ENV_ADSB_API_KEY, ENV_FLIGHT_AWARE_API_KEY};

use crate::error::CliError;

/// Run the init command.
///
/// An existing file is loaded and written back, which adds any settings
/// introduced since it was created. Nothing is overwritten.
pub fn run(path: Option<PathBuf>) -> Result<(), CliError> {
    let path = path.unwrap_or_else(config_file_path);
    let existed = path.exists();

    let config = ConfigFile::load_from(&path)?;
    config.save_to(&path)?;

    if existed {
        println!("Updated configuration file: {}", path.display());
    } else {
        println!("Created configuration file: {}", path.display());
    }
    println!();

    let status_missing = config.status.api_key.is_none();
    let itinerary_missing = config.itinerary.api_key.is_none();
    if status_missing || itinerary_missing {
        println!("Before running, provide your API keys:");
        if status_missing {
            println!(
                "  ADS-B Exchange:        [status] api_key, or export {}",
                ENV_ADSB_API_KEY
            );
        }
        if itinerary_missing {
            println!(
                "  FlightAware AeroAPI:   [itinerary] api_key, or export {}",
                ENV_FLIGHT_AWARE_API_KEY
            );
        }
        println!();
    }

    println!("Add flights to track from startup under [tracking] flights,");
    println!("e.g. flights = N621MM:reg:recurring, a1013f:hex");
    Ok(())
}
