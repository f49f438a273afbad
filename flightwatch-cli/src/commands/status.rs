//! Status command - look up one aircraft once and classify it.

use std::path::PathBuf;
use std::time::Duration;

use flightwatch::config::{ConfigFileError, ENV_ADSB_API_KEY};
use flightwatch::flight::Reading;
use flightwatch::provider::{
    AdsbExchangeProvider, Altitude, AsyncReqwestClient, IdentifierKind, StatusProvider,
    StatusSnapshot,
};

use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the status command.
pub struct StatusArgs {
    pub config: Option<PathBuf>,
    pub identifier: String,
    pub kind: IdentifierKind,
    pub debug: bool,
}

/// Run the status command.
pub fn run(args: StatusArgs) -> Result<(), CliError> {
    let runner = CliRunner::new(args.config, false, args.debug)?;
    runner.log_startup("status");
    let config = runner.config();

    let api_key = config
        .status
        .api_key
        .clone()
        .ok_or_else(|| ConfigFileError::MissingCredential {
            section: "status".to_string(),
            key: "api_key".to_string(),
            env: ENV_ADSB_API_KEY.to_string(),
        })?;
    let identifier = args.kind.normalize(&args.identifier);

    let http =
        AsyncReqwestClient::with_timeout(Duration::from_secs(config.schedule.request_timeout))?;
    let provider = AdsbExchangeProvider::new(http, api_key)
        .with_endpoint(config.status.base_url.clone(), config.status.api_host.clone());

    let runtime = runner.runtime()?;
    let snapshot = runtime.block_on(provider.fetch_status(&identifier, args.kind))?;

    println!(
        "{}",
        describe(&identifier, &snapshot, config.schedule.ground_altitude)
    );
    Ok(())
}

/// Human readable summary of a status lookup.
fn describe(identifier: &str, snapshot: &StatusSnapshot, ground_altitude: f64) -> String {
    let mut lines = vec![format!("ID: {}", identifier)];

    if let Some(hex) = &snapshot.primary_code {
        lines.push(format!("  Hex:          {}", hex));
    }
    if let Some(registration) = &snapshot.secondary_code {
        lines.push(format!("  Registration: {}", registration));
    }
    if let Some(flight_number) = &snapshot.flight_number {
        lines.push(format!("  Flight:       {}", flight_number));
    }
    match snapshot.altitude() {
        Some(Altitude::Ground) => lines.push("  Altitude:     ground".to_string()),
        Some(Altitude::Feet(feet)) => lines.push(format!("  Altitude:     {:.0} ft", feet)),
        None => {}
    }

    let status = match Reading::from_snapshot(snapshot, ground_altitude) {
        Reading::Silent => "not broadcasting",
        Reading::Unknown => "broadcasting, altitude unknown",
        Reading::Ground => "on the ground",
        Reading::Airborne => "in the air",
    };
    lines.push(format!("  Status:       {}", status));
    lines.join("\n")
}
