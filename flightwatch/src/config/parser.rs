//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! This is the single place where INI key names are mapped to struct
//! fields.

use std::path::PathBuf;

use ini::{Ini, Properties};

use super::file::ConfigFileError;
use super::settings::{ConfigFile, FlightSeed};
use crate::flight::ActiveWindow;

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in the
/// INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [status] section
    if let Some(section) = ini.section(Some("status")) {
        if let Some(v) = non_empty(section, "api_key") {
            config.status.api_key = Some(v.to_string());
        }
        if let Some(v) = non_empty(section, "api_host") {
            config.status.api_host = v.to_string();
        }
        if let Some(v) = non_empty(section, "base_url") {
            config.status.base_url = v.to_string();
        }
    }

    // [itinerary] section
    if let Some(section) = ini.section(Some("itinerary")) {
        if let Some(v) = non_empty(section, "api_key") {
            config.itinerary.api_key = Some(v.to_string());
        }
        if let Some(v) = non_empty(section, "base_url") {
            config.itinerary.base_url = v.to_string();
        }
    }

    // [schedule] section
    if let Some(section) = ini.section(Some("schedule")) {
        let schedule = &mut config.schedule;
        if let Some(v) = section.get("airborne_interval") {
            schedule.airborne_interval = parse_positive_secs("airborne_interval", v)?;
        }
        if let Some(v) = section.get("landing_interval") {
            schedule.landing_interval = parse_positive_secs("landing_interval", v)?;
        }
        if let Some(v) = section.get("request_timeout") {
            schedule.request_timeout = parse_positive_secs("request_timeout", v)?;
        }
        if let Some(v) = section.get("landing_first_delay") {
            schedule.landing_first_delay = parse_secs("landing_first_delay", v)?;
        }
        if let Some(v) = section.get("landing_gap_tolerance") {
            schedule.landing_gap_tolerance = parse_secs("landing_gap_tolerance", v)?;
        }
        if let Some(v) = section.get("active_hours") {
            schedule.active_hours =
                v.parse::<ActiveWindow>()
                    .map_err(|reason| ConfigFileError::InvalidValue {
                        section: "schedule".to_string(),
                        key: "active_hours".to_string(),
                        value: v.to_string(),
                        reason,
                    })?;
        }
        if let Some(v) = section.get("ground_altitude") {
            schedule.ground_altitude = v
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|feet| feet.is_finite())
                .ok_or_else(|| ConfigFileError::InvalidValue {
                    section: "schedule".to_string(),
                    key: "ground_altitude".to_string(),
                    value: v.to_string(),
                    reason: "must be a number (feet)".to_string(),
                })?;
        }
    }

    // [notify] section
    if let Some(section) = ini.section(Some("notify")) {
        if let Some(v) = non_empty(section, "webhook_url") {
            if !v.starts_with("http://") && !v.starts_with("https://") {
                return Err(ConfigFileError::InvalidValue {
                    section: "notify".to_string(),
                    key: "webhook_url".to_string(),
                    value: v.to_string(),
                    reason: "must be an http:// or https:// URL".to_string(),
                });
            }
            config.notify.webhook_url = Some(v.to_string());
        }
    }

    // [tracking] section
    if let Some(section) = ini.section(Some("tracking")) {
        if let Some(v) = section.get("flights") {
            config.tracking.flights = parse_flights(v)?;
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = non_empty(section, "file") {
            config.logging.file = expand_tilde(v);
        }
    }

    Ok(config)
}

/// Parse a comma separated `id:kind[:recurring]` list.
pub(super) fn parse_flights(value: &str) -> Result<Vec<FlightSeed>, ConfigFileError> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| {
            item.parse::<FlightSeed>()
                .map_err(|reason| ConfigFileError::InvalidValue {
                    section: "tracking".to_string(),
                    key: "flights".to_string(),
                    value: item.to_string(),
                    reason,
                })
        })
        .collect()
}

fn non_empty<'a>(section: &'a Properties, key: &str) -> Option<&'a str> {
    section.get(key).map(str::trim).filter(|v| !v.is_empty())
}

fn parse_secs(key: &str, value: &str) -> Result<u64, ConfigFileError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigFileError::InvalidValue {
            section: "schedule".to_string(),
            key: key.to_string(),
            value: value.to_string(),
            reason: "must be a whole number of seconds".to_string(),
        })
}

fn parse_positive_secs(key: &str, value: &str) -> Result<u64, ConfigFileError> {
    match parse_secs(key, value)? {
        0 => Err(ConfigFileError::InvalidValue {
            section: "schedule".to_string(),
            key: key.to_string(),
            value: value.to_string(),
            reason: "must be a positive integer (seconds)".to_string(),
        }),
        secs => Ok(secs),
    }
}

/// Expand a leading `~` to the home directory.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    match path.strip_prefix("~/") {
        Some(rest) => dirs::home_dir()
            .map(|home| home.join(rest))
            .unwrap_or_else(|| PathBuf::from(path)),
        None => PathBuf::from(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::IdentifierKind;

    fn parse(content: &str) -> Result<ConfigFile, ConfigFileError> {
        let ini = Ini::load_from_str(content).unwrap();
        parse_ini(&ini)
    }

    #[test]
    fn test_empty_file_gives_defaults() {
        assert_eq!(parse("").unwrap(), ConfigFile::default());
    }

    #[test]
    fn test_parse_full_file() {
        let config = parse(
            r#"
[status]
api_key = rapid-key
api_host = adsb.example.com
base_url = http://localhost:9000/v2

[itinerary]
api_key = aero-key

[schedule]
airborne_interval = 120
landing_interval = 60
landing_first_delay = 5
request_timeout = 3
landing_gap_tolerance = 600
active_hours = 6-23
ground_altitude = 50

[notify]
webhook_url = https://hooks.example.com/flights

[tracking]
flights = a1013f:hex:recurring, N621MM:reg
"#,
        )
        .unwrap();

        assert_eq!(config.status.api_key.as_deref(), Some("rapid-key"));
        assert_eq!(config.status.api_host, "adsb.example.com");
        assert_eq!(config.itinerary.api_key.as_deref(), Some("aero-key"));
        assert_eq!(config.schedule.airborne_interval, 120);
        assert_eq!(config.schedule.landing_interval, 60);
        assert_eq!(config.schedule.landing_first_delay, 5);
        assert_eq!(config.schedule.request_timeout, 3);
        assert_eq!(config.schedule.landing_gap_tolerance, 600);
        assert_eq!(config.schedule.active_hours, ActiveWindow::new(6, 23));
        assert_eq!(config.schedule.ground_altitude, 50.0);
        assert_eq!(
            config.notify.webhook_url.as_deref(),
            Some("https://hooks.example.com/flights")
        );
        assert_eq!(
            config.tracking.flights,
            vec![
                FlightSeed::new("a1013f", IdentifierKind::Hex, true),
                FlightSeed::new("N621MM", IdentifierKind::Registration, false),
            ]
        );
    }

    #[test]
    fn test_blank_credential_stays_unset() {
        let config = parse("[status]\napi_key =\n").unwrap();
        assert!(config.status.api_key.is_none());
    }

    #[test]
    fn test_zero_interval_is_rejected() {
        let err = parse("[schedule]\nairborne_interval = 0\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigFileError::InvalidValue { ref key, .. } if key == "airborne_interval"
        ));
    }

    #[test]
    fn test_zero_gap_tolerance_is_allowed() {
        let config = parse("[schedule]\nlanding_gap_tolerance = 0\n").unwrap();
        assert_eq!(config.schedule.landing_gap_tolerance, 0);
    }

    #[test]
    fn test_bad_active_hours() {
        let err = parse("[schedule]\nactive_hours = morning\n").unwrap_err();
        assert!(err.to_string().contains("schedule.active_hours"));
    }

    #[test]
    fn test_bad_ground_altitude() {
        assert!(parse("[schedule]\nground_altitude = low\n").is_err());
    }

    #[test]
    fn test_bad_webhook_url() {
        assert!(parse("[notify]\nwebhook_url = hooks.example.com\n").is_err());
    }

    #[test]
    fn test_bad_flight_entry_names_the_entry() {
        let err = parse("[tracking]\nflights = a1013f:hex, N621MM\n").unwrap_err();
        match err {
            ConfigFileError::InvalidValue { value, .. } => assert_eq!(value, "N621MM"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_expand_tilde() {
        assert_eq!(expand_tilde("/var/log/fw.log"), PathBuf::from("/var/log/fw.log"));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_tilde("~/fw.log"), home.join("fw.log"));
        }
    }
}
