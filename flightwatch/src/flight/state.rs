//! Lifecycle state machine.
//!
//! ```text
//! Unresolved ──ground──► Grounded ──airborne──► Airborne ──ground/silent──► Grounded(landed)
//!      └────────────airborne────────────────────────┘
//! ```
//!
//! Two steps drive it: [`takeoff_step`] runs on every airborne check while
//! the flight is not airborne, [`landing_step`] runs on every landing check
//! while it is. Neither step touches the network; they only interpret a
//! [`StatusSnapshot`] that was already fetched.

use chrono::{DateTime, Duration, Utc};

use super::record::FlightRecord;
use crate::provider::{Altitude, IdentifierKind, StatusSnapshot};

/// Default altitude (feet) below which an aircraft counts as on the ground.
pub const DEFAULT_GROUND_ALTITUDE_FT: f64 = 20.0;

/// Lifecycle state of a flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlightState {
    /// Tracked, but no status confirmed yet.
    Unresolved,
    /// On the ground. `landed` is set when the state was reached by landing.
    Grounded { landed: bool },
    Airborne,
}

impl FlightState {
    pub fn is_airborne(&self) -> bool {
        matches!(self, FlightState::Airborne)
    }
}

impl std::fmt::Display for FlightState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FlightState::Unresolved => f.write_str("unresolved"),
            FlightState::Grounded { landed: true } => f.write_str("landed"),
            FlightState::Grounded { landed: false } => f.write_str("grounded"),
            FlightState::Airborne => f.write_str("airborne"),
        }
    }
}

/// What a single status snapshot says about the aircraft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reading {
    /// No position at all: the aircraft is not broadcasting.
    Silent,
    /// Broadcasting, but without a usable altitude.
    Unknown,
    Ground,
    Airborne,
}

impl Reading {
    /// Interpret a snapshot against the ground-altitude threshold.
    pub fn from_snapshot(snapshot: &StatusSnapshot, ground_altitude: f64) -> Self {
        if !snapshot.is_reporting() {
            return Reading::Silent;
        }
        match snapshot.altitude() {
            Some(altitude) => classify_altitude(altitude, ground_altitude),
            None => Reading::Unknown,
        }
    }
}

/// Classify one altitude reading.
///
/// The ground sentinel and anything below `ground_altitude` is ground.
pub fn classify_altitude(altitude: Altitude, ground_altitude: f64) -> Reading {
    match altitude {
        Altitude::Ground => Reading::Ground,
        Altitude::Feet(feet) if feet < ground_altitude => Reading::Ground,
        Altitude::Feet(_) => Reading::Airborne,
    }
}

/// Result of [`takeoff_step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TakeoffOutcome {
    Unchanged,
    /// The flight just became airborne.
    TookOff,
}

/// Apply an airborne-check reading to a record that is not airborne.
///
/// On takeoff, identifiers the record lacked are adopted from the snapshot.
/// Already airborne records are left alone.
pub fn takeoff_step(
    record: &mut FlightRecord,
    snapshot: &StatusSnapshot,
    ground_altitude: f64,
) -> TakeoffOutcome {
    if record.state.is_airborne() {
        return TakeoffOutcome::Unchanged;
    }

    match Reading::from_snapshot(snapshot, ground_altitude) {
        Reading::Silent | Reading::Unknown => TakeoffOutcome::Unchanged,
        Reading::Ground => {
            if record.state == FlightState::Unresolved {
                record.state = FlightState::Grounded { landed: false };
            }
            TakeoffOutcome::Unchanged
        }
        Reading::Airborne => {
            if let Some(hex) = snapshot.primary_code.as_deref() {
                record.adopt(hex, IdentifierKind::Hex);
            }
            if let Some(registration) = snapshot.secondary_code.as_deref() {
                record.adopt(registration, IdentifierKind::Registration);
            }
            if record.flight_number.is_none() {
                record.flight_number = snapshot.flight_number.clone();
            }
            record.state = FlightState::Airborne;
            record.silent_since = None;
            TakeoffOutcome::TookOff
        }
    }
}

/// Result of [`landing_step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LandingOutcome {
    /// The record was not airborne; nothing to check.
    NotAirborne,
    StillAirborne,
    /// Silent, but not yet for as long as the gap tolerance.
    AwaitingGap,
    Landed,
}

/// Apply a landing-check reading to an airborne record.
///
/// A ground reading lands the flight. Silence lands it too once it has
/// lasted at least `gap_tolerance`; with a zero tolerance the first silent
/// poll lands. An airborne reading resets the silence, and so does a
/// broadcast without an altitude, which never lands the flight.
pub fn landing_step(
    record: &mut FlightRecord,
    snapshot: &StatusSnapshot,
    ground_altitude: f64,
    gap_tolerance: Duration,
    now: DateTime<Utc>,
) -> LandingOutcome {
    if !record.state.is_airborne() {
        return LandingOutcome::NotAirborne;
    }

    match Reading::from_snapshot(snapshot, ground_altitude) {
        Reading::Airborne => {
            record.silent_since = None;
            LandingOutcome::StillAirborne
        }
        Reading::Unknown => {
            record.silent_since = None;
            LandingOutcome::StillAirborne
        }
        Reading::Ground => {
            land(record);
            LandingOutcome::Landed
        }
        Reading::Silent => {
            let since = *record.silent_since.get_or_insert(now);
            if now - since >= gap_tolerance {
                land(record);
                LandingOutcome::Landed
            } else {
                LandingOutcome::AwaitingGap
            }
        }
    }
}

fn land(record: &mut FlightRecord) {
    record.state = FlightState::Grounded { landed: true };
    record.silent_since = None;
    record.clear_itinerary();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::Position;
    use proptest::prelude::*;

    fn snapshot_at(altitude: Altitude) -> StatusSnapshot {
        StatusSnapshot {
            primary_code: Some("a1013f".to_string()),
            secondary_code: Some("N621MM".to_string()),
            flight_number: Some("EJA621".to_string()),
            positions: vec![Position::at(altitude)],
        }
    }

    fn airborne_record() -> FlightRecord {
        let mut record = FlightRecord::seeded("a1013f", IdentifierKind::Hex);
        record.state = FlightState::Airborne;
        record
    }

    proptest! {
        #[test]
        fn prop_below_threshold_is_ground(feet in -2000.0f64..20.0) {
            prop_assert_eq!(
                classify_altitude(Altitude::Feet(feet), DEFAULT_GROUND_ALTITUDE_FT),
                Reading::Ground
            );
        }

        #[test]
        fn prop_at_or_above_threshold_is_airborne(feet in 20.0f64..60000.0) {
            prop_assert_eq!(
                classify_altitude(Altitude::Feet(feet), DEFAULT_GROUND_ALTITUDE_FT),
                Reading::Airborne
            );
        }
    }

    #[test]
    fn test_ground_sentinel_is_ground() {
        assert_eq!(
            classify_altitude(Altitude::Ground, DEFAULT_GROUND_ALTITUDE_FT),
            Reading::Ground
        );
    }

    fn broadcast_without_altitude() -> StatusSnapshot {
        StatusSnapshot {
            primary_code: Some("a1013f".to_string()),
            positions: vec![Position {
                altitude: None,
                latitude: Some(40.85),
                longitude: Some(-74.06),
                ground_speed: Some(412.0),
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_no_positions_is_silent() {
        assert_eq!(
            Reading::from_snapshot(&StatusSnapshot::silent(), 20.0),
            Reading::Silent
        );
    }

    #[test]
    fn test_position_without_altitude_is_unknown() {
        assert_eq!(
            Reading::from_snapshot(&broadcast_without_altitude(), 20.0),
            Reading::Unknown
        );
    }

    #[test]
    fn test_broadcast_without_altitude_does_not_land() {
        let mut record = airborne_record();
        record.silent_since = Some(Utc::now() - Duration::minutes(1));

        let outcome = landing_step(
            &mut record,
            &broadcast_without_altitude(),
            20.0,
            Duration::zero(),
            Utc::now(),
        );

        assert_eq!(outcome, LandingOutcome::StillAirborne);
        assert_eq!(record.state, FlightState::Airborne);
        assert!(record.silent_since.is_none());
    }

    #[test]
    fn test_broadcast_without_altitude_does_not_take_off() {
        let mut record = FlightRecord::seeded("a1013f", IdentifierKind::Hex);
        let outcome = takeoff_step(&mut record, &broadcast_without_altitude(), 20.0);
        assert_eq!(outcome, TakeoffOutcome::Unchanged);
        assert_eq!(record.state, FlightState::Unresolved);
    }

    #[test]
    fn test_takeoff_adopts_missing_registration() {
        let mut record = FlightRecord::seeded("a1013f", IdentifierKind::Hex);

        let outcome = takeoff_step(&mut record, &snapshot_at(Altitude::Feet(5000.0)), 20.0);

        assert_eq!(outcome, TakeoffOutcome::TookOff);
        assert_eq!(record.state, FlightState::Airborne);
        assert_eq!(record.secondary_code.as_deref(), Some("N621MM"));
        assert_eq!(record.flight_number.as_deref(), Some("EJA621"));
    }

    #[test]
    fn test_takeoff_tolerates_withheld_registration() {
        let mut record = FlightRecord::seeded("a1013f", IdentifierKind::Hex);
        let mut snapshot = snapshot_at(Altitude::Feet(5000.0));
        snapshot.secondary_code = None;

        assert_eq!(takeoff_step(&mut record, &snapshot, 20.0), TakeoffOutcome::TookOff);
        assert!(record.secondary_code.is_none());
    }

    #[test]
    fn test_takeoff_is_idempotent_while_airborne() {
        let mut record = FlightRecord::seeded("a1013f", IdentifierKind::Hex);
        let snapshot = snapshot_at(Altitude::Feet(5000.0));

        assert_eq!(takeoff_step(&mut record, &snapshot, 20.0), TakeoffOutcome::TookOff);
        assert_eq!(takeoff_step(&mut record, &snapshot, 20.0), TakeoffOutcome::Unchanged);
    }

    #[test]
    fn test_ground_reading_resolves_but_does_not_take_off() {
        let mut record = FlightRecord::seeded("a1013f", IdentifierKind::Hex);

        let outcome = takeoff_step(&mut record, &snapshot_at(Altitude::Feet(10.0)), 20.0);

        assert_eq!(outcome, TakeoffOutcome::Unchanged);
        assert_eq!(record.state, FlightState::Grounded { landed: false });
    }

    #[test]
    fn test_silent_reading_leaves_state_alone() {
        let mut record = FlightRecord::seeded("a1013f", IdentifierKind::Hex);
        let outcome = takeoff_step(&mut record, &StatusSnapshot::silent(), 20.0);
        assert_eq!(outcome, TakeoffOutcome::Unchanged);
        assert_eq!(record.state, FlightState::Unresolved);
    }

    #[test]
    fn test_landing_on_ground_reading_clears_itinerary() {
        let mut record = airborne_record();
        record.origin = Some("Teterboro".to_string());
        record.itinerary = Some(Default::default());

        let outcome = landing_step(
            &mut record,
            &snapshot_at(Altitude::Ground),
            20.0,
            Duration::zero(),
            Utc::now(),
        );

        assert_eq!(outcome, LandingOutcome::Landed);
        assert_eq!(record.state, FlightState::Grounded { landed: true });
        assert!(record.itinerary.is_none());
        assert!(record.origin.is_none());
    }

    #[test]
    fn test_silence_lands_immediately_with_zero_tolerance() {
        let mut record = airborne_record();
        let outcome = landing_step(
            &mut record,
            &StatusSnapshot::silent(),
            20.0,
            Duration::zero(),
            Utc::now(),
        );
        assert_eq!(outcome, LandingOutcome::Landed);
    }

    #[test]
    fn test_silence_waits_for_gap_tolerance() {
        let mut record = airborne_record();
        let start = Utc::now();
        let tolerance = Duration::minutes(10);
        let silent = StatusSnapshot::silent();

        assert_eq!(
            landing_step(&mut record, &silent, 20.0, tolerance, start),
            LandingOutcome::AwaitingGap
        );
        assert_eq!(
            landing_step(&mut record, &silent, 20.0, tolerance, start + Duration::minutes(5)),
            LandingOutcome::AwaitingGap
        );
        assert_eq!(
            landing_step(&mut record, &silent, 20.0, tolerance, start + Duration::minutes(10)),
            LandingOutcome::Landed
        );
    }

    #[test]
    fn test_airborne_reading_resets_silence() {
        let mut record = airborne_record();
        let start = Utc::now();
        let tolerance = Duration::minutes(10);

        landing_step(&mut record, &StatusSnapshot::silent(), 20.0, tolerance, start);
        let outcome = landing_step(
            &mut record,
            &snapshot_at(Altitude::Feet(3000.0)),
            20.0,
            tolerance,
            start + Duration::minutes(5),
        );

        assert_eq!(outcome, LandingOutcome::StillAirborne);
        assert!(record.silent_since.is_none());
    }

    #[test]
    fn test_landing_step_skips_grounded_record() {
        let mut record = FlightRecord::seeded("a1013f", IdentifierKind::Hex);
        let outcome = landing_step(
            &mut record,
            &snapshot_at(Altitude::Ground),
            20.0,
            Duration::zero(),
            Utc::now(),
        );
        assert_eq!(outcome, LandingOutcome::NotAirborne);
        assert_eq!(record.state, FlightState::Unresolved);
    }
}
