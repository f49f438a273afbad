//! Flight records and their lifecycle.
//!
//! A [`FlightRecord`] holds what is known about one aircraft. It is shared
//! through a [`FlightHandle`] so that both of its identifiers reach the same
//! data. [`takeoff_step`] and [`landing_step`] move it through
//! `Unresolved → Grounded → Airborne → Grounded(landed)`.

mod record;
mod state;
mod window;

pub use record::{FlightHandle, FlightRecord};
pub use state::{
    classify_altitude, landing_step, takeoff_step, FlightState, LandingOutcome, Reading,
    TakeoffOutcome, DEFAULT_GROUND_ALTITUDE_FT,
};
pub use window::{ActiveWindow, DEFAULT_ACTIVE_END_HOUR, DEFAULT_ACTIVE_START_HOUR};
