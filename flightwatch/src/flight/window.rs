//! Daily active polling window.

use std::fmt;
use std::str::FromStr;

/// Default first active hour (07:00 local).
pub const DEFAULT_ACTIVE_START_HOUR: u32 = 7;

/// Default last active hour (21:59 local).
pub const DEFAULT_ACTIVE_END_HOUR: u32 = 21;

/// Hours of the day during which takeoff checks run.
///
/// Both bounds are inclusive hours. A window whose start is after its end
/// wraps past midnight (`22-5`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveWindow {
    pub start_hour: u32,
    pub end_hour: u32,
}

impl ActiveWindow {
    pub fn new(start_hour: u32, end_hour: u32) -> Self {
        Self {
            start_hour,
            end_hour,
        }
    }

    /// A window covering the whole day.
    pub fn always() -> Self {
        Self::new(0, 23)
    }

    pub fn contains(&self, hour: u32) -> bool {
        if self.start_hour <= self.end_hour {
            (self.start_hour..=self.end_hour).contains(&hour)
        } else {
            hour >= self.start_hour || hour <= self.end_hour
        }
    }
}

impl Default for ActiveWindow {
    fn default() -> Self {
        Self::new(DEFAULT_ACTIVE_START_HOUR, DEFAULT_ACTIVE_END_HOUR)
    }
}

impl fmt::Display for ActiveWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start_hour, self.end_hour)
    }
}

impl FromStr for ActiveWindow {
    type Err = String;

    /// Parse `start-end`, e.g. `7-21`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (start, end) = s
            .split_once('-')
            .ok_or_else(|| "expected start-end hours, e.g. 7-21".to_string())?;

        let parse_hour = |value: &str| -> Result<u32, String> {
            let hour: u32 = value
                .trim()
                .parse()
                .map_err(|_| format!("'{}' is not an hour", value.trim()))?;
            if hour > 23 {
                return Err(format!("hour {} is out of range 0-23", hour));
            }
            Ok(hour)
        };

        Ok(Self::new(parse_hour(start)?, parse_hour(end)?))
    }
}
