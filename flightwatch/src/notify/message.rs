//! Notification messages and their text.

use std::fmt;

use chrono::{DateTime, Local, Utc};

const PLANE: char = '\u{2708}';

/// Something worth telling the user about.
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    /// A tracked flight took off.
    Airborne {
        flight: String,
        origin: Option<String>,
        destination: Option<String>,
        /// Only set when the ETA is still ahead.
        estimated_landing: Option<DateTime<Utc>>,
    },
    Landed {
        flight: String,
    },
    /// A flight was added to tracking.
    Added {
        identifier: String,
        /// Identifiers the record was indexed under.
        assigned: Vec<String>,
        /// Whether the feed returned position data when it was added.
        reporting: bool,
    },
    AddFailed {
        identifier: String,
        reason: String,
    },
    Removed {
        identifier: String,
    },
    /// A remove named a flight that is not tracked.
    NotTracked {
        identifier: String,
    },
}

impl Notification {
    /// Text as delivered to the notification sink.
    pub fn text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notification::Airborne {
                flight,
                origin,
                destination,
                estimated_landing,
            } => {
                write!(f, "{} Flight {} is in air", PLANE, flight)?;
                if let Some(origin) = origin {
                    write!(f, "\n Origin: {}", origin)?;
                }
                if let Some(destination) = destination {
                    write!(f, "\n Destination: {}", destination)?;
                }
                if let Some(eta) = estimated_landing {
                    let local = eta.with_timezone(&Local);
                    write!(
                        f,
                        "\n Estimated Landing time: {}",
                        local.format("%Y-%m-%d %H:%M %:z")
                    )?;
                }
                Ok(())
            }
            Notification::Landed { flight } => write!(f, "Plane {} has landed!", flight),
            Notification::Added {
                identifier,
                assigned,
                reporting,
            } => {
                write!(f, "Flight checker has added ID: {} to the list!", identifier)?;
                for code in assigned {
                    write!(f, "\n Assigning {}", code)?;
                }
                if !*reporting {
                    write!(f, "\n {} is not broadcasting right now", identifier)?;
                }
                Ok(())
            }
            Notification::AddFailed { identifier, reason } => {
                write!(f, "Could not add ID: {} - {}", identifier, reason)
            }
            Notification::Removed { identifier } => {
                write!(f, "Removing ID: [{}] from list", identifier)
            }
            Notification::NotTracked { identifier } => {
                write!(f, "ID: [{}] not found in list", identifier)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_airborne_with_itinerary() {
        let eta = Utc.with_ymd_and_hms(2024, 5, 1, 17, 42, 0).unwrap();
        let text = Notification::Airborne {
            flight: "a1013f".to_string(),
            origin: Some("Teterboro".to_string()),
            destination: Some("Palm Beach Intl".to_string()),
            estimated_landing: Some(eta),
        }
        .text();

        assert!(text.starts_with("\u{2708} Flight a1013f is in air"));
        assert!(text.contains("\n Origin: Teterboro"));
        assert!(text.contains("\n Destination: Palm Beach Intl"));
        assert!(text.contains("\n Estimated Landing time: "));
    }

    #[test]
    fn test_airborne_without_itinerary_is_one_line() {
        let text = Notification::Airborne {
            flight: "a1013f".to_string(),
            origin: None,
            destination: None,
            estimated_landing: None,
        }
        .text();
        assert_eq!(text, "\u{2708} Flight a1013f is in air");
    }

    #[test]
    fn test_landed() {
        let text = Notification::Landed {
            flight: "a1013f".to_string(),
        }
        .text();
        assert_eq!(text, "Plane a1013f has landed!");
    }

    #[test]
    fn test_added_lists_assigned_codes() {
        let text = Notification::Added {
            identifier: "a1013f".to_string(),
            assigned: vec!["a1013f".to_string(), "N621MM".to_string()],
            reporting: true,
        }
        .text();
        assert_eq!(
            text,
            "Flight checker has added ID: a1013f to the list!\n Assigning a1013f\n Assigning N621MM"
        );
    }

    #[test]
    fn test_added_not_reporting() {
        let text = Notification::Added {
            identifier: "N621MM".to_string(),
            assigned: vec!["N621MM".to_string()],
            reporting: false,
        }
        .text();
        assert!(text.ends_with("N621MM is not broadcasting right now"));
    }

    #[test]
    fn test_remove_texts() {
        assert_eq!(
            Notification::Removed {
                identifier: "a1013f".to_string()
            }
            .text(),
            "Removing ID: [a1013f] from list"
        );
        assert_eq!(
            Notification::NotTracked {
                identifier: "ffffff".to_string()
            }
            .text(),
            "ID: [ffffff] not found in list"
        );
    }
}
