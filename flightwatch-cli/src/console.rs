//! Interactive console for a running tracker.
//!
//! Reads one command per line from stdin. A leading `/` is optional, so
//! `add N621MM reg recurring` and `/add N621MM reg recurring` are the same.
//! Outcomes of add and remove arrive as notifications; the console only
//! prints what no notification covers.

use flightwatch::config::parse_recurring;
use flightwatch::provider::IdentifierKind;
use flightwatch::registry::TrackedFlight;
use flightwatch::scheduler::{CommandError, TrackerHandle};

pub const ADD_USAGE: &str = "Usage: /add <id> <idType(reg, hex)> <recurring>";
pub const REMOVE_USAGE: &str = "Usage: /remove <id>";
pub const LIST_HEADER: &str = "Current list of ids being tracked:";
pub const HELP_TEXT: &str = "Command List: \
    \n /help - Brings up this list \
    \n /add <id> <idType(reg, hex)> <recurring> - Add a flight to the flight tracker, recurring defaults to false \
    \n /remove <id> - Remove a flight from the flight tracker \
    \n /list - List all flights being tracked \
    \n /quit - Stop tracking and exit";

/// A parsed console line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Add {
        identifier: String,
        kind: IdentifierKind,
        recurring: bool,
    },
    Remove {
        identifier: String,
    },
    List,
    Help,
    Quit,
}

/// Parse one input line. Blank lines yield `Ok(None)`.
///
/// Errors carry the text to show the user.
pub fn parse_line(line: &str) -> Result<Option<ConsoleCommand>, String> {
    let mut words = line.split_whitespace();
    let Some(first) = words.next() else {
        return Ok(None);
    };
    let args: Vec<&str> = words.collect();

    let command = match first.trim_start_matches('/').to_lowercase().as_str() {
        "add" => parse_add(&args)?,
        "remove" => match args.first() {
            Some(identifier) => ConsoleCommand::Remove {
                identifier: identifier.to_string(),
            },
            None => return Err(format!("Invalid command format. \n {}", REMOVE_USAGE)),
        },
        "list" => ConsoleCommand::List,
        "help" | "start" => ConsoleCommand::Help,
        "quit" | "exit" => ConsoleCommand::Quit,
        other => {
            return Err(format!(
                "Unknown command '{}'. Type /help for the command list.",
                other
            ))
        }
    };
    Ok(Some(command))
}

fn parse_add(args: &[&str]) -> Result<ConsoleCommand, String> {
    let (identifier, kind) = match args {
        [identifier, kind, ..] => (*identifier, *kind),
        _ => return Err(format!("Invalid command format. \n {}", ADD_USAGE)),
    };
    let kind: IdentifierKind = kind.parse().map_err(|e| format!("{} \n {}", e, ADD_USAGE))?;
    let recurring = match args.get(2) {
        Some(flag) => parse_recurring(flag)
            .ok_or_else(|| format!("'{}' is not a recurring flag. \n {}", flag, ADD_USAGE))?,
        None => false,
    };

    Ok(ConsoleCommand::Add {
        identifier: identifier.to_string(),
        kind,
        recurring,
    })
}

/// Text for the `list` command.
pub fn format_list(flights: &[TrackedFlight]) -> String {
    let mut text = LIST_HEADER.to_string();
    for flight in flights {
        text.push('\n');
        text.push_str(&flight.to_string());
    }
    text
}

/// Run a command against the tracker.
///
/// Returns the text to print, if any.
pub async fn execute(command: ConsoleCommand, handle: &TrackerHandle) -> Option<String> {
    match command {
        ConsoleCommand::Add {
            identifier,
            kind,
            recurring,
        } => handle
            .add(&identifier, kind, recurring)
            .await
            .err()
            .and_then(unreported),
        ConsoleCommand::Remove { identifier } => {
            handle.remove(&identifier).await.err().and_then(unreported)
        }
        ConsoleCommand::List => Some(match handle.list().await {
            Ok(flights) => format_list(&flights),
            Err(e) => e.to_string(),
        }),
        ConsoleCommand::Help => Some(HELP_TEXT.to_string()),
        ConsoleCommand::Quit => None,
    }
}

/// Text for errors the tracker did not already send as a notification.
fn unreported(error: CommandError) -> Option<String> {
    match error {
        CommandError::Provider { .. } | CommandError::Index { .. } | CommandError::NotTracked(_) => {
            None
        }
        other => Some(other.to_string()),
    }
}
