//! FlightWatch CLI - Command-line interface
//!
//! This binary runs the flight tracker with an interactive console, and
//! offers one-shot helpers for setting up and checking aircraft.

mod commands;
mod console;
mod error;
mod runner;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use flightwatch::config::FlightSeed;
use flightwatch::provider::IdentifierKind;

use commands::run::RunArgs;
use commands::status::StatusArgs;

/// Identifier type selection for CLI arguments.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq)]
enum KindArg {
    /// ICAO 24-bit transponder address, e.g. a1013f
    Hex,
    /// Tail number, e.g. N621MM
    Reg,
}

impl From<KindArg> for IdentifierKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Hex => IdentifierKind::Hex,
            KindArg::Reg => IdentifierKind::Registration,
        }
    }
}

#[derive(Parser)]
#[command(name = "flightwatch")]
#[command(version, about = "Get notified when the aircraft you follow take off and land", long_about = None)]
struct Cli {
    /// Config file (default: ~/.flightwatch/config.ini)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or update the configuration file
    Init,

    /// Track flights until Ctrl+C
    Run {
        /// Flight to track from startup, as id:kind[:recurring] (repeatable)
        #[arg(long = "track", value_name = "ID:KIND[:recurring]", value_parser = parse_seed)]
        track: Vec<FlightSeed>,

        /// Do not mirror log output to stdout
        #[arg(long)]
        no_stdout: bool,

        /// Do not read commands from stdin
        #[arg(long)]
        no_console: bool,
    },

    /// Look up an aircraft once and print what the feed reports
    Status {
        /// Hex code or registration
        identifier: String,

        /// Identifier type
        #[arg(long, value_enum, default_value = "hex")]
        kind: KindArg,
    },
}

fn parse_seed(value: &str) -> Result<FlightSeed, String> {
    value.parse()
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init => commands::init::run(cli.config),
        Commands::Run {
            track,
            no_stdout,
            no_console,
        } => commands::run::run(RunArgs {
            config: cli.config,
            track,
            debug: cli.debug,
            no_stdout,
            no_console,
        }),
        Commands::Status { identifier, kind } => commands::status::run(StatusArgs {
            config: cli.config,
            identifier,
            kind: kind.into(),
            debug: cli.debug,
        }),
    };

    if let Err(e) = result {
        e.exit();
    }
}
