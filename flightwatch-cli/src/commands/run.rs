//! Run command - start the tracker and the interactive console.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use flightwatch::app::{AppConfig, FlightWatchApp};
use flightwatch::config::FlightSeed;
use flightwatch::notify::{ChannelNotifier, Notification};
use flightwatch::scheduler::TrackerHandle;

use crate::console::{self, ConsoleCommand};
use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the run command.
pub struct RunArgs {
    pub config: Option<PathBuf>,
    pub track: Vec<FlightSeed>,
    pub debug: bool,
    pub no_stdout: bool,
    pub no_console: bool,
}

/// Run the run command.
pub fn run(args: RunArgs) -> Result<(), CliError> {
    let runner = CliRunner::new(args.config, !args.no_stdout, args.debug)?;
    runner.log_startup("run");

    let config = AppConfig::from_config_file(runner.config())?.with_flights(args.track);
    let runtime = runner.runtime()?;

    println!("FlightWatch v{}", env!("CARGO_PKG_VERSION"));
    println!(
        "Active hours: {} | Takeoff check every {}s",
        config.tracker.active_window,
        config.tracker.airborne_interval.as_secs()
    );
    if !args.no_console {
        println!("Type /help for commands.");
    }
    println!("Press Ctrl+C to stop");
    println!();

    let shutdown = CancellationToken::new();
    let signal = shutdown.clone();
    ctrlc::set_handler(move || {
        println!();
        println!("Received shutdown signal, stopping...");
        signal.cancel();
    })
    .map_err(|e| CliError::Config(format!("Failed to set signal handler: {}", e)))?;

    runtime.block_on(async move {
        let (sink, notifications) = ChannelNotifier::new();
        let printer = tokio::spawn(print_notifications(notifications));

        let app = FlightWatchApp::start_with_sink(config, Some(Arc::new(sink))).await?;

        if args.no_console {
            shutdown.cancelled().await;
        } else {
            run_console(app.handle(), shutdown.clone()).await;
        }

        app.shutdown().await;
        // The sink closes with the tracker; print what is left.
        if let Err(e) = printer.await {
            warn!(error = %e, "Notification printer ended abnormally");
        }
        Ok::<(), CliError>(())
    })?;

    println!("Stopped.");
    Ok(())
}

async fn print_notifications(mut notifications: mpsc::UnboundedReceiver<Notification>) {
    while let Some(notification) = notifications.recv().await {
        println!("{}", notification);
    }
}

/// Read commands from stdin until quit, end of input or shutdown.
async fn run_console(handle: TrackerHandle, shutdown: CancellationToken) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let line = tokio::select! {
            _ = shutdown.cancelled() => break,
            line = lines.next_line() => line,
        };

        let line = match line {
            Ok(Some(line)) => line,
            Ok(None) => {
                debug!("Console input closed");
                // Keep tracking without a console until Ctrl+C.
                shutdown.cancelled().await;
                break;
            }
            Err(e) => {
                warn!(error = %e, "Failed to read console input");
                shutdown.cancelled().await;
                break;
            }
        };

        match console::parse_line(&line) {
            Ok(None) => {}
            Ok(Some(ConsoleCommand::Quit)) => {
                shutdown.cancel();
                break;
            }
            Ok(Some(command)) => {
                if let Some(reply) = console::execute(command, &handle).await {
                    println!("{}", reply);
                }
            }
            Err(usage) => println!("{}", usage),
        }
    }
}
