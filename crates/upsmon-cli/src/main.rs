use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tokio::time::{sleep, Instant};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;
use upsmon_core::{
    decode, extract_frame, LineSource, Monitor, MonitorConfig, NotifySendNotifier,
    ReadOutcome, SerialLineSource, SnapshotPublisher, TelemetryRecord, TickOutcome,
};

mod display;
#[cfg(test)]
mod display_tests;

#[derive(Debug, Parser)]
#[command(name = "upsmond")]
#[command(about = "UPS serial battery monitor")]
struct Cli {
    /// Serial port, e.g. /dev/ttyACM0 or COM3
    port: String,

    #[command(subcommand)]
    command: Command,

    #[arg(long, default_value_t = 115200)]
    baud: u32,

    #[arg(long, default_value_t = 1000)]
    read_timeout_ms: u64,

    #[arg(long, default_value_t = 1000)]
    idle_backoff_ms: u64,

    #[arg(long, default_value_t = 300)]
    cooldown_secs: u64,

    #[arg(long, default_value = "./ups_status.json")]
    status_file: String,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Monitor continuously: desktop notifications plus a persisted snapshot.
    Run,
    /// Wait for a single telemetry record, print it and exit.
    Once {
        #[arg(long, value_enum, default_value = "human")]
        format: OutputFormat,
        #[arg(long, default_value_t = 10)]
        wait_secs: u64,
    },
    /// Clear-screen live display, no notifications and no snapshot.
    Watch,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Human,
    Json,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    let config = MonitorConfig {
        read_timeout: Duration::from_millis(cli.read_timeout_ms),
        idle_backoff: Duration::from_millis(cli.idle_backoff_ms),
        notify_cooldown: Duration::from_secs(cli.cooldown_secs),
    };

    let source = SerialLineSource::open(&cli.port, cli.baud, config.read_timeout)
        .with_context(|| format!("cannot open {}", cli.port))?;
    info!(port = %cli.port, baud = cli.baud, "serial port opened");

    match cli.command {
        Command::Run => {
            let publisher = SnapshotPublisher::new(&cli.status_file);
            let mut monitor = Monitor::new(source, NotifySendNotifier, publisher, config);
            run_loop(&mut monitor).await
        }
        Command::Once { format, wait_secs } => {
            read_once(source, Duration::from_secs(wait_secs), format).await
        }
        Command::Watch => watch_loop(source, config.idle_backoff).await,
    }
}

async fn run_loop(
    monitor: &mut Monitor<SerialLineSource, NotifySendNotifier>,
) -> Result<()> {
    let result = loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                warn!("received ctrl-c, stopping");
                break Ok(());
            }
            outcome = monitor.tick() => {
                match outcome {
                    Ok(TickOutcome::Idle) => sleep(monitor.config().idle_backoff).await,
                    Ok(_) => {}
                    Err(err) => break Err(err),
                }
            }
        }
    };

    monitor.shutdown().await?;
    info!(
        lines = monitor.stats().lines_seen,
        records = monitor.stats().records_decoded,
        decode_errors = monitor.stats().decode_errors,
        notifications = monitor.stats().notifications_sent,
        "session ended"
    );

    result.map_err(Into::into)
}

/// Waits up to `wait` for one record, prints it and exits. The original
/// single-reading mode with a bounded overall deadline.
async fn read_once(
    mut source: SerialLineSource,
    wait: Duration,
    format: OutputFormat,
) -> Result<()> {
    let deadline = Instant::now() + wait;

    let record = loop {
        if Instant::now() >= deadline {
            source.close().await?;
            bail!("no telemetry received within {}s", wait.as_secs());
        }

        match source.read_line().await {
            Ok(ReadOutcome::Line(line)) => {
                if let Some(record) = decode_frame_line(&line) {
                    break record;
                }
            }
            Ok(ReadOutcome::Idle) => sleep(Duration::from_millis(100)).await,
            Err(err) => {
                source.close().await?;
                return Err(err.into());
            }
        }
    };
    source.close().await?;

    match format {
        OutputFormat::Human => print!("{}", display::format_record(&record)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&record)?),
    }

    Ok(())
}

async fn watch_loop(mut source: SerialLineSource, idle_backoff: Duration) -> Result<()> {
    let result = loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break Ok(()),
            outcome = source.read_line() => {
                match outcome {
                    Ok(ReadOutcome::Line(line)) => {
                        if let Some(record) = decode_frame_line(&line) {
                            display::render_watch(&record)?;
                        }
                    }
                    Ok(ReadOutcome::Idle) => sleep(idle_backoff).await,
                    Err(err) => break Err(err),
                }
            }
        }
    };

    source.close().await?;
    result.map_err(Into::into)
}

fn decode_frame_line(line: &str) -> Option<TelemetryRecord> {
    let payload = extract_frame(line)?;
    match decode(payload) {
        Ok(record) => Some(record),
        Err(err) => {
            debug!(%err, "skipping malformed frame");
            None
        }
    }
}
