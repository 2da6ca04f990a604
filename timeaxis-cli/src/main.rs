use std::fs;

use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use log::{debug, info};
use serde::Serialize;
use timeaxis_ticks::{TickConfig, TimeAxis};

/// Time axis tick generator
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print ticks and labels for a time span
    Ticks {
        /// Start of the span, RFC 3339 or epoch milliseconds
        #[arg(long, allow_hyphen_values = true)]
        start: String,

        /// End of the span (exclusive), RFC 3339 or epoch milliseconds
        #[arg(long, allow_hyphen_values = true)]
        stop: String,

        /// Approximate number of ticks
        #[arg(short, long)]
        count: Option<usize>,

        /// Chart width in pixels, picks the tick count when --count is absent
        #[arg(short, long)]
        width: Option<f32>,

        /// IANA timezone for calendar boundaries and labels (default: UTC)
        #[arg(short, long)]
        timezone: Option<String>,

        /// JSON file with axis settings
        #[arg(long)]
        config: Option<String>,

        /// Emit JSON instead of one tick per line
        #[arg(long)]
        json: bool,
    },
}

#[derive(Serialize)]
struct TickRecord {
    timestamp: i64,
    time: String,
    label: String,
}

fn parse_instant(value: &str) -> Result<DateTime<Utc>> {
    if let Ok(date) = DateTime::parse_from_rfc3339(value) {
        return Ok(date.with_timezone(&Utc));
    }
    let millis: i64 = value
        .parse()
        .with_context(|| format!("Expected RFC 3339 or epoch milliseconds, got {value:?}"))?;
    DateTime::from_timestamp_millis(millis)
        .ok_or_else(|| anyhow!("Timestamp out of range: {millis}"))
}

fn load_config(path: Option<&str>) -> Result<TickConfig> {
    match path {
        Some(path) => {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {path}"))?;
            let config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file {path}"))?;
            debug!("Loaded config from {path}");
            Ok(config)
        }
        None => Ok(TickConfig::default()),
    }
}

fn run_ticks(
    start: &str,
    stop: &str,
    count: Option<usize>,
    width: Option<f32>,
    timezone: Option<String>,
    config: Option<&str>,
    json: bool,
) -> Result<()> {
    let mut config = load_config(config)?;
    if let Some(width) = width {
        config.count = TickConfig::for_width(width).count;
    }
    if let Some(count) = count {
        config.count = count;
    }
    if let Some(timezone) = timezone {
        config.timezone = Some(timezone);
    }

    let start = parse_instant(start)?;
    let stop = parse_instant(stop)?;
    let axis = TimeAxis::new(config)?;
    let labeled = axis.labeled_ticks(&start, &stop)?;
    info!("Generated {} ticks in {}", labeled.len(), axis.timezone());

    if json {
        let records: Vec<TickRecord> = labeled
            .into_iter()
            .map(|(tick, label)| TickRecord {
                timestamp: tick.timestamp_millis(),
                time: tick.to_rfc3339(),
                label,
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&records)?);
    } else {
        for (tick, label) in labeled {
            println!("{}\t{}", tick.to_rfc3339(), label);
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Ticks {
            start,
            stop,
            count,
            width,
            timezone,
            config,
            json,
        } => run_ticks(&start, &stop, count, width, timezone, config.as_deref(), json),
    }
}
