//! CLI entry point for the DWD pollen forecast tool.
//!
//! Fetches the public pollen feed, prints readings and per-day statistics for
//! the configured regions, lists the regions in the feed, or keeps a snapshot
//! refreshed on an interval.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use dwd_pollen::config::PollenConfig;
use dwd_pollen::feed::{DWD_POLLEN_URL, list_regions};
use dwd_pollen::fetch::{BasicClient, fetch_feed};
use dwd_pollen::output::{build_report, print_rows, to_json};
use dwd_pollen::pollen::{DayOffset, PollenType};
use dwd_pollen::region::RegionId;
use dwd_pollen::service::PollenService;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "dwd_pollen")]
#[command(about = "Pollen forecasts from the DWD open data feed", long_about = None)]
struct Cli {
    /// JSON config file with tracked regions, pollen and days
    #[arg(short, long, env = "DWD_POLLEN_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Feed URL (overrides the config file)
    #[arg(long, env = "DWD_POLLEN_URL", global = true)]
    url: Option<String>,

    /// Timeout for one fetch, in seconds (overrides the config file)
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Selection {
    /// Partregion id to track; repeat for several
    #[arg(short, long = "region", value_name = "ID")]
    regions: Vec<RegionId>,

    /// Pollen kind to show (German or English name); defaults to all
    #[arg(short, long = "pollen", value_name = "POLLEN")]
    pollen: Vec<PollenType>,

    /// Forecast day to show (today, tomorrow, dayafter_tomorrow); defaults to all
    #[arg(short, long = "day", value_name = "DAY")]
    days: Vec<DayOffset>,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the feed once and print the selected readings and statistics
    Show {
        #[command(flatten)]
        selection: Selection,

        /// Print the report as JSON on stdout
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// List the regions published in the feed
    Regions,
    /// Keep the snapshot refreshed until Ctrl+C
    Watch {
        #[command(flatten)]
        selection: Selection,

        /// Seconds between refreshes (overrides the config file)
        #[arg(short, long)]
        interval_secs: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/dwd_pollen.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("dwd_pollen.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();
    let mut config = load_config(&cli)?;

    match cli.command {
        Commands::Show { selection, json } => {
            apply_selection(&mut config, selection);
            config.validate()?;

            let service = PollenService::from_config(BasicClient::new()?, &config);
            let snapshot = service.refresh().await?;

            let report = build_report(
                &snapshot,
                service.is_available(),
                &config.partregion_ids,
                &config.pollen,
                &config.days,
            );
            if json {
                println!("{}", to_json(&report)?);
            } else {
                print_rows(&report);
            }
        }
        Commands::Regions => {
            let client = BasicClient::new()?;
            let payload = fetch_feed(&client, &config.url, config.timeout()).await?;
            let regions = list_regions(&payload)?;

            info!(total = regions.len(), "Region list fetched");
            for region in &regions {
                info!(id = %region.id, "{}", region.label());
            }
        }
        Commands::Watch {
            selection,
            interval_secs,
        } => {
            apply_selection(&mut config, selection);
            if let Some(secs) = interval_secs {
                config.refresh_interval_secs = secs;
            }
            config.validate()?;
            watch(config).await?;
        }
    }

    Ok(())
}

/// Reads the config file, if any, and applies the global flag overrides.
fn load_config(cli: &Cli) -> Result<PollenConfig> {
    let mut config = match &cli.config {
        Some(path) => PollenConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => PollenConfig::default(),
    };

    if let Some(url) = &cli.url {
        config.url = url.clone();
    }
    if let Some(secs) = cli.timeout_secs {
        config.timeout_secs = secs;
    }
    if config.url != DWD_POLLEN_URL {
        info!(url = %config.url, "Using custom feed URL");
    }
    Ok(config)
}

fn apply_selection(config: &mut PollenConfig, selection: Selection) {
    if !selection.regions.is_empty() {
        config.partregion_ids = selection.regions;
    }
    if !selection.pollen.is_empty() {
        config.pollen = selection.pollen;
    }
    if !selection.days.is_empty() {
        config.days = selection.days;
    }
}

/// Refreshes on the configured interval and logs a report whenever a new
/// forecast arrives, until Ctrl+C.
#[tracing::instrument(skip(config), fields(interval_secs = config.refresh_interval_secs))]
async fn watch(config: PollenConfig) -> Result<()> {
    let service = Arc::new(PollenService::from_config(BasicClient::new()?, &config));
    info!(regions = ?service.tracked_regions(), "Watching pollen forecast");
    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(());

    let runner = {
        let service = Arc::clone(&service);
        let interval = config.refresh_interval();
        tokio::spawn(async move { service.run(interval, shutdown_rx).await })
    };

    let mut reported: Option<chrono::NaiveDateTime> = None;
    let mut was_available = true;
    let mut poll = tokio::time::interval(std::time::Duration::from_secs(1));
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = &mut ctrl_c => {
                info!("Ctrl+C received, stopping");
                break;
            }
            _ = poll.tick() => {
                let Some(snapshot) = service.snapshot() else {
                    continue;
                };
                let available = service.is_available();
                if was_available && !available {
                    warn!(last_update = %snapshot.last_update(), "Feed unavailable, serving previous snapshot");
                }
                was_available = available;

                if reported == Some(snapshot.last_update()) {
                    continue;
                }
                reported = Some(snapshot.last_update());
                let report = build_report(
                    &snapshot,
                    available,
                    &config.partregion_ids,
                    &config.pollen,
                    &config.days,
                );
                print_rows(&report);
            }
        }
    }

    let _ = shutdown_tx.send(());
    runner.await?;
    Ok(())
}
