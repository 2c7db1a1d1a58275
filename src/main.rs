//! CLI entry point for the bike-share availability watcher.
//!
//! Polls the station endpoint on a fixed interval, prints a per-city report to
//! stdout and regenerates the station map after every successful fetch.

use anyhow::Result;
use bikeshare_watch::config::{
    Config, DEFAULT_API_URL, DEFAULT_INTERVAL_SECS, DEFAULT_TIMEOUT_SECS, MapConfig,
};
use bikeshare_watch::logging;
use bikeshare_watch::pipeline::Pipeline;
use bikeshare_watch::scheduler::Scheduler;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "bikeshare_watch")]
#[command(about = "Poll bike-share stations and map their availability", long_about = None)]
struct Cli {
    /// Station list endpoint
    #[arg(long, env = "BIKESHARE_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    /// API key appended as the `apiKey` query parameter
    #[arg(long, env = "JCDECAUX_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Seconds to wait between cycles
    #[arg(short = 'i', long, default_value_t = DEFAULT_INTERVAL_SECS)]
    interval_secs: u64,

    /// HTTP request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout_secs: u64,

    /// Number of cycles to run (0 = until interrupted)
    #[arg(short = 'n', long, default_value_t = 0)]
    cycles: usize,

    /// HTML file the map is written to
    #[arg(short, long, default_value = "index.html")]
    output: PathBuf,

    /// Initial map zoom level
    #[arg(long, default_value_t = 5)]
    zoom: u8,

    /// Map center latitude
    #[arg(long, default_value_t = 48.8566, allow_negative_numbers = true)]
    center_lat: f64,

    /// Map center longitude
    #[arg(long, default_value_t = 2.3522, allow_negative_numbers = true)]
    center_lon: f64,
}

impl Cli {
    fn into_config(self) -> Config {
        Config {
            api_url: self.api_url,
            api_key: self.api_key.filter(|k| !k.is_empty()),
            interval: Duration::from_secs(self.interval_secs),
            request_timeout: Duration::from_secs(self.timeout_secs),
            max_cycles: self.cycles,
            map: MapConfig {
                center_lat: self.center_lat,
                center_lon: self.center_lon,
                zoom: self.zoom,
                output_path: self.output,
                ..MapConfig::default()
            },
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    let _log_guard = logging::init()?;

    let config = Cli::parse().into_config();
    if config.api_key.is_none() {
        warn!("No API key configured, requests are sent without one");
    }
    info!(?config, "Starting bike-share watcher");

    let scheduler = Scheduler::new(Pipeline::from_config(config)?);

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupt received, stopping");
            on_signal.cancel();
        }
    });

    if scheduler.max_cycles() == 0 {
        info!("Polling until interrupted. Press Ctrl+C to stop.");
    }

    let mut stdout = std::io::stdout();
    scheduler.run(&mut stdout, cancel).await;

    Ok(())
}
