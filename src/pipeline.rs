//! One fetch → aggregate → report → transform → render pass.

use anyhow::{Context, Result};
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

use crate::aggregate::aggregate;
use crate::config::Config;
use crate::error::FetchFailure;
use crate::fetch::{BasicClient, FetchOutcome, HttpClient, auth::UrlParam, fetch_stations};
use crate::geo::stations_to_features;
use crate::map::write_map;
use crate::report::{log_json, write_report};

/// What a completed cycle produced.
#[derive(Debug, Clone, PartialEq)]
pub struct CycleReport {
    pub stations: usize,
    pub cities: usize,
    pub features: usize,
    /// Array elements that did not decode as a station object.
    pub rejected_on_decode: usize,
    /// Stations left out of the aggregation (no bike count).
    pub skipped_in_aggregation: usize,
    /// Stations left off the map (missing name, position, counts or status).
    pub skipped_on_map: usize,
    pub output_path: PathBuf,
}

#[derive(Debug)]
pub enum CycleOutcome {
    Completed(CycleReport),
    /// No data this cycle (failed fetch or no usable station); nothing after
    /// the fetch ran and the previous map is left in place.
    Skipped(FetchFailure),
}

pub struct Pipeline<C> {
    client: C,
    config: Config,
}

impl Pipeline<Box<dyn HttpClient>> {
    /// Builds the HTTP client described by `config`, adding the API key
    /// decorator when a key is configured.
    pub fn from_config(config: Config) -> Result<Self> {
        config.validate()?;
        let basic = BasicClient::with_timeout(config.request_timeout)
            .context("failed to build HTTP client")?;
        let client: Box<dyn HttpClient> = match &config.api_key {
            Some(key) => Box::new(UrlParam::api_key(basic, key.clone())),
            None => Box::new(basic),
        };
        Ok(Self::new(client, config))
    }
}

impl<C: HttpClient> Pipeline<C> {
    pub fn new(client: C, config: Config) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Runs one cycle, writing the console report to `out`.
    ///
    /// A failed fetch yields [`CycleOutcome::Skipped`]. Report or map write
    /// failures are returned as errors for the caller to log.
    #[tracing::instrument(skip_all)]
    pub async fn run_cycle<W: Write + ?Sized>(&self, out: &mut W) -> Result<CycleOutcome> {
        let list = match fetch_stations(&self.client, &self.config.api_url).await {
            FetchOutcome::Stations(list) => list,
            FetchOutcome::Unavailable(failure) => return Ok(CycleOutcome::Skipped(failure)),
        };

        let stations = list.stations;
        let agg = aggregate(&stations);
        log_json(&agg)?;
        write_report(&agg, out).context("failed to write report")?;

        let geo = stations_to_features(&stations);
        write_map(&geo.collection, &self.config.map)?;

        let report = CycleReport {
            stations: stations.len(),
            cities: agg.cities.len(),
            features: geo.collection.features.len(),
            rejected_on_decode: list.rejected,
            skipped_in_aggregation: agg.skipped,
            skipped_on_map: geo.skipped,
            output_path: self.config.map.output_path.clone(),
        };

        info!(
            stations = report.stations,
            cities = report.cities,
            features = report.features,
            rejected_on_decode = report.rejected_on_decode,
            skipped_in_aggregation = report.skipped_in_aggregation,
            skipped_on_map = report.skipped_on_map,
            output = %report.output_path.display(),
            "Cycle complete"
        );

        Ok(CycleOutcome::Completed(report))
    }
}
