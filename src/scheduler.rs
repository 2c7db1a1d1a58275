//! Fixed-interval driver for [`Pipeline`].
//!
//! Each cycle runs to completion (or short-circuits on a failed fetch), then
//! the scheduler pauses for the configured interval whether or not the cycle
//! produced data. There is no backoff. Cancelling the token stops the loop
//! at the next await point, including in the middle of a pause.

use std::io::Write;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::fetch::HttpClient;
use crate::pipeline::{CycleOutcome, Pipeline};

/// Counters for a finished run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub cycles: usize,
    pub completed: usize,
    pub skipped: usize,
    pub failed: usize,
}

pub struct Scheduler<C> {
    pipeline: Pipeline<C>,
    interval: Duration,
    max_cycles: usize,
}

impl<C: HttpClient> Scheduler<C> {
    /// Takes the interval and cycle limit from the pipeline's config.
    pub fn new(pipeline: Pipeline<C>) -> Self {
        let interval = pipeline.config().interval;
        let max_cycles = pipeline.config().max_cycles;
        Self {
            pipeline,
            interval,
            max_cycles,
        }
    }

    pub fn with_max_cycles(mut self, max_cycles: usize) -> Self {
        self.max_cycles = max_cycles;
        self
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn max_cycles(&self) -> usize {
        self.max_cycles
    }

    /// Runs cycles until `cancel` fires or `max_cycles` is reached (0 = no limit).
    #[tracing::instrument(skip_all, fields(interval_secs = self.interval.as_secs(), max_cycles = self.max_cycles))]
    pub async fn run<W: Write + ?Sized>(
        &self,
        out: &mut W,
        cancel: CancellationToken,
    ) -> RunSummary {
        let mut summary = RunSummary::default();
        let mut consecutive_failures = 0usize;

        loop {
            if self.max_cycles > 0 && summary.cycles >= self.max_cycles {
                break;
            }
            if cancel.is_cancelled() {
                break;
            }

            summary.cycles += 1;
            info!(cycle = summary.cycles, "Starting cycle");

            let result = tokio::select! {
                _ = cancel.cancelled() => break,
                result = self.pipeline.run_cycle(&mut *out) => result,
            };

            match result {
                Ok(CycleOutcome::Completed(_)) => {
                    summary.completed += 1;
                    if consecutive_failures > 0 {
                        info!(after = consecutive_failures, "Station feed recovered");
                    }
                    consecutive_failures = 0;
                }
                Ok(CycleOutcome::Skipped(failure)) => {
                    summary.skipped += 1;
                    consecutive_failures += 1;
                    warn!(
                        kind = failure.kind(),
                        consecutive_failures, "No station data this cycle"
                    );
                }
                Err(e) => {
                    summary.failed += 1;
                    error!(error = %format!("{e:#}"), "Cycle failed after fetch");
                }
            }

            if self.max_cycles > 0 && summary.cycles >= self.max_cycles {
                break;
            }

            info!(interval_secs = self.interval.as_secs(), "Waiting before next cycle");
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(self.interval) => {}
            }
        }

        info!(
            cycles = summary.cycles,
            completed = summary.completed,
            skipped = summary.skipped,
            failed = summary.failed,
            "Scheduler stopped"
        );
        summary
    }
}
