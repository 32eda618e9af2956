//! Experiment Configuration

use crate::schedule::{ConfigError, Schedule, SchedulePolicy};
use std::fmt;
use std::num::NonZeroUsize;

/// One point of a sweep: how many terms, how to schedule them, how often to repeat
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExperimentConfig {
    n: u64,
    schedule: Schedule,
    runs: NonZeroUsize,
}

impl ExperimentConfig {
    /// Validate and build a config
    pub fn new(
        n: u64,
        threads: usize,
        policy: SchedulePolicy,
        chunk_size: Option<usize>,
        runs: usize,
    ) -> Result<Self, ConfigError> {
        let schedule = Schedule::new(threads, policy, chunk_size)?;
        let runs = NonZeroUsize::new(runs).ok_or(ConfigError::ZeroRuns)?;
        Ok(Self { n, schedule, runs })
    }

    /// Number of series terms
    pub fn n(&self) -> u64 {
        self.n
    }

    /// Work distribution
    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    /// Number of repeated trials
    pub fn runs(&self) -> usize {
        self.runs.get()
    }

    /// Stable label used for filtering and log lines, e.g. `dynamic/64/t16/n1000000`
    pub fn label(&self) -> String {
        let chunk = self
            .schedule
            .chunk_size()
            .map_or_else(|| "-".to_string(), |c| c.to_string());
        format!(
            "{}/{}/t{}/n{}",
            self.schedule.policy(),
            chunk,
            self.schedule.threads(),
            self.n
        )
    }
}

impl fmt::Display for ExperimentConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}
