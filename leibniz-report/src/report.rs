//! Report Data Structures
//!
//! Every record keeps full double precision; rounding is left to the
//! renderer. Serialized field names are stable across releases.

use chrono::{DateTime, Utc};
use leibniz_core::{ExperimentConfig, ResourceAdvisory, SchedulePolicy};
use leibniz_stats::ErrorConvention;
use serde::{Deserialize, Serialize};

/// Complete sweep report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub meta: ReportMeta,
    pub results: Vec<ConfigResult>,
    pub summary: ReportSummary,
}

/// Report metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMeta {
    pub version: String,
    pub timestamp: DateTime<Utc>,
    pub system: SystemInfo,
    pub settings: RunnerSettings,
}

/// Host the sweep ran on
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemInfo {
    pub os: String,
    pub arch: String,
    pub available_parallelism: usize,
}

impl SystemInfo {
    /// Describe the current host
    pub fn current() -> Self {
        Self {
            os: std::env::consts::OS.to_string(),
            arch: std::env::consts::ARCH.to_string(),
            available_parallelism: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
        }
    }
}

/// Runner settings captured in report metadata
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RunnerSettings {
    pub error_convention: ErrorConvention,
    pub reference_pi: f64,
}

/// Flat, serializable view of an [`ExperimentConfig`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigRecord {
    pub n: u64,
    pub threads: usize,
    pub schedule: SchedulePolicy,
    pub chunk_size: Option<usize>,
    pub runs: usize,
}

impl From<&ExperimentConfig> for ConfigRecord {
    fn from(config: &ExperimentConfig) -> Self {
        Self {
            n: config.n(),
            threads: config.schedule().threads(),
            schedule: config.schedule().policy(),
            chunk_size: config.schedule().chunk_size(),
            runs: config.runs(),
        }
    }
}

/// Outcome of a single timed evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialRecord {
    /// Zero-based trial index within its config
    pub run: usize,
    /// Approximation of π; absent when the trial failed
    pub measured_value: Option<f64>,
    pub elapsed_seconds: f64,
    /// `|measured_value - π|`; absent when the trial failed
    pub error_vs_reference_pi: Option<f64>,
    pub failure: Option<String>,
}

impl TrialRecord {
    /// Whether the trial produced a value
    pub fn succeeded(&self) -> bool {
        self.measured_value.is_some()
    }
}

/// Aggregate of the successful trials of one config
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfigSummary {
    pub avg_value: f64,
    pub avg_error: f64,
    pub avg_elapsed_seconds: f64,
    pub min_elapsed_seconds: f64,
    pub max_elapsed_seconds: f64,
    pub median_elapsed_seconds: f64,
    pub std_dev_elapsed_seconds: f64,
    pub trials: usize,
}

/// Config execution status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigStatus {
    Passed,
    Failed,
}

/// Failure information
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureInfo {
    /// `spawn`, `panic`, `pool` or `non-finite`
    pub kind: String,
    pub message: String,
    /// Trial that failed
    pub run: usize,
}

/// Everything reported for one config of a sweep
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigResult {
    pub config: ConfigRecord,
    pub status: ConfigStatus,
    /// Present iff `status` is `Passed`
    pub summary: Option<ConfigSummary>,
    pub trials: Vec<TrialRecord>,
    pub failure: Option<FailureInfo>,
    pub advisory: Option<ResourceAdvisory>,
}

impl ConfigResult {
    /// Whether every trial succeeded
    pub fn passed(&self) -> bool {
        self.status == ConfigStatus::Passed
    }
}

/// Report summary
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportSummary {
    pub total_configs: usize,
    pub passed: usize,
    pub failed: usize,
    pub advisories: usize,
    pub total_duration_ms: f64,
}

impl ReportSummary {
    /// Count one streamed result
    pub fn record(&mut self, result: &ConfigResult) {
        self.total_configs += 1;
        match result.status {
            ConfigStatus::Passed => self.passed += 1,
            ConfigStatus::Failed => self.failed += 1,
        }
        if result.advisory.is_some() {
            self.advisories += 1;
        }
    }
}
