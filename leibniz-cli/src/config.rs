//! Configuration loading from leibniz.toml
//!
//! The sweep can be described in a `leibniz.toml` file in the project root.
//! The file is discovered by walking up from the current directory; every
//! section is optional and falls back to the built-in defaults.

use clap::ValueEnum;
use leibniz_core::{ConfigError, ExperimentConfig, SchedulePolicy};
use leibniz_stats::ErrorConvention;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// File name looked up by [`LeibnizConfig::discover`]
pub const CONFIG_FILE_NAME: &str = "leibniz.toml";

/// Leibniz sweep configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LeibnizConfig {
    /// Runner configuration
    #[serde(default)]
    pub runner: RunnerConfig,
    /// Configuration matrix
    #[serde(default)]
    pub sweep: SweepConfig,
    /// Explicit configurations, appended after the matrix
    #[serde(default, rename = "experiment")]
    pub experiments: Vec<ExperimentEntry>,
    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,
}

/// Runner configuration for trial execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Trials per configuration
    #[serde(default = "default_runs")]
    pub runs: usize,
    /// How repeated-trial errors are aggregated
    #[serde(default)]
    pub error_convention: ErrorConvention,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            runs: default_runs(),
            error_convention: ErrorConvention::default(),
        }
    }
}

fn default_runs() -> usize {
    5
}

/// Built-in sweeps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Preset {
    /// Every policy and chunk size at N = 10^6 on 16 threads
    #[default]
    Schedules,
    /// N from 10^6 to 10^9 against 1 to 16 threads, static only
    Scaling,
    /// N from 10^3 to 10^7 against 2 to 10 threads, static only
    Convergence,
    /// Fixed (threads, N) pairs up to 32 threads, static only
    Threads,
}

impl Preset {
    /// Matrix for this preset
    pub fn sweep(self) -> SweepConfig {
        match self {
            Preset::Schedules => SweepConfig {
                iterations: vec![1_000_000],
                threads: vec![16],
                schedules: SchedulePolicy::ALL.to_vec(),
                chunk_sizes: vec![16, 64, 128],
            },
            Preset::Scaling => SweepConfig {
                iterations: vec![1_000_000, 10_000_000, 100_000_000, 1_000_000_000],
                threads: vec![1, 2, 4, 8, 10, 16],
                schedules: vec![SchedulePolicy::Static],
                chunk_sizes: Vec::new(),
            },
            Preset::Convergence => SweepConfig {
                iterations: vec![1_000, 10_000, 100_000, 1_000_000, 10_000_000],
                threads: vec![2, 4, 6, 8, 10],
                schedules: vec![SchedulePolicy::Static],
                chunk_sizes: Vec::new(),
            },
            // Pairs are not a matrix; see `experiments`
            Preset::Threads => SweepConfig {
                iterations: Vec::new(),
                threads: Vec::new(),
                schedules: vec![SchedulePolicy::Static],
                chunk_sizes: Vec::new(),
            },
        }
    }

    /// Explicit configs this preset runs after its matrix
    pub fn experiments(self) -> Vec<ExperimentEntry> {
        match self {
            Preset::Threads => [
                (1, 1_000_000),
                (16, 1_000_000),
                (32, 1_000_000),
                (16, 10_000_000),
            ]
            .into_iter()
            .map(|(threads, iterations)| ExperimentEntry {
                iterations,
                threads,
                schedule: SchedulePolicy::Static,
                chunk_size: None,
                runs: None,
            })
            .collect(),
            Preset::Schedules | Preset::Scaling | Preset::Convergence => Vec::new(),
        }
    }
}

/// Configuration matrix, expanded in order n → threads → schedule → chunk size
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepConfig {
    /// Series lengths
    #[serde(default = "default_iterations")]
    pub iterations: Vec<u64>,
    /// Worker counts
    #[serde(default = "default_threads")]
    pub threads: Vec<usize>,
    /// Schedule policies
    #[serde(default = "default_schedules")]
    pub schedules: Vec<SchedulePolicy>,
    /// Chunk sizes for policies that take one; empty means the policy default
    #[serde(default = "default_chunk_sizes")]
    pub chunk_sizes: Vec<usize>,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Preset::default().sweep()
    }
}

fn default_iterations() -> Vec<u64> {
    SweepConfig::default().iterations
}
fn default_threads() -> Vec<usize> {
    SweepConfig::default().threads
}
fn default_schedules() -> Vec<SchedulePolicy> {
    SweepConfig::default().schedules
}
fn default_chunk_sizes() -> Vec<usize> {
    SweepConfig::default().chunk_sizes
}

impl SweepConfig {
    /// Expand the matrix into validated configs.
    ///
    /// `auto` ignores chunk sizes and contributes one config per (n, threads).
    pub fn expand(&self, runs: usize) -> Result<Vec<ExperimentConfig>, ConfigError> {
        let mut configs = Vec::new();

        for &n in &self.iterations {
            for &threads in &self.threads {
                for &policy in &self.schedules {
                    if policy.uses_chunk_size() && !self.chunk_sizes.is_empty() {
                        for &chunk in &self.chunk_sizes {
                            configs.push(ExperimentConfig::new(
                                n,
                                threads,
                                policy,
                                Some(chunk),
                                runs,
                            )?);
                        }
                    } else {
                        configs.push(ExperimentConfig::new(n, threads, policy, None, runs)?);
                    }
                }
            }
        }

        Ok(configs)
    }
}

/// A single explicitly listed configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperimentEntry {
    /// Series length
    pub iterations: u64,
    /// Worker count
    pub threads: usize,
    /// Schedule policy
    pub schedule: SchedulePolicy,
    /// Chunk size (ignored for auto)
    #[serde(default)]
    pub chunk_size: Option<usize>,
    /// Trials; defaults to `runner.runs`
    #[serde(default)]
    pub runs: Option<usize>,
}

impl ExperimentEntry {
    /// Validate into an [`ExperimentConfig`]
    pub fn to_config(&self, default_runs: usize) -> Result<ExperimentConfig, ConfigError> {
        ExperimentConfig::new(
            self.iterations,
            self.threads,
            self.schedule,
            self.chunk_size,
            self.runs.unwrap_or(default_runs),
        )
    }
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Default output format: "human", "json", "csv"
    #[serde(default = "default_format")]
    pub format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
        }
    }
}

fn default_format() -> String {
    "human".to_string()
}

impl LeibnizConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Try to discover and load configuration by walking up from current directory
    pub fn discover() -> anyhow::Result<Option<Self>> {
        let mut dir = std::env::current_dir()?;
        loop {
            let config_path = dir.join(CONFIG_FILE_NAME);
            if config_path.exists() {
                tracing::debug!(path = %config_path.display(), "loading configuration");
                return Self::load(&config_path).map(Some);
            }
            if !dir.pop() {
                break;
            }
        }
        Ok(None)
    }

    /// Replace the matrix and the explicit configs with `preset`'s
    pub fn apply_preset(&mut self, preset: Preset) {
        self.sweep = preset.sweep();
        self.experiments = preset.experiments();
    }

    /// The ordered list of configs this file describes: matrix first, then explicit entries
    pub fn experiments(&self) -> Result<Vec<ExperimentConfig>, ConfigError> {
        let mut configs = self.sweep.expand(self.runner.runs)?;
        for entry in &self.experiments {
            configs.push(entry.to_config(self.runner.runs)?);
        }
        Ok(configs)
    }

    /// Generate a default configuration as TOML string
    pub fn default_toml() -> String {
        r#"# Leibniz sweep configuration
# Built-in alternatives: leibniz --preset schedules|scaling|convergence|threads

[runner]
# Trials per configuration
runs = 5
# Error aggregation: "error-of-mean" or "mean-of-errors"
error_convention = "error-of-mean"

[sweep]
# Expanded in order: iterations -> threads -> schedules -> chunk_sizes
iterations = [1000000]
threads = [16]
schedules = ["static", "dynamic", "guided", "auto"]
# auto ignores chunk sizes and runs once per (iterations, threads)
chunk_sizes = [16, 64, 128]

# Explicit configurations run after the matrix (uncomment to enable)
# [[experiment]]
# iterations = 10000000
# threads = 16
# schedule = "guided"
# chunk_size = 64
# runs = 3

[output]
# Default output format: human, json, csv
format = "human"
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = LeibnizConfig::default();
        assert_eq!(config.runner.runs, 5);
        assert_eq!(config.runner.error_convention, ErrorConvention::ErrorOfMean);
        assert_eq!(config.output.format, "human");
        assert!(config.experiments.is_empty());
    }

    #[test]
    fn test_default_sweep_matches_schedule_study() {
        let configs = LeibnizConfig::default().experiments().unwrap();

        // 3 chunked policies x 3 chunk sizes + auto once
        assert_eq!(configs.len(), 10);
        assert!(configs.iter().all(|c| c.n() == 1_000_000));
        assert!(configs.iter().all(|c| c.schedule().threads() == 16));
        assert!(configs.iter().all(|c| c.runs() == 5));

        let labels: Vec<_> = configs.iter().map(|c| c.label()).collect();
        assert_eq!(labels[0], "static/16/t16/n1000000");
        assert_eq!(labels[3], "dynamic/16/t16/n1000000");
        assert_eq!(labels[9], "auto/-/t16/n1000000");
    }

    #[test]
    fn test_scaling_preset() {
        let configs = Preset::Scaling.sweep().expand(1).unwrap();
        assert_eq!(configs.len(), 4 * 6);
        assert_eq!(configs[0].label(), "static/-/t1/n1000000");
        assert_eq!(configs[23].label(), "static/-/t16/n1000000000");
    }

    #[test]
    fn test_convergence_preset() {
        let configs = Preset::Convergence.sweep().expand(1).unwrap();
        assert_eq!(configs.len(), 5 * 5);
        assert_eq!(configs[0].label(), "static/-/t2/n1000");
        assert_eq!(configs[4].label(), "static/-/t10/n1000");
        assert_eq!(configs[24].label(), "static/-/t10/n10000000");
        assert!(Preset::Convergence.experiments().is_empty());
    }

    #[test]
    fn test_threads_preset_is_explicit_pairs() {
        let mut config = LeibnizConfig::default();
        config.apply_preset(Preset::Threads);

        let labels: Vec<_> = config
            .experiments()
            .unwrap()
            .iter()
            .map(|c| c.label())
            .collect();
        assert_eq!(
            labels,
            vec![
                "static/-/t1/n1000000",
                "static/-/t16/n1000000",
                "static/-/t32/n1000000",
                "static/-/t16/n10000000",
            ]
        );
    }

    #[test]
    fn test_preset_replaces_explicit_entries() {
        let toml_str = r#"
            [[experiment]]
            iterations = 50
            threads = 3
            schedule = "dynamic"
        "#;
        let mut config: LeibnizConfig = toml::from_str(toml_str).unwrap();
        config.apply_preset(Preset::Scaling);

        assert!(config.experiments.is_empty());
        assert_eq!(config.experiments().unwrap().len(), 24);
    }

    #[test]
    fn test_parse_toml() {
        let toml_str = r#"
            [runner]
            runs = 2
            error_convention = "mean-of-errors"

            [sweep]
            iterations = [1000, 2000]
            threads = [1, 4]
            schedules = ["guided"]
            chunk_sizes = []

            [[experiment]]
            iterations = 50
            threads = 3
            schedule = "dynamic"
            chunk_size = 7
            runs = 9
        "#;

        let config: LeibnizConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.runner.error_convention, ErrorConvention::MeanOfErrors);

        let configs = config.experiments().unwrap();
        assert_eq!(configs.len(), 5);
        assert_eq!(configs[1].label(), "guided/-/t4/n1000");
        assert_eq!(configs[0].runs(), 2);
        assert_eq!(configs[4].label(), "dynamic/7/t3/n50");
        assert_eq!(configs[4].runs(), 9);
        // Defaults should still apply
        assert_eq!(config.output.format, "human");
    }

    #[test]
    fn test_invalid_entry_fails_fast() {
        let toml_str = r#"
            [[experiment]]
            iterations = 50
            threads = 0
            schedule = "static"
        "#;

        let config: LeibnizConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.experiments(), Err(ConfigError::ZeroThreads));
    }

    #[test]
    fn test_partial_sweep_keeps_other_defaults() {
        let toml_str = r#"
            [sweep]
            threads = [2, 8]
        "#;

        let config: LeibnizConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.sweep.iterations, vec![1_000_000]);
        assert_eq!(config.sweep.chunk_sizes, vec![16, 64, 128]);
        assert_eq!(config.experiments().unwrap().len(), 20);
    }

    #[test]
    fn test_unknown_schedule_rejected() {
        let toml_str = r#"
            [sweep]
            schedules = ["runtime"]
        "#;
        assert!(toml::from_str::<LeibnizConfig>(toml_str).is_err());
    }

    #[test]
    fn test_default_toml_parses() {
        let default_toml = LeibnizConfig::default_toml();
        let config: LeibnizConfig = toml::from_str(&default_toml).unwrap();
        assert_eq!(config.sweep, SweepConfig::default());
        assert_eq!(config.runner.runs, 5);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[runner]\nruns = 3").unwrap();

        let config = LeibnizConfig::load(file.path()).unwrap();
        assert_eq!(config.runner.runs, 3);
        assert_eq!(config.sweep, SweepConfig::default());
    }

    #[test]
    fn test_load_missing_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        assert!(LeibnizConfig::load(dir.path().join(CONFIG_FILE_NAME)).is_err());
    }
}
