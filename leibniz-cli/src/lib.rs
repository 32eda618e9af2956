#![warn(missing_docs)]
//! Leibniz CLI Library
//!
//! Command-line front end for π sweeps: resolves the sweep from
//! `leibniz.toml`, presets and flags, runs it, and streams the results.
//!
//! # Example
//!
//! ```ignore
//! fn main() -> anyhow::Result<()> {
//!     leibniz_cli::run()
//! }
//! ```

mod config;
mod planner;
mod runner;

pub use config::*;
pub use planner::{SweepPlan, build_plan};
pub use runner::{
    CsvReporter, Evaluator, ExecutionConfig, HumanReporter, JsonReporter, Reporter, Runner,
    SeriesEvaluator, build_report_meta, format_header, format_row, format_summary,
    format_trial_row, reporter_for, run_sweep, summarize,
};

use anyhow::Context;
use clap::{Parser, Subcommand};
use leibniz_core::SchedulePolicy;
use leibniz_report::{OutputFormat, Report};
use leibniz_stats::ErrorConvention;
use regex::Regex;
use std::io::Write;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Leibniz CLI arguments
#[derive(Parser, Debug)]
#[command(name = "leibniz")]
#[command(author, version, about = "Leibniz π sweeps across thread counts and schedule policies")]
pub struct Cli {
    /// Optional subcommand (List, Run, Init); defaults to Run
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Filter configs by regex on their label (`schedule/chunk/tT/nN`)
    pub filter: Option<String>,

    /// Output format: human, json, csv (defaults to leibniz.toml, then human)
    #[arg(long, global = true)]
    pub format: Option<String>,

    /// Output file (stdout if not specified)
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,

    /// Configuration file (otherwise leibniz.toml is discovered)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Built-in sweep replacing the file's [sweep] and [[experiment]] entries
    #[arg(long, value_enum, global = true)]
    pub preset: Option<Preset>,

    /// Series lengths, comma separated
    #[arg(long, value_delimiter = ',', global = true)]
    pub iterations: Vec<u64>,

    /// Worker counts, comma separated
    #[arg(long, value_delimiter = ',', global = true)]
    pub threads: Vec<usize>,

    /// Schedule policies, comma separated
    #[arg(long, value_delimiter = ',', global = true)]
    pub schedules: Vec<SchedulePolicy>,

    /// Chunk sizes, comma separated
    #[arg(long, value_delimiter = ',', global = true)]
    pub chunk_sizes: Vec<usize>,

    /// Run only configs with this schedule policy
    #[arg(long, global = true)]
    pub schedule: Option<SchedulePolicy>,

    /// Trials per config
    #[arg(long, global = true)]
    pub runs: Option<usize>,

    /// Error aggregation: error-of-mean or mean-of-errors
    #[arg(long, global = true)]
    pub error_convention: Option<ErrorConvention>,

    /// Print every trial under its config row (human format)
    #[arg(long, global = true)]
    pub trials: bool,

    /// Dry run - list configs without executing
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Hide the progress bar
    #[arg(long, global = true)]
    pub no_progress: bool,

    /// Exit successfully even when configs failed
    #[arg(long, global = true)]
    pub allow_failures: bool,
}

impl Cli {
    /// Label filter from the subcommand, else the top level, else match-all
    pub fn filter(&self) -> &str {
        let sub = match &self.command {
            Some(Commands::List { filter } | Commands::Run { filter }) => filter.as_deref(),
            Some(Commands::Init) | None => None,
        };
        sub.or(self.filter.as_deref()).unwrap_or(".*")
    }

    /// Whether a finished sweep should end the process with a failure status
    pub fn should_fail(&self, report: &Report) -> bool {
        report.summary.failed > 0 && !self.allow_failures
    }
}

/// CLI subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// List the planned configs
    List {
        /// Filter configs by regex on their label
        filter: Option<String>,
    },
    /// Run the sweep (default)
    Run {
        /// Filter configs by regex on their label
        filter: Option<String>,
    },
    /// Print a default leibniz.toml
    Init,
}

/// Run the Leibniz CLI with the process arguments.
///
/// # Returns
/// Returns `Ok(())` on success, or an error if something goes wrong.
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    run_with_cli(cli)
}

/// Run the Leibniz CLI with pre-parsed arguments.
pub fn run_with_cli(cli: Cli) -> anyhow::Result<()> {
    init_tracing(cli.verbose);

    match &cli.command {
        Some(Commands::Init) => {
            print!("{}", LeibnizConfig::default_toml());
            Ok(())
        }
        Some(Commands::List { .. }) => {
            let config = resolve_config(&cli)?;
            list_configs(&resolve_plan(&cli, &config)?)
        }
        Some(Commands::Run { .. }) | None => {
            let config = resolve_config(&cli)?;
            let plan = resolve_plan(&cli, &config)?;
            if cli.dry_run {
                return list_configs(&plan);
            }

            let Some(report) = run_configs(&cli, &config, &plan)? else {
                return Ok(());
            };
            if let Some(path) = &cli.output {
                eprintln!("Report written to: {}", path.display());
            }

            // Exit with appropriate code
            if cli.should_fail(&report) {
                eprintln!("\n{} config(s) failed", report.summary.failed);
                std::process::exit(1);
            }
            Ok(())
        }
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "leibniz={level},leibniz_core={level},leibniz_cli={level}"
        ))
    });

    // A subscriber may already be installed when embedded
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Layer configuration: leibniz.toml (or `--config`) → preset → CLI flags.
pub fn resolve_config(cli: &Cli) -> anyhow::Result<LeibnizConfig> {
    let mut config = match &cli.config {
        Some(path) => LeibnizConfig::load(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => LeibnizConfig::discover()?.unwrap_or_default(),
    };

    if let Some(preset) = cli.preset {
        config.apply_preset(preset);
    }
    if !cli.iterations.is_empty() {
        config.sweep.iterations = cli.iterations.clone();
    }
    if !cli.threads.is_empty() {
        config.sweep.threads = cli.threads.clone();
    }
    if !cli.schedules.is_empty() {
        config.sweep.schedules = cli.schedules.clone();
    }
    if !cli.chunk_sizes.is_empty() {
        config.sweep.chunk_sizes = cli.chunk_sizes.clone();
    }
    if let Some(runs) = cli.runs {
        config.runner.runs = runs;
    }
    if let Some(convention) = cli.error_convention {
        config.runner.error_convention = convention;
    }

    Ok(config)
}

/// Expand and filter the configured sweep.
pub fn resolve_plan(cli: &Cli, config: &LeibnizConfig) -> anyhow::Result<SweepPlan> {
    let configs = config.experiments().context("invalid sweep configuration")?;
    let pattern = cli.filter();
    let filter =
        Regex::new(pattern).with_context(|| format!("invalid filter pattern '{pattern}'"))?;

    Ok(build_plan(configs, Some(&filter), cli.schedule))
}

fn list_configs(plan: &SweepPlan) -> anyhow::Result<()> {
    println!("Leibniz Plan:");

    let mut groups: std::collections::BTreeMap<u64, Vec<_>> = std::collections::BTreeMap::new();
    for config in &plan.configs {
        groups.entry(config.n()).or_default().push(config);
    }

    for (n, configs) in &groups {
        println!("├── n = {}", n);
        for config in configs {
            let advisory = match config.schedule().advisory() {
                Some(a) => format!(" [oversubscribed: {} > {} cores]", a.requested, a.available),
                None => String::new(),
            };
            println!(
                "│   ├── {} ({} runs){}",
                config.label(),
                config.runs(),
                advisory
            );
        }
    }

    println!(
        "{} configs, {} trials planned ({} filtered out).",
        plan.configs.len(),
        plan.total_trials(),
        plan.skipped
    );
    Ok(())
}

/// Run the planned sweep into the configured output.
///
/// Returns `None` when the plan is empty; otherwise the complete report,
/// which the caller turns into an exit status with [`Cli::should_fail`].
pub fn run_configs(
    cli: &Cli,
    config: &LeibnizConfig,
    plan: &SweepPlan,
) -> anyhow::Result<Option<Report>> {
    let format: OutputFormat = cli
        .format
        .as_deref()
        .unwrap_or(&config.output.format)
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))?;

    if plan.configs.is_empty() {
        println!("No configs to run.");
        return Ok(None);
    }

    let out: Box<dyn Write> = match &cli.output {
        Some(path) => Box::new(std::io::BufWriter::new(
            std::fs::File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?,
        )),
        None => Box::new(std::io::stdout().lock()),
    };
    let mut reporter = reporter_for(format, out, cli.trials);

    let runner = Runner::new(ExecutionConfig {
        error_convention: config.runner.error_convention,
    });
    let report = run_sweep(&runner, plan, reporter.as_mut(), !cli.no_progress)?;

    Ok(Some(report))
}
