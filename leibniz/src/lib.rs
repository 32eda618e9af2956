#![warn(missing_docs)]
//! # Leibniz
//!
//! Parallel evaluation of the Leibniz series for π, and an experiment runner
//! that sweeps thread counts and loop-scheduling policies.
//!
//! - **Schedules**: static (blocked or round-robin), dynamic, guided and
//!   auto, each a fork-join reduction with per-worker accumulators
//! - **Experiments**: repeated timed trials per config, with failures
//!   isolated to the config that produced them
//! - **Reports**: streamed human tables and CSV, or a complete JSON report
//!
//! ## Quick Start
//!
//! ```
//! use leibniz::{Schedule, SchedulePolicy, evaluate};
//!
//! let schedule = Schedule::new(4, SchedulePolicy::Guided, Some(64)).unwrap();
//! let pi = evaluate(1_000_000, &schedule).unwrap();
//! assert!((pi - std::f64::consts::PI).abs() < 1e-5);
//! ```
//!
//! ## Running a Sweep
//!
//! ```ignore
//! use leibniz::{ExecutionConfig, HumanReporter, Runner, build_plan, run_sweep};
//!
//! let configs = leibniz::LeibnizConfig::default().experiments()?;
//! let plan = build_plan(configs, None, None);
//! let runner = Runner::new(ExecutionConfig::default());
//! let mut reporter = HumanReporter::new(std::io::stdout());
//! let report = run_sweep(&runner, &plan, &mut reporter, true)?;
//! ```

// Re-export the evaluator
pub use leibniz_core::{
    ConfigError, EvalError, ExperimentConfig, Leibniz, PerIndex, REFERENCE_PI, ResourceAdvisory,
    Schedule, SchedulePolicy, SeriesTerm, evaluate, reduce, sequential,
};

// Re-export stats
pub use leibniz_stats::{ErrorConvention, SummaryStatistics, aggregate_error, compute_summary};

// Re-export report types
pub use leibniz_report::{
    ConfigResult, ConfigStatus, ConfigSummary, OutputFormat, Report, TrialRecord,
};

// Re-export the runner
pub use leibniz_cli::{
    CsvReporter, Evaluator, ExecutionConfig, HumanReporter, JsonReporter, LeibnizConfig, Preset,
    Reporter, Runner, SeriesEvaluator, SweepPlan, build_plan, run_sweep,
};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        ExperimentConfig, Runner, Schedule, SchedulePolicy, evaluate, sequential,
    };
}

/// Run the Leibniz CLI.
///
/// ```ignore
/// fn main() -> anyhow::Result<()> {
///     leibniz::run()
/// }
/// ```
pub use leibniz_cli::run;
