//! Experiment Runner
//!
//! Runs a sweep of experiment configs and streams the results out.
//!
//! ## Pipeline Overview
//!
//! ```text
//! SweepPlan (from the planner)
//!       │
//!       ▼
//! ┌─────────────┐
//! │  execution  │  Timed trials per config, panics and errors isolated
//! └──────┬──────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │  aggregate  │  Mean value, error convention, elapsed-time spread
//! └──────┬──────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │   report    │  Reporter streams each ConfigResult, then the Report
//! └──────┬──────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │ formatting  │  Human-readable table
//! └─────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`execution`] - Trial execution and fault isolation
//! - [`aggregate`] - Per-config summaries
//! - [`report`] - Reporters and the sweep driver
//! - [`formatting`] - Human-readable output formatting
//! - [`metadata`] - Report metadata collection

mod aggregate;
mod execution;
mod formatting;
mod metadata;
mod report;

pub use aggregate::summarize;
pub use execution::{Evaluator, ExecutionConfig, Runner, SeriesEvaluator};
pub use formatting::{format_header, format_row, format_summary, format_trial_row};
pub use metadata::build_report_meta;
pub use report::{CsvReporter, HumanReporter, JsonReporter, Reporter, reporter_for, run_sweep};
