#![warn(missing_docs)]
//! Leibniz Core - Parallel Series Evaluator
//!
//! This crate provides the computational kernel:
//! - `Schedule` and `SchedulePolicy` (static, dynamic, guided, auto)
//! - Fork-join reduction with per-worker accumulators
//! - `SeriesTerm` abstraction with the Leibniz series as its main impl
//! - `ExperimentConfig`, the validated unit of work for the runner
//! - Monotonic `Clock` for timing trials

mod evaluator;
mod experiment;
mod measure;
mod schedule;
mod series;

pub use evaluator::{
    AUTO_BLOCKS_PER_WORKER, DEFAULT_CHUNK_SIZE, EvalError, evaluate, guided_chunk, reduce,
    static_bounds,
};
pub use experiment::ExperimentConfig;
pub use measure::{Clock, MonotonicClock, Timer};
pub use schedule::{ConfigError, ResourceAdvisory, Schedule, SchedulePolicy};
pub use series::{Leibniz, PerIndex, SeriesTerm, sequential};

/// Reference value of π that errors are measured against
pub const REFERENCE_PI: f64 = std::f64::consts::PI;

/// Extract a readable message from a panic payload
pub fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}
