//! Sweep Execution
//!
//! Runs each config's trials and turns them into a [`ConfigResult`].
//!
//! ## Data Flow
//!
//! ```text
//! ExperimentConfig (from the plan)
//!        │
//!        ▼
//! ┌──────────────────┐
//! │      Runner      │  R × (timer → evaluate → timer), panics caught
//! └────────┬─────────┘
//!          │
//!          ▼
//!  TrialRecord × R ──► aggregate ──► ConfigResult (yielded immediately)
//! ```
//!
//! The runner is the only fault-isolation boundary: a failing trial marks
//! its config as failed and the sweep moves on to the next config.

use super::aggregate::summarize;
use leibniz_core::{
    Clock, EvalError, ExperimentConfig, MonotonicClock, REFERENCE_PI, Schedule, Timer,
    panic_message,
};
use leibniz_report::{ConfigRecord, ConfigResult, ConfigStatus, FailureInfo, TrialRecord};
use leibniz_stats::ErrorConvention;

/// Something that can approximate π for a given config
///
/// Implemented by [`SeriesEvaluator`]; tests substitute evaluators that fail
/// on purpose.
pub trait Evaluator: Sync {
    /// Approximate π with `n` terms distributed by `schedule`
    fn evaluate(&self, n: u64, schedule: &Schedule) -> Result<f64, EvalError>;
}

/// The parallel Leibniz evaluator from `leibniz-core`
#[derive(Debug, Clone, Copy, Default)]
pub struct SeriesEvaluator;

impl Evaluator for SeriesEvaluator {
    fn evaluate(&self, n: u64, schedule: &Schedule) -> Result<f64, EvalError> {
        leibniz_core::evaluate(n, schedule)
    }
}

/// Configuration for sweep execution
#[derive(Debug, Clone, Copy, Default)]
pub struct ExecutionConfig {
    /// How repeated-trial errors are aggregated
    pub error_convention: ErrorConvention,
}

/// Executes configs one at a time, trial by trial
pub struct Runner<E = SeriesEvaluator, C = MonotonicClock> {
    evaluator: E,
    clock: C,
    config: ExecutionConfig,
}

impl Runner {
    /// Runner over the real evaluator and the monotonic clock
    pub fn new(config: ExecutionConfig) -> Self {
        Self::with_parts(SeriesEvaluator, MonotonicClock, config)
    }
}

impl<E: Evaluator, C: Clock> Runner<E, C> {
    /// Runner over a custom evaluator and clock
    pub fn with_parts(evaluator: E, clock: C, config: ExecutionConfig) -> Self {
        Self {
            evaluator,
            clock,
            config,
        }
    }

    /// Execution settings
    pub fn config(&self) -> &ExecutionConfig {
        &self.config
    }

    /// Lazily run `configs` in order.
    ///
    /// Each config runs only when the iterator is advanced, so results can be
    /// reported while later configs are still pending.
    pub fn run_all<'a, I>(&'a self, configs: I) -> impl Iterator<Item = ConfigResult> + 'a
    where
        I: IntoIterator<Item = ExperimentConfig>,
        I::IntoIter: 'a,
    {
        configs
            .into_iter()
            .map(move |config| self.run_config(&config))
    }

    /// Run every trial of one config
    pub fn run_config(&self, config: &ExperimentConfig) -> ConfigResult {
        let advisory = config.schedule().advisory();

        let mut trials = Vec::with_capacity(config.runs());
        let mut failure = None;

        for run in 0..config.runs() {
            let (trial, trial_failure) = self.run_trial(config, run);
            trials.push(trial);

            if let Some(f) = trial_failure {
                failure = Some(f);
                break;
            }
        }

        let (status, summary) = match failure {
            None => (
                ConfigStatus::Passed,
                Some(summarize(&trials, REFERENCE_PI, self.config.error_convention)),
            ),
            Some(_) => (ConfigStatus::Failed, None),
        };

        ConfigResult {
            config: ConfigRecord::from(config),
            status,
            summary,
            trials,
            failure,
            advisory,
        }
    }

    /// Time one evaluation, capturing errors and panics
    fn run_trial(&self, config: &ExperimentConfig, run: usize) -> (TrialRecord, Option<FailureInfo>) {
        let timer = Timer::start(&self.clock);
        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            self.evaluator.evaluate(config.n(), config.schedule())
        }));
        let elapsed_seconds = timer.stop();

        let failure = |kind: &str, message: String| {
            (
                TrialRecord {
                    run,
                    measured_value: None,
                    elapsed_seconds,
                    error_vs_reference_pi: None,
                    failure: Some(message.clone()),
                },
                Some(FailureInfo {
                    kind: kind.to_string(),
                    message,
                    run,
                }),
            )
        };

        match outcome {
            Ok(Ok(value)) if value.is_finite() => {
                let error = (value - REFERENCE_PI).abs();
                (
                    TrialRecord {
                        run,
                        measured_value: Some(value),
                        elapsed_seconds,
                        error_vs_reference_pi: Some(error),
                        failure: None,
                    },
                    None,
                )
            }
            Ok(Ok(value)) => failure("non-finite", format!("evaluation produced {value}")),
            Ok(Err(err)) => failure(error_kind(&err), err.to_string()),
            Err(payload) => failure("panic", panic_message(payload.as_ref())),
        }
    }
}

fn error_kind(err: &EvalError) -> &'static str {
    match err {
        EvalError::Spawn { .. } => "spawn",
        EvalError::WorkerPanicked { .. } => "panic",
        EvalError::Pool(_) => "pool",
    }
}
