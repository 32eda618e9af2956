//! Result Reporting
//!
//! Reporters receive each [`ConfigResult`] as soon as the runner yields it,
//! then the complete [`Report`] once the sweep is over. Human and CSV output
//! stream row by row; JSON is written at the end.

use super::execution::{Evaluator, Runner};
use super::formatting::{format_header, format_row, format_summary, format_trial_row};
use super::metadata::build_report_meta;
use crate::planner::SweepPlan;
use indicatif::{ProgressBar, ProgressStyle};
use leibniz_core::Clock;
use leibniz_report::{
    CSV_HEADER, ConfigResult, OutputFormat, Report, ReportSummary, csv_row, generate_json_report,
};
use std::io::Write;
use std::time::Instant;

/// Sink for streamed sweep results
pub trait Reporter {
    /// Called once before the first config runs
    fn begin(&mut self, plan: &SweepPlan) -> anyhow::Result<()>;

    /// Called once per config, in plan order
    fn report(&mut self, result: &ConfigResult) -> anyhow::Result<()>;

    /// Called once with the complete report
    fn finish(&mut self, report: &Report) -> anyhow::Result<()>;
}

/// Column-aligned terminal table
pub struct HumanReporter<W> {
    out: W,
    trials: bool,
}

impl<W: Write> HumanReporter<W> {
    /// Reporter writing to `out`
    pub fn new(out: W) -> Self {
        Self { out, trials: false }
    }

    /// Also print one line per trial under each config row
    pub fn with_trials(mut self, trials: bool) -> Self {
        self.trials = trials;
        self
    }
}

impl<W: Write> Reporter for HumanReporter<W> {
    fn begin(&mut self, _plan: &SweepPlan) -> anyhow::Result<()> {
        self.out.write_all(format_header().as_bytes())?;
        Ok(())
    }

    fn report(&mut self, result: &ConfigResult) -> anyhow::Result<()> {
        self.out.write_all(format_row(result).as_bytes())?;
        if self.trials {
            for trial in &result.trials {
                self.out.write_all(format_trial_row(trial).as_bytes())?;
            }
        }
        self.out.flush()?;
        Ok(())
    }

    fn finish(&mut self, report: &Report) -> anyhow::Result<()> {
        self.out.write_all(format_summary(report).as_bytes())?;
        self.out.flush()?;
        Ok(())
    }
}

/// One CSV line per config
pub struct CsvReporter<W> {
    out: W,
}

impl<W: Write> CsvReporter<W> {
    /// Reporter writing to `out`
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> Reporter for CsvReporter<W> {
    fn begin(&mut self, _plan: &SweepPlan) -> anyhow::Result<()> {
        writeln!(self.out, "{CSV_HEADER}")?;
        Ok(())
    }

    fn report(&mut self, result: &ConfigResult) -> anyhow::Result<()> {
        writeln!(self.out, "{}", csv_row(result))?;
        self.out.flush()?;
        Ok(())
    }

    fn finish(&mut self, _report: &Report) -> anyhow::Result<()> {
        self.out.flush()?;
        Ok(())
    }
}

/// Pretty-printed JSON of the complete report
pub struct JsonReporter<W> {
    out: W,
}

impl<W: Write> JsonReporter<W> {
    /// Reporter writing to `out`
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> Reporter for JsonReporter<W> {
    fn begin(&mut self, _plan: &SweepPlan) -> anyhow::Result<()> {
        Ok(())
    }

    fn report(&mut self, _result: &ConfigResult) -> anyhow::Result<()> {
        Ok(())
    }

    fn finish(&mut self, report: &Report) -> anyhow::Result<()> {
        writeln!(self.out, "{}", generate_json_report(report)?)?;
        self.out.flush()?;
        Ok(())
    }
}

/// Reporter for `format` writing to `out`
///
/// `trials` only affects the human table; CSV and JSON layouts are fixed.
pub fn reporter_for<'w>(
    format: OutputFormat,
    out: Box<dyn Write + 'w>,
    trials: bool,
) -> Box<dyn Reporter + 'w> {
    match format {
        OutputFormat::Human => Box::new(HumanReporter::new(out).with_trials(trials)),
        OutputFormat::Csv => Box::new(CsvReporter::new(out)),
        OutputFormat::Json => Box::new(JsonReporter::new(out)),
    }
}

/// Run every config of `plan`, streaming results into `reporter`.
///
/// Returns the complete report after [`Reporter::finish`] has seen it.
pub fn run_sweep<E: Evaluator, C: Clock>(
    runner: &Runner<E, C>,
    plan: &SweepPlan,
    reporter: &mut dyn Reporter,
    progress: bool,
) -> anyhow::Result<Report> {
    let pb = if progress {
        let pb = ProgressBar::new(plan.configs.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        pb
    } else {
        ProgressBar::hidden()
    };

    tracing::info!(
        configs = plan.configs.len(),
        trials = plan.total_trials(),
        skipped = plan.skipped,
        "starting sweep"
    );

    let start_time = Instant::now();
    let mut summary = ReportSummary::default();
    let mut results = Vec::with_capacity(plan.configs.len());

    reporter.begin(plan)?;

    let mut pending = plan.configs.iter();
    let mut stream = runner.run_all(plan.configs.iter().copied());
    loop {
        if let Some(next) = pending.next() {
            pb.set_message(next.label());
        }
        let Some(result) = stream.next() else { break };

        summary.record(&result);
        pb.suspend(|| {
            log_result(&result);
            reporter.report(&result)
        })?;
        pb.inc(1);
        results.push(result);
    }

    pb.finish_and_clear();

    summary.total_duration_ms = start_time.elapsed().as_secs_f64() * 1000.0;
    tracing::info!(
        passed = summary.passed,
        failed = summary.failed,
        duration_ms = summary.total_duration_ms,
        "sweep complete"
    );

    let report = Report {
        meta: build_report_meta(runner.config().error_convention),
        results,
        summary,
    };
    reporter.finish(&report)?;

    Ok(report)
}

/// Log one finished config; called while the progress bar is suspended
fn log_result(result: &ConfigResult) {
    let config = &result.config;
    if let Some(advisory) = &result.advisory {
        tracing::warn!(n = config.n, threads = config.threads, schedule = %config.schedule, "{advisory}");
    }
    for trial in result.trials.iter().filter(|t| t.succeeded()) {
        tracing::debug!(
            n = config.n,
            threads = config.threads,
            schedule = %config.schedule,
            run = trial.run,
            value = trial.measured_value,
            error = trial.error_vs_reference_pi,
            elapsed_seconds = trial.elapsed_seconds,
            "trial complete"
        );
    }
    if let Some(failure) = &result.failure {
        tracing::warn!(
            n = config.n,
            threads = config.threads,
            schedule = %config.schedule,
            run = failure.run,
            kind = %failure.kind,
            "trial failed, skipping remaining trials: {}",
            failure.message
        );
    }
}
