//! Output Formatting
//!
//! Human-readable table for sweep results. Rows are formatted one at a time
//! so they can be printed while the sweep is still running.

use leibniz_report::{ConfigResult, Report, TrialRecord};

const RULE_WIDTH: usize = 100;

/// Table title and column header, including the trailing newline
pub fn format_header() -> String {
    let mut output = String::new();
    output.push('\n');
    output.push_str("Leibniz π Sweep\n");
    output.push_str(&"=".repeat(RULE_WIDTH));
    output.push('\n');
    output.push_str(&format!(
        "{:>12} {:>8} {:>10} {:>8} {:>20} {:>20} {:>15}\n",
        "N", "Threads", "Schedule", "Chunk", "Avg π", "Avg Error", "Avg Time (s)"
    ));
    output.push_str(&"-".repeat(RULE_WIDTH));
    output.push('\n');
    output
}

/// One table row, including the trailing newline
///
/// Failed configs keep the config columns and replace the numbers with the
/// failure message.
pub fn format_row(result: &ConfigResult) -> String {
    let config = &result.config;
    let chunk = config
        .chunk_size
        .map(|c| c.to_string())
        .unwrap_or_else(|| "-".to_string());

    let prefix = format!(
        "{:>12} {:>8} {:>10} {:>8}",
        config.n,
        config.threads,
        config.schedule.as_str(),
        chunk
    );

    let mut line = match (&result.summary, &result.failure) {
        (Some(s), _) => format!(
            "{} {:>20.12} {:>20.6e} {:>15.6}",
            prefix, s.avg_value, s.avg_error, s.avg_elapsed_seconds
        ),
        (None, Some(f)) => format!("{}  FAILED: {}", prefix, f.message),
        (None, None) => format!("{}  FAILED", prefix),
    };

    if let Some(advisory) = &result.advisory {
        line.push_str(&format!("  ({} threads > {} cores)", advisory.requested, advisory.available));
    }
    line.push('\n');
    line
}

/// Closing summary block
pub fn format_summary(report: &Report) -> String {
    let summary = &report.summary;
    let mut output = String::new();

    output.push_str(&"-".repeat(RULE_WIDTH));
    output.push('\n');
    output.push_str(&format!(
        "  Total: {}  Passed: {}  Failed: {}  Oversubscribed: {}\n",
        summary.total_configs, summary.passed, summary.failed, summary.advisories
    ));
    output.push_str(&format!(
        "  Error convention: {}\n",
        report.meta.settings.error_convention
    ));
    output.push_str(&format!("  Duration: {:.2} ms\n", summary.total_duration_ms));
    output
}

/// Per-trial line printed under its config row with `--trials`
pub fn format_trial_row(trial: &TrialRecord) -> String {
    let mut line = match (trial.measured_value, trial.error_vs_reference_pi) {
        (Some(value), Some(error)) => format!(
            "{:>12} {:>28} {:>20.12} {:>20.6e} {:>15.6}",
            format!("run {}", trial.run),
            "",
            value,
            error,
            trial.elapsed_seconds
        ),
        _ => format!(
            "{:>12}  FAILED: {}",
            format!("run {}", trial.run),
            trial.failure.as_deref().unwrap_or("no value")
        ),
    };
    line.push('\n');
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::metadata::build_report_meta;
    use leibniz_core::{ExperimentConfig, SchedulePolicy};
    use leibniz_report::{ConfigRecord, ConfigStatus, ConfigSummary, FailureInfo, ReportSummary};
    use leibniz_stats::ErrorConvention;

    fn record(policy: SchedulePolicy, chunk: Option<usize>) -> ConfigRecord {
        let config = ExperimentConfig::new(1_000_000, 16, policy, chunk, 5).unwrap();
        ConfigRecord::from(&config)
    }

    fn passed() -> ConfigResult {
        ConfigResult {
            config: record(SchedulePolicy::Dynamic, Some(64)),
            status: ConfigStatus::Passed,
            summary: Some(ConfigSummary {
                avg_value: 3.141591653589774,
                avg_error: 1.0e-6,
                avg_elapsed_seconds: 0.0012,
                min_elapsed_seconds: 0.001,
                max_elapsed_seconds: 0.0014,
                median_elapsed_seconds: 0.0012,
                std_dev_elapsed_seconds: 0.0001,
                trials: 5,
            }),
            trials: Vec::new(),
            failure: None,
            advisory: None,
        }
    }

    fn failed() -> ConfigResult {
        ConfigResult {
            config: record(SchedulePolicy::Auto, None),
            status: ConfigStatus::Failed,
            summary: None,
            trials: Vec::new(),
            failure: Some(FailureInfo {
                kind: "pool".to_string(),
                message: "failed to build worker pool".to_string(),
                run: 0,
            }),
            advisory: None,
        }
    }

    #[test]
    fn test_row_columns() {
        let row = format_row(&passed());
        assert!(row.starts_with("     1000000       16    dynamic       64"));
        assert!(row.contains("3.141591653590"));
        assert!(row.contains("1.000000e-6"));
        assert!(row.contains("0.001200"));
        assert!(row.ends_with('\n'));
    }

    #[test]
    fn test_failed_row_inline() {
        let row = format_row(&failed());
        assert!(row.contains("auto"));
        assert!(row.contains("       -  FAILED: failed to build worker pool"));
    }

    #[test]
    fn test_summary_block() {
        let report = Report {
            meta: build_report_meta(ErrorConvention::ErrorOfMean),
            results: vec![passed(), failed()],
            summary: ReportSummary {
                total_configs: 2,
                passed: 1,
                failed: 1,
                advisories: 0,
                total_duration_ms: 12.5,
            },
        };

        let output = format_summary(&report);
        assert!(output.contains("Total: 2  Passed: 1  Failed: 1"));
        assert!(output.contains("error-of-mean"));
        assert!(output.contains("Duration: 12.50 ms"));
    }

    #[test]
    fn test_trial_rows() {
        let ok = TrialRecord {
            run: 3,
            measured_value: Some(3.1415916535897743),
            elapsed_seconds: 0.25,
            error_vs_reference_pi: Some(1.0e-6),
            failure: None,
        };
        let row = format_trial_row(&ok);
        assert!(row.starts_with("       run 3"));
        assert!(row.contains("3.141591653590"));
        assert!(row.contains("1.000000e-6"));
        assert!(row.contains("0.250000"));

        let bad = TrialRecord {
            run: 0,
            measured_value: None,
            elapsed_seconds: 0.0,
            error_vs_reference_pi: None,
            failure: Some("worker panicked".to_string()),
        };
        assert_eq!(format_trial_row(&bad), "       run 0  FAILED: worker panicked\n");
    }
}
