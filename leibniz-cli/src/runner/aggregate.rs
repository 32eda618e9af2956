//! Trial Aggregation
//!
//! Reduces the trials of a passed config to a [`ConfigSummary`]. Timing
//! statistics come from `leibniz-stats`; the error follows the configured
//! [`ErrorConvention`].

use leibniz_report::{ConfigSummary, TrialRecord};
use leibniz_stats::{ErrorConvention, aggregate_error, compute_summary, mean};

/// Summarize the successful trials in `trials`
pub fn summarize(trials: &[TrialRecord], reference: f64, convention: ErrorConvention) -> ConfigSummary {
    let values: Vec<f64> = trials.iter().filter_map(|t| t.measured_value).collect();
    let elapsed: Vec<f64> = trials
        .iter()
        .filter(|t| t.succeeded())
        .map(|t| t.elapsed_seconds)
        .collect();

    let timing = compute_summary(&elapsed);

    ConfigSummary {
        avg_value: mean(&values),
        avg_error: aggregate_error(&values, reference, convention),
        avg_elapsed_seconds: timing.mean,
        min_elapsed_seconds: timing.min,
        max_elapsed_seconds: timing.max,
        median_elapsed_seconds: timing.median,
        std_dev_elapsed_seconds: timing.std_dev,
        trials: values.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trial(run: usize, value: f64, elapsed: f64) -> TrialRecord {
        TrialRecord {
            run,
            measured_value: Some(value),
            elapsed_seconds: elapsed,
            error_vs_reference_pi: Some((value - 3.0).abs()),
            failure: None,
        }
    }

    #[test]
    fn test_summarize_timing() {
        let trials = [trial(0, 3.0, 1.0), trial(1, 3.0, 3.0), trial(2, 3.0, 2.0)];
        let summary = summarize(&trials, 3.0, ErrorConvention::ErrorOfMean);

        assert_eq!(summary.trials, 3);
        assert_eq!(summary.avg_elapsed_seconds, 2.0);
        assert_eq!(summary.min_elapsed_seconds, 1.0);
        assert_eq!(summary.max_elapsed_seconds, 3.0);
        assert_eq!(summary.median_elapsed_seconds, 2.0);
        assert_eq!(summary.std_dev_elapsed_seconds, 1.0);
    }

    #[test]
    fn test_avg_error_matches_avg_value() {
        let trials = [trial(0, 3.5, 1.0), trial(1, 2.75, 1.0)];
        let summary = summarize(&trials, 3.0, ErrorConvention::ErrorOfMean);

        assert_eq!(summary.avg_value, 3.125);
        assert_eq!(summary.avg_error, (summary.avg_value - 3.0).abs());

        let summary = summarize(&trials, 3.0, ErrorConvention::MeanOfErrors);
        assert_eq!(summary.avg_error, 0.375);
    }

    #[test]
    fn test_failed_trials_ignored() {
        let failed = TrialRecord {
            run: 1,
            measured_value: None,
            elapsed_seconds: 100.0,
            error_vs_reference_pi: None,
            failure: Some("boom".to_string()),
        };
        let trials = [trial(0, 3.0, 1.0), failed];
        let summary = summarize(&trials, 3.0, ErrorConvention::ErrorOfMean);

        assert_eq!(summary.trials, 1);
        assert_eq!(summary.max_elapsed_seconds, 1.0);
    }
}
