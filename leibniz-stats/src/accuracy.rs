//! Accuracy Aggregation
//!
//! Repeated trials of one configuration can be reduced to a single error in
//! two ways, and they disagree whenever trial values scatter on both sides of
//! the reference. [`ErrorConvention`] makes the choice explicit.

use crate::summary::mean;
use serde::{Deserialize, Serialize};

/// How the error of repeated trials is aggregated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorConvention {
    /// `|mean(values) - reference|`
    #[default]
    ErrorOfMean,
    /// `mean(|value - reference|)`
    MeanOfErrors,
}

impl ErrorConvention {
    /// Kebab-case name used in config files and reports
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorConvention::ErrorOfMean => "error-of-mean",
            ErrorConvention::MeanOfErrors => "mean-of-errors",
        }
    }
}

impl std::fmt::Display for ErrorConvention {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ErrorConvention {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "error-of-mean" | "error_of_mean" => Ok(ErrorConvention::ErrorOfMean),
            "mean-of-errors" | "mean_of_errors" => Ok(ErrorConvention::MeanOfErrors),
            other => Err(format!("Unknown error convention: {}", other)),
        }
    }
}

/// Aggregate error of `values` against `reference` under `convention`.
///
/// Returns 0.0 for no values.
pub fn aggregate_error(values: &[f64], reference: f64, convention: ErrorConvention) -> f64 {
    if values.is_empty() {
        return 0.0;
    }

    match convention {
        ErrorConvention::ErrorOfMean => (mean(values) - reference).abs(),
        ErrorConvention::MeanOfErrors => {
            values.iter().map(|v| (v - reference).abs()).sum::<f64>() / values.len() as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conventions_disagree_on_scattered_values() {
        let values = [2.9, 3.1];
        let of_mean = aggregate_error(&values, 3.0, ErrorConvention::ErrorOfMean);
        let mean_of = aggregate_error(&values, 3.0, ErrorConvention::MeanOfErrors);

        assert!(of_mean < 1e-12);
        assert!((mean_of - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_conventions_agree_on_identical_values() {
        let values = [3.25; 5];
        let of_mean = aggregate_error(&values, 3.0, ErrorConvention::ErrorOfMean);
        let mean_of = aggregate_error(&values, 3.0, ErrorConvention::MeanOfErrors);
        assert!((of_mean - mean_of).abs() < 1e-15);
    }

    #[test]
    fn test_default_is_error_of_mean() {
        assert_eq!(ErrorConvention::default(), ErrorConvention::ErrorOfMean);
    }

    #[test]
    fn test_parse() {
        assert_eq!("error-of-mean".parse(), Ok(ErrorConvention::ErrorOfMean));
        assert_eq!("Mean_Of_Errors".parse(), Ok(ErrorConvention::MeanOfErrors));
        assert!("median".parse::<ErrorConvention>().is_err());
    }

    #[test]
    fn test_empty_values() {
        assert_eq!(aggregate_error(&[], 3.0, ErrorConvention::MeanOfErrors), 0.0);
    }
}
