//! Summary Statistics
//!
//! Repeated trials of one configuration are few (typically five), so no
//! outlier rejection is applied: every sample contributes to the mean.

use crate::percentiles::compute_percentile;

/// Summary statistics over a set of samples
#[derive(Debug, Clone, Default)]
pub struct SummaryStatistics {
    // Central tendency
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,

    // Extremes
    pub min: f64,
    pub max: f64,

    // Percentiles
    pub p90: f64,
    pub p95: f64,

    pub sample_count: usize,
}

/// Arithmetic mean, or 0.0 for no samples
pub fn mean(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        0.0
    } else {
        samples.iter().sum::<f64>() / samples.len() as f64
    }
}

/// Compute summary statistics
pub fn compute_summary(samples: &[f64]) -> SummaryStatistics {
    if samples.is_empty() {
        return SummaryStatistics::default();
    }

    let mean = mean(samples);

    let std_dev = if samples.len() < 2 {
        0.0
    } else {
        let variance = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>()
            / (samples.len() - 1) as f64;
        variance.sqrt()
    };

    let min = samples.iter().copied().fold(f64::INFINITY, f64::min);
    let max = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    SummaryStatistics {
        mean,
        median: compute_percentile(samples, 50.0),
        std_dev,
        min,
        max,
        p90: compute_percentile(samples, 90.0),
        p95: compute_percentile(samples, 95.0),
        sample_count: samples.len(),
    }
}
