#![warn(missing_docs)]
//! Leibniz Statistics
//!
//! Aggregates repeated trials of one configuration:
//! - Summary statistics (mean, median, std-dev, extremes, percentiles)
//! - Percentile calculation with linear interpolation
//! - Accuracy aggregation under a selectable [`ErrorConvention`]

mod accuracy;
mod percentiles;
mod summary;

pub use accuracy::{ErrorConvention, aggregate_error};
pub use percentiles::compute_percentile;
pub use summary::{SummaryStatistics, compute_summary, mean};
