//! Report Metadata
//!
//! Captures the crate version, UTC timestamp, host description and the
//! runner settings that shaped the numbers in the report.

use chrono::Utc;
use leibniz_core::REFERENCE_PI;
use leibniz_report::{ReportMeta, RunnerSettings, SystemInfo};
use leibniz_stats::ErrorConvention;

/// Build report metadata for a sweep run under `error_convention`
pub fn build_report_meta(error_convention: ErrorConvention) -> ReportMeta {
    ReportMeta {
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
        system: SystemInfo::current(),
        settings: RunnerSettings {
            error_convention,
            reference_pi: REFERENCE_PI,
        },
    }
}
