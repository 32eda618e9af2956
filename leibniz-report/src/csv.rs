//! CSV Output
//!
//! One line per config. Rows can be written as results stream in; the
//! header is available separately for that purpose.

use crate::report::ConfigResult;

/// Column header line (without trailing newline)
pub const CSV_HEADER: &str = "n,threads,schedule,chunk_size,runs,status,avg_value,avg_error,avg_elapsed_seconds,min_elapsed_seconds,max_elapsed_seconds,error";

/// Format one result as a CSV line (without trailing newline)
pub fn csv_row(result: &ConfigResult) -> String {
    let config = &result.config;
    let chunk = config.chunk_size.map(|c| c.to_string()).unwrap_or_default();
    let status = if result.passed() { "passed" } else { "failed" };

    let stats = match &result.summary {
        Some(s) => format!(
            "{},{},{},{},{}",
            s.avg_value,
            s.avg_error,
            s.avg_elapsed_seconds,
            s.min_elapsed_seconds,
            s.max_elapsed_seconds
        ),
        None => ",,,,".to_string(),
    };

    let error = result
        .failure
        .as_ref()
        .map(|f| escape(&f.message))
        .unwrap_or_default();

    format!(
        "{},{},{},{},{},{},{},{}",
        config.n, config.threads, config.schedule, chunk, config.runs, status, stats, error
    )
}

fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
