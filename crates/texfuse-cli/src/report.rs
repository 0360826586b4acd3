//! JSON run report.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use texfuse_core::{FailureRecord, OutputRecord, SkipRecord};

/// Summary report for one batch run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    /// RFC3339 UTC timestamp of the run.
    pub timestamp: String,
    /// Which tool produced the report (`foliage` or `repack`).
    pub tool: String,
    /// Scanned root directory, for the repack tool.
    pub root: Option<String>,
    /// Number of input files considered.
    pub input_count: usize,
    /// Asset groups discovered in the inputs.
    pub groups_found: usize,
    /// Groups that passed the tool's filters and were processed.
    pub groups_processed: usize,
    /// Output files written.
    pub outputs_written: usize,
    /// Operations that failed (load, dimension, or save errors).
    pub operations_failed: usize,
    /// Operations skipped for a missing required input.
    pub operations_skipped: usize,
    /// Total runtime in seconds.
    pub runtime_seconds: f64,
    /// Every written output with its dimensions and content hash.
    pub outputs: Vec<OutputRecord>,
    /// Every failed operation with its diagnostic.
    pub failures: Vec<FailureRecord>,
    /// Every skipped operation with the missing input kinds.
    pub skips: Vec<SkipRecord>,
}

/// Write the report as pretty-printed JSON.
pub fn write_report(path: &Path, summary: &RunSummary) -> Result<()> {
    let json = serde_json::to_string_pretty(summary).context("failed to serialize run report")?;
    std::fs::write(path, json)
        .with_context(|| format!("failed to write report: {}", path.display()))?;
    Ok(())
}

/// Lightweight RFC3339 UTC timestamp without a chrono dependency.
pub fn timestamp() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    let seconds_since_epoch = now.as_secs() as i64;

    const SECS_PER_DAY: i64 = 86_400;

    let days = seconds_since_epoch.div_euclid(SECS_PER_DAY);
    let secs_of_day = seconds_since_epoch.rem_euclid(SECS_PER_DAY);
    let hours = secs_of_day / 3600;
    let minutes = (secs_of_day % 3600) / 60;
    let seconds = secs_of_day % 60;

    let (year, month, day) = civil_from_days(days);

    format!(
        "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}Z",
        year, month, day, hours, minutes, seconds
    )
}

// Convert days since 1970-01-01 to YYYY-MM-DD using the proleptic Gregorian
// calendar (Howard Hinnant's "civil_from_days" algorithm).
fn civil_from_days(days: i64) -> (i32, u32, u32) {
    let z = days + 719_468;
    let era = if z >= 0 { z } else { z - 146_096 }.div_euclid(146_097);
    let doe = z - era * 146_097; // [0, 146096]
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096).div_euclid(365); // [0, 399]
    let y = yoe + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100); // [0, 365]
    let mp = (5 * doy + 2).div_euclid(153); // [0, 11]
    let day = doy - (153 * mp + 2).div_euclid(5) + 1; // [1, 31]
    let month = mp + if mp < 10 { 3 } else { -9 }; // [1, 12]
    let year = y + if month <= 2 { 1 } else { 0 };
    (year as i32, month as u32, day as u32)
}
