//! JSON output formatter.

use crate::finding::{Diagnostic, ScanReport};

#[derive(serde::Serialize)]
struct JsonOutput<'a> {
    scan_timestamp: &'a str,
    tasks_scanned: usize,
    passed: bool,
    summary: Summary,
    diagnostics: &'a [Diagnostic],
}

#[derive(serde::Serialize)]
struct Summary {
    warnings: usize,
    errors: usize,
    hints: usize,
}

/// Formats a [`ScanReport`] as pretty-printed JSON.
///
/// # Panics
///
/// Panics if the report cannot be serialized (should not happen with valid data).
pub fn format(report: &ScanReport) -> String {
    let (warnings, errors, hints) = report.count_by_severity();
    let output = JsonOutput {
        scan_timestamp: &report.scan_timestamp,
        tasks_scanned: report.tasks_scanned,
        passed: report.passed,
        summary: Summary {
            warnings,
            errors,
            hints,
        },
        diagnostics: &report.diagnostics,
    };

    serde_json::to_string_pretty(&output).expect("JSON serialization failed")
}
