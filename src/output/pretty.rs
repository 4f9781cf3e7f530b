//! Human-readable colored text formatter.
//!
//! Same lines as the [`text`](super::text) format, with the severity token
//! colored, followed by a one-line summary.

use crate::finding::{ScanReport, Severity};
use colored::Colorize;

pub fn format(report: &ScanReport) -> String {
    let mut out = String::new();

    for diagnostic in &report.diagnostics {
        let severity = match diagnostic.severity {
            Severity::Error => "ERROR".red().bold().to_string(),
            Severity::Warning => "WARNING".yellow().bold().to_string(),
            Severity::Hint => "HINT".blue().to_string(),
        };
        let line = diagnostic
            .line
            .map(|line| line.to_string())
            .unwrap_or_else(|| "?".to_string());
        let location = format!("{}:{}:", diagnostic.file, line);

        out.push_str(&format!(
            "{location} {severity}: {message}\n",
            location = location.dimmed(),
            message = diagnostic.message,
        ));
    }
    if !report.diagnostics.is_empty() {
        out.push('\n');
    }

    let status_str = if report.passed {
        "PASSED".green().bold().to_string()
    } else {
        "FAILED".red().bold().to_string()
    };

    let (warnings, errors, hints) = report.count_by_severity();
    out.push_str(&format!(
        "Result: {status_str}  |  {} tasks scanned, {} errors, {} warnings, {} hints\n",
        report.tasks_scanned, errors, warnings, hints,
    ));

    out
}
