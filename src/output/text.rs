//! Plain diagnostic lines.

use crate::finding::ScanReport;

/// One line per diagnostic, newline-terminated; empty when there are none.
pub fn format(report: &ScanReport) -> String {
    let mut out = String::new();
    for diagnostic in &report.diagnostics {
        out.push_str(&diagnostic.to_string());
        out.push('\n');
    }
    out
}
