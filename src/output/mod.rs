//! Output formatting for scan reports.
//!
//! | Format | Module | Use case |
//! |--------|--------|----------|
//! | [`Text`](OutputFormat::Text)     | [`text`]   | `file:line: SEVERITY: message` lines, editor/CI friendly |
//! | [`Pretty`](OutputFormat::Pretty) | [`pretty`] | Terminal / human review |
//! | [`Json`](OutputFormat::Json)     | [`json`]   | Automation / scripting  |
//! | [`Sarif`](OutputFormat::Sarif)   | [`sarif`]  | CI/CD integration       |
//!
//! Use [`format_report`] to render a [`ScanReport`] in any of the above
//! formats.

pub mod json;
pub mod pretty;
pub mod sarif;
pub mod text;

use crate::finding::ScanReport;

/// Supported output formats for scan reports.
#[derive(Debug, Clone, clap::ValueEnum)]
pub enum OutputFormat {
    /// One `file:line: SEVERITY: message` line per diagnostic.
    Text,
    /// Colored diagnostics with a summary line.
    Pretty,
    /// Machine-readable JSON.
    Json,
    /// [SARIF 2.1.0](https://sarifweb.azurewebsites.net/) for CI/CD tool integration.
    Sarif,
}

/// Formats a [`ScanReport`] in the requested [`OutputFormat`].
///
/// # Examples
///
/// ```rust,no_run
/// use steampunk_scanner::output::{format_report, OutputFormat};
/// # use steampunk_scanner::finding::ScanReport;
/// # fn example(report: &ScanReport) {
/// let json = format_report(report, &OutputFormat::Json);
/// println!("{json}");
/// # }
/// ```
pub fn format_report(report: &ScanReport, format: &OutputFormat) -> String {
    match format {
        OutputFormat::Text => text::format(report),
        OutputFormat::Pretty => pretty::format(report),
        OutputFormat::Json => json::format(report),
        OutputFormat::Sarif => sarif::format(report),
    }
}
