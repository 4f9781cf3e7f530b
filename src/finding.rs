use std::fmt;

/// Severity of a reported diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Warning,
    Error,
    Hint,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "WARNING"),
            Severity::Error => write!(f, "ERROR"),
            Severity::Hint => write!(f, "HINT"),
        }
    }
}

/// One element of the scanning service's response.
///
/// Carries no key of its own: element *i* describes task *i* of the request.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FindingRecord {
    #[serde(default = "certified_default", deserialize_with = "certified_or_default")]
    pub certified: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub errors: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub hints: Vec<String>,
    #[serde(default)]
    pub fqcn: Option<String>,
}

fn certified_default() -> bool {
    true
}

/// An explicit `null` reads the same as an absent field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + serde::Deserialize<'de>,
{
    Ok(<Option<T> as serde::Deserialize>::deserialize(deserializer)?.unwrap_or_default())
}

fn certified_or_default<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let certified = <Option<bool> as serde::Deserialize>::deserialize(deserializer)?;
    Ok(certified.unwrap_or_else(certified_default))
}

impl Default for FindingRecord {
    fn default() -> Self {
        FindingRecord {
            certified: true,
            errors: vec![],
            hints: vec![],
            fqcn: None,
        }
    }
}

/// A finding pinned to a source location.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Diagnostic {
    pub file: String,
    pub line: Option<usize>,
    pub severity: Severity,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    /// `<file>:<line>: <SEVERITY>: <message>`, with `?` for an unknown line.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "{}:{}: {}: {}", self.file, line, self.severity, self.message),
            None => write!(f, "{}:?: {}: {}", self.file, self.severity, self.message),
        }
    }
}

#[derive(Debug, serde::Serialize)]
pub struct ScanReport {
    pub scan_timestamp: String,
    pub tasks_scanned: usize,
    pub diagnostics: Vec<Diagnostic>,
    pub passed: bool,
}

impl ScanReport {
    pub fn new(tasks_scanned: usize, diagnostics: Vec<Diagnostic>) -> Self {
        let passed = !diagnostics.iter().any(|d| d.severity == Severity::Error);
        ScanReport {
            scan_timestamp: chrono::Utc::now().to_rfc3339(),
            tasks_scanned,
            diagnostics,
            passed,
        }
    }

    /// Count warnings, errors, and hints in a single pass.
    ///
    /// Returns `(warnings, errors, hints)`.
    pub fn count_by_severity(&self) -> (usize, usize, usize) {
        self.diagnostics
            .iter()
            .fold((0, 0, 0), |(w, e, h), d| match d.severity {
                Severity::Warning => (w + 1, e, h),
                Severity::Error => (w, e + 1, h),
                Severity::Hint => (w, e, h + 1),
            })
    }
}
