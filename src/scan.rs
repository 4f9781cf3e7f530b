//! Scan orchestration.
//!
//! [`ScanInputs::resolve`] turns the paths a user supplied into one ordered
//! task list, [`run_scan`] submits it, and [`map_findings`] pairs the
//! service's answer with the submitted tasks to produce [`Diagnostic`]s.
//!
//! The pairing is purely positional: finding *i* belongs to task *i*. The
//! service guarantees that order; there is no other correlation key.

use crate::api::Client;
use crate::entity::{AnsibleEntity, Resolver};
use crate::error::{Error, Result};
use crate::finding::{Diagnostic, FindingRecord, ScanReport, Severity};
use crate::task::TaskRecord;
use std::path::PathBuf;

/// Paths to scan, grouped by declared entity kind.
#[derive(Debug, Clone, Default)]
pub struct ScanInputs {
    pub tasks: Vec<PathBuf>,
    pub playbooks: Vec<PathBuf>,
    pub roles: Vec<PathBuf>,
    pub collections: Vec<PathBuf>,
    /// Paths whose kind is auto-detected.
    pub detect: Vec<PathBuf>,
}

impl ScanInputs {
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
            && self.playbooks.is_empty()
            && self.roles.is_empty()
            && self.collections.is_empty()
            && self.detect.is_empty()
    }

    /// Resolves every input into a single task list.
    ///
    /// Order: task files, playbooks, roles, collections, then auto-detected
    /// paths; within each group, the order the paths were given. The first
    /// failure aborts the whole resolution.
    pub fn resolve(&self, resolver: &Resolver) -> Result<Vec<TaskRecord>> {
        let mut records = Vec::new();
        records.extend(resolver.resolve_all(AnsibleEntity::Task, &self.tasks)?);
        records.extend(resolver.resolve_all(AnsibleEntity::Playbook, &self.playbooks)?);
        records.extend(resolver.resolve_all(AnsibleEntity::Role, &self.roles)?);
        records.extend(resolver.resolve_all(AnsibleEntity::Collection, &self.collections)?);
        for path in &self.detect {
            records.extend(resolver.detect(path)?);
        }
        Ok(records)
    }
}

/// Submits `tasks` and builds the report from the answer.
///
/// An empty task list produces an empty, passing report without contacting
/// the service.
pub fn run_scan(client: &Client, tasks: &[TaskRecord]) -> Result<ScanReport> {
    if tasks.is_empty() {
        tracing::warn!("no tasks found, nothing to scan");
        return Ok(ScanReport::new(0, vec![]));
    }

    tracing::info!(tasks = tasks.len(), endpoint = client.base_url(), "submitting scan");
    let findings = client.scan_tasks(tasks)?;
    let diagnostics = map_findings(tasks, &findings)?;
    Ok(ScanReport::new(tasks.len(), diagnostics))
}

/// Pairs findings with the tasks that produced them, by position.
///
/// A short answer covers only the leading tasks.
///
/// # Errors
///
/// [`Error::ResponseLength`] when there are more findings than tasks.
///
/// # Examples
///
/// ```
/// use steampunk_scanner::finding::FindingRecord;
/// use steampunk_scanner::scan::map_findings;
/// use steampunk_scanner::task::TaskRecord;
///
/// let task = TaskRecord {
///     directives: Default::default(),
///     collections: vec![],
///     source_file: "playbook.yml".into(),
///     source_line: Some(5),
/// };
/// let finding = FindingRecord {
///     certified: false,
///     fqcn: Some("ns.col.mod".into()),
///     errors: vec!["bad arg".into()],
///     hints: vec![],
/// };
///
/// let lines: Vec<String> = map_findings(&[task], &[finding])
///     .unwrap()
///     .iter()
///     .map(ToString::to_string)
///     .collect();
/// assert_eq!(lines, [
///     "playbook.yml:5: WARNING: The ns.col.mod module is not certified.",
///     "playbook.yml:5: ERROR: bad arg",
/// ]);
/// ```
pub fn map_findings(tasks: &[TaskRecord], findings: &[FindingRecord]) -> Result<Vec<Diagnostic>> {
    if findings.len() > tasks.len() {
        return Err(Error::ResponseLength {
            requested: tasks.len(),
            returned: findings.len(),
        });
    }
    if findings.len() < tasks.len() {
        tracing::warn!(
            "service answered for {} of {} tasks",
            findings.len(),
            tasks.len()
        );
    }

    Ok(tasks
        .iter()
        .zip(findings)
        .flat_map(|(task, finding)| diagnostics_for(task, finding))
        .collect())
}

/// WARNING for an uncertified module, then every ERROR, then every HINT.
fn diagnostics_for(task: &TaskRecord, finding: &FindingRecord) -> Vec<Diagnostic> {
    let at = |severity: Severity, message: String| Diagnostic {
        file: task.source_file.clone(),
        line: task.source_line,
        severity,
        message,
    };

    let mut diagnostics = Vec::new();
    if let Some(fqcn) = finding.fqcn.as_deref().filter(|fqcn| !fqcn.is_empty()) {
        if !finding.certified {
            diagnostics.push(at(
                Severity::Warning,
                format!("The {fqcn} module is not certified."),
            ));
        }
    }
    diagnostics.extend(
        finding
            .errors
            .iter()
            .map(|error| at(Severity::Error, error.clone())),
    );
    diagnostics.extend(
        finding
            .hints
            .iter()
            .map(|hint| at(Severity::Hint, hint.clone())),
    );
    diagnostics
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(file: &str, line: Option<usize>) -> TaskRecord {
        TaskRecord {
            directives: Default::default(),
            collections: vec![],
            source_file: file.to_string(),
            source_line: line,
        }
    }

    fn finding(certified: bool, fqcn: Option<&str>, errors: &[&str], hints: &[&str]) -> FindingRecord {
        FindingRecord {
            certified,
            fqcn: fqcn.map(str::to_string),
            errors: errors.iter().map(|e| e.to_string()).collect(),
            hints: hints.iter().map(|h| h.to_string()).collect(),
        }
    }

    fn lines(diagnostics: &[Diagnostic]) -> Vec<String> {
        diagnostics.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn uncertified_with_error() {
        let diagnostics = map_findings(
            &[task("playbook.yml", Some(5))],
            &[finding(false, Some("ns.col.mod"), &["bad arg"], &[])],
        )
        .unwrap();
        assert_eq!(
            lines(&diagnostics),
            vec![
                "playbook.yml:5: WARNING: The ns.col.mod module is not certified.",
                "playbook.yml:5: ERROR: bad arg",
            ]
        );
    }

    #[test]
    fn warning_then_errors_then_hints() {
        let diagnostics = map_findings(
            &[task("a.yml", Some(1))],
            &[finding(false, Some("x.y.z"), &["e1", "e2"], &["h1", "h2"])],
        )
        .unwrap();
        let severities: Vec<Severity> = diagnostics.iter().map(|d| d.severity).collect();
        assert_eq!(
            severities,
            vec![
                Severity::Warning,
                Severity::Error,
                Severity::Error,
                Severity::Hint,
                Severity::Hint,
            ]
        );
    }

    #[test]
    fn diagnostic_count_matches_findings() {
        let tasks = vec![task("a.yml", Some(1)), task("a.yml", Some(4)), task("b.yml", Some(2))];
        let findings = vec![
            finding(true, Some("ansible.builtin.copy"), &[], &["use mode"]),
            finding(false, Some("c.d.e"), &[], &[]),
            finding(false, None, &["oops"], &[]),
        ];
        let diagnostics = map_findings(&tasks, &findings).unwrap();
        assert_eq!(diagnostics.len(), 3);
        assert_eq!(diagnostics[0].to_string(), "a.yml:1: HINT: use mode");
        assert_eq!(diagnostics[1].line, Some(4));
        assert_eq!(diagnostics[2].to_string(), "b.yml:2: ERROR: oops");
    }

    #[test]
    fn certified_module_has_no_warning() {
        let diagnostics = map_findings(
            &[task("a.yml", Some(1))],
            &[finding(true, Some("ansible.builtin.ping"), &[], &[])],
        )
        .unwrap();
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn short_response_truncates() {
        let tasks = vec![task("a.yml", Some(1)), task("a.yml", Some(2))];
        let diagnostics = map_findings(&tasks, &[finding(true, None, &["x"], &[])]).unwrap();
        assert_eq!(lines(&diagnostics), vec!["a.yml:1: ERROR: x"]);
    }

    #[test]
    fn long_response_is_an_error() {
        let err = map_findings(
            &[task("a.yml", Some(1))],
            &[FindingRecord::default(), FindingRecord::default()],
        )
        .unwrap_err();
        assert!(matches!(
            err,
            Error::ResponseLength {
                requested: 1,
                returned: 2
            }
        ));
    }

    #[test]
    fn unknown_line_keeps_the_format() {
        let diagnostics =
            map_findings(&[task("a.yml", None)], &[finding(true, None, &[], &["h"])]).unwrap();
        assert_eq!(lines(&diagnostics), vec!["a.yml:?: HINT: h"]);
    }

    #[test]
    fn inputs_resolve_in_group_order() {
        let dir = tempfile::tempdir().unwrap();
        let tasks = dir.path().join("tasks.yml");
        let play = dir.path().join("play.yml");
        std::fs::write(&tasks, "- ping:\n").unwrap();
        std::fs::write(&play, "- hosts: all\n  tasks:\n    - setup:\n").unwrap();

        let inputs = ScanInputs {
            tasks: vec![tasks],
            detect: vec![play.clone()],
            playbooks: vec![play],
            ..ScanInputs::default()
        };
        let records = inputs.resolve(&Resolver::relative_to(dir.path())).unwrap();
        let files: Vec<&str> = records.iter().map(|r| r.source_file.as_str()).collect();
        assert_eq!(files, vec!["tasks.yml", "play.yml", "play.yml"]);
    }

    #[test]
    fn first_invalid_input_aborts() {
        let dir = tempfile::tempdir().unwrap();
        let inputs = ScanInputs {
            roles: vec![dir.path().join("missing-role")],
            ..ScanInputs::default()
        };
        let err = inputs.resolve(&Resolver::new()).unwrap_err();
        assert!(matches!(err, Error::InvalidPath { .. }));
    }
}
