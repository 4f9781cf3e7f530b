//! Entity-type auto-detection.
//!
//! Only playbooks are recognized: a YAML document whose play (a mapping, or
//! the single mapping of a one-element list) has at least one of
//! [`PLAYBOOK_MARKERS`] as a key. Everything else is skipped without
//! complaint.
//!
//! Files that fail to parse count as "not a playbook". Paths handed to an
//! explicit resolver still fail on malformed YAML. A file that parses and
//! carries a playbook marker is resolved as a playbook, so a structural
//! error in it (say, `tasks` holding a string) aborts the whole walk.

use super::{collect_files, playbook, Resolver, YAML_EXTENSIONS};
use crate::error::{Error, Result};
use crate::task::TaskRecord;
use crate::yaml;
use serde_yaml::Value;
use std::path::Path;

/// Top-level keys that only appear in plays.
pub const PLAYBOOK_MARKERS: &[&str] = &[
    "gather_facts",
    "hosts",
    "import_playbook",
    "post_tasks",
    "pre_tasks",
    "roles",
    "tasks",
];

/// Resolves every playbook found at `path`.
///
/// A file is inspected directly; a directory is walked recursively (in
/// file-name order) for `.yml`/`.yaml` files.
///
/// # Errors
///
/// [`Error::InvalidPath`] when `path` does not exist. A detected playbook
/// that then fails to resolve is reported like any explicit resolution.
pub fn detect(resolver: &Resolver, path: &Path) -> Result<Vec<TaskRecord>> {
    if path.is_file() {
        return detect_file(resolver, path);
    }
    if path.is_dir() {
        let mut records = Vec::new();
        for file in collect_files(path, YAML_EXTENSIONS) {
            records.extend(detect_file(resolver, &file)?);
        }
        return Ok(records);
    }

    Err(Error::InvalidPath {
        path: path.to_path_buf(),
        expected: "file or directory",
    })
}

fn detect_file(resolver: &Resolver, path: &Path) -> Result<Vec<TaskRecord>> {
    let doc = match yaml::load_file(path) {
        Ok(doc) => doc,
        Err(err) => {
            tracing::debug!("not a playbook: {err}");
            return Ok(vec![]);
        }
    };

    if looks_like_playbook(&doc) {
        tracing::debug!(path = %path.display(), "detected playbook");
        playbook::resolve_document(resolver, path, doc)
    } else {
        tracing::debug!(path = %path.display(), "skipping, not a playbook");
        Ok(vec![])
    }
}

/// Returns `true` when the document's play has a playbook marker key.
///
/// # Examples
///
/// ```
/// use steampunk_scanner::entity::detect::looks_like_playbook;
/// use steampunk_scanner::yaml::load_str;
///
/// assert!(looks_like_playbook(&load_str("- hosts: all\n  tasks: []\n").unwrap()));
/// assert!(!looks_like_playbook(&load_str("foo: bar\n").unwrap()));
/// ```
pub fn looks_like_playbook(doc: &Value) -> bool {
    let play = match doc {
        Value::Sequence(items) if items.len() == 1 => &items[0],
        Value::Mapping(_) => doc,
        _ => return false,
    };

    play.as_mapping().is_some_and(|play| {
        play.keys()
            .filter_map(Value::as_str)
            .any(|key| PLAYBOOK_MARKERS.contains(&key))
    })
}
