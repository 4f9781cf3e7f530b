//! Playbooks.
//!
//! Only the first play of a playbook is scanned. Its `collections` keyword
//! is attached to every task of the play.

use super::Resolver;
use crate::error::{Error, Result};
use crate::task::{kind_of, normalize_tasks, TaskRecord};
use crate::yaml::{self, LINE_KEY};
use serde_yaml::Value;
use std::path::Path;

/// Loads and resolves a playbook file.
pub fn resolve(resolver: &Resolver, path: &Path) -> Result<Vec<TaskRecord>> {
    let doc = yaml::load_file(path)?;
    resolve_document(resolver, path, doc)
}

/// Resolves an already loaded playbook document read from `path`.
///
/// A top-level mapping is accepted as a single play.
pub fn resolve_document(resolver: &Resolver, path: &Path, doc: Value) -> Result<Vec<TaskRecord>> {
    let play = match doc {
        Value::Sequence(plays) => {
            if plays.len() > 1 {
                tracing::warn!(
                    path = %path.display(),
                    "only the first of {} plays is scanned",
                    plays.len()
                );
            }
            match plays.into_iter().next() {
                Some(play) => play,
                None => return Ok(vec![]),
            }
        }
        play @ Value::Mapping(_) => play,
        Value::Null => return Ok(vec![]),
        other => {
            return Err(Error::structure(
                path,
                format!("expected a list of plays, found {}", kind_of(&other)),
            ))
        }
    };

    let mut play = match play {
        Value::Mapping(play) => play,
        other => {
            return Err(Error::structure(
                path,
                format!("expected a play mapping, found {}", kind_of(&other)),
            ))
        }
    };

    play.shift_remove("name");
    play.shift_remove("hosts");
    play.shift_remove(LINE_KEY);

    let collections = match play.shift_remove("collections") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::String(collection)) => vec![collection],
        Some(Value::Sequence(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        Some(other) => {
            return Err(Error::structure(
                path,
                format!("expected a list under `collections`, found {}", kind_of(&other)),
            ))
        }
    };

    let tasks = match play.shift_remove("tasks") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Sequence(tasks)) => tasks,
        Some(other) => {
            return Err(Error::structure(
                path,
                format!("expected a list under `tasks`, found {}", kind_of(&other)),
            ))
        }
    };

    let records = normalize_tasks(tasks, &collections, &resolver.source_name(path))?;
    tracing::debug!(path = %path.display(), tasks = records.len(), "playbook resolved");
    Ok(records)
}
