//! Standalone task files: a top-level list of tasks.

use super::Resolver;
use crate::error::{Error, Result};
use crate::task::{kind_of, normalize_tasks, TaskRecord};
use crate::yaml;
use serde_yaml::Value;
use std::path::Path;

/// Loads `path` as a task list and normalizes it without collections.
///
/// An empty file yields no records; a top-level mapping is read as a list
/// holding that one task.
pub fn resolve(resolver: &Resolver, path: &Path) -> Result<Vec<TaskRecord>> {
    let tasks = match yaml::load_file(path)? {
        Value::Sequence(tasks) => tasks,
        task @ Value::Mapping(_) => vec![task],
        Value::Null => Vec::new(),
        other => {
            return Err(Error::structure(
                path,
                format!("expected a list of tasks, found {}", kind_of(&other)),
            ))
        }
    };

    let records = normalize_tasks(tasks, &[], &resolver.source_name(path))?;
    tracing::debug!(path = %path.display(), tasks = records.len(), "task file resolved");
    Ok(records)
}
