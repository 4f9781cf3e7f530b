//! Task normalization.
//!
//! Turns raw task mappings, as produced by [`crate::yaml`], into
//! [`TaskRecord`]s: the scan-ready unit sent to the scanning service and the
//! unit findings are reported against.
//!
//! Per task, in order:
//!
//! 1. `name` is dropped.
//! 2. The [`LINE_KEY`] marker is taken off and becomes the source line.
//! 3. Legacy `action:` invocations are re-keyed under their module name.
//! 4. `block:` tasks are replaced by their (recursively normalized) children.
//! 5. Every directive value is reduced to its shape: mappings become the set
//!    of their keys, anything else becomes `null`.

use crate::error::{Error, Result};
use crate::yaml::LINE_KEY;
use indexmap::{IndexMap, IndexSet};
use serde_yaml::{Mapping, Value};

/// Directive name → parameter names (`None` for non-mapping values).
pub type Directives = IndexMap<String, Option<IndexSet<String>>>;

/// One normalized task.
///
/// Serializes as a flat object: the directives at the top level next to
/// `collections`, `__file__` and `__line__`, which is the shape the scanning
/// service expects.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct TaskRecord {
    #[serde(flatten)]
    pub directives: Directives,
    pub collections: Vec<String>,
    #[serde(rename = "__file__")]
    pub source_file: String,
    #[serde(rename = "__line__")]
    pub source_line: Option<usize>,
}

impl TaskRecord {
    /// Parameter names of a directive, or `None` when the directive is
    /// absent or was not given a mapping.
    pub fn params(&self, directive: &str) -> Option<&IndexSet<String>> {
        self.directives.get(directive).and_then(Option::as_ref)
    }
}

/// Normalizes a task list.
///
/// Output order follows input order, except that `block` tasks are expanded
/// in place, depth-first.
///
/// # Errors
///
/// [`Error::Structure`] when a task entry (or a `block` body) does not have
/// the shape of a task list.
///
/// # Examples
///
/// ```
/// use steampunk_scanner::{task::normalize_tasks, yaml::load_str};
///
/// let doc = load_str("- name: x\n  debug:\n    msg: hi\n").unwrap();
/// let tasks = doc.as_sequence().unwrap().clone();
/// let records = normalize_tasks(tasks, &[], "tasks.yml").unwrap();
///
/// assert_eq!(records.len(), 1);
/// assert!(records[0].params("debug").unwrap().contains("msg"));
/// assert_eq!(records[0].source_line, Some(1));
/// ```
pub fn normalize_tasks(
    tasks: Vec<Value>,
    collections: &[String],
    source_file: &str,
) -> Result<Vec<TaskRecord>> {
    let mut records = Vec::with_capacity(tasks.len());
    for task in tasks {
        normalize_into(task, collections, source_file, &mut records)?;
    }
    Ok(records)
}

fn normalize_into(
    task: Value,
    collections: &[String],
    source_file: &str,
    out: &mut Vec<TaskRecord>,
) -> Result<()> {
    let mut task = match task {
        Value::Mapping(task) => task,
        other => {
            return Err(Error::structure(
                source_file,
                format!("expected a task mapping, found {}", kind_of(&other)),
            ))
        }
    };

    task.shift_remove("name");
    let source_line = task
        .shift_remove(LINE_KEY)
        .and_then(|line| line.as_u64())
        .map(|line| line as usize);

    rewrite_action(&mut task);

    if let Some(block) = task.shift_remove("block") {
        let nested = match block {
            Value::Sequence(nested) => nested,
            Value::Null => Vec::new(),
            other => {
                return Err(Error::structure(
                    source_file,
                    format!("expected a list under `block`, found {}", kind_of(&other)),
                ))
            }
        };
        for nested_task in nested {
            normalize_into(nested_task, collections, source_file, out)?;
        }
        return Ok(());
    }

    let directives = task
        .into_iter()
        .filter_map(|(key, value)| Some((key_name(&key)?, reduce(value))))
        // The record's own `collections` field replaces the task keyword.
        .filter(|(name, _)| name != "collections")
        .collect();

    out.push(TaskRecord {
        directives,
        collections: collections.to_vec(),
        source_file: source_file.to_string(),
        source_line,
    });
    Ok(())
}

/// Re-keys `action: {module: foo, ...}` as `foo: {...}`.
///
/// The `action` value is searched first, then the remaining values in
/// document order. Tasks without such a nested mapping are left alone.
fn rewrite_action(task: &mut Mapping) {
    if !task.contains_key("action") {
        return;
    }

    let mut candidates = vec![Value::String("action".to_string())];
    candidates.extend(
        task.keys()
            .filter(|key| key.as_str() != Some("action"))
            .cloned(),
    );

    let Some((holder, module)) = candidates.into_iter().find_map(|key| {
        let module = task.get(&key)?.as_mapping()?.get("module")?.as_str()?;
        let module = module.to_string();
        Some((key, module))
    }) else {
        return;
    };

    if let Some(Value::Mapping(mut args)) = task.shift_remove(&holder) {
        args.shift_remove("module");
        task.shift_remove("action");
        task.insert(Value::String(module), Value::Mapping(args));
    }
}

fn reduce(value: Value) -> Option<IndexSet<String>> {
    match value {
        Value::Mapping(params) => Some(
            params
                .keys()
                .filter_map(key_name)
                .filter(|name| name != LINE_KEY)
                .collect(),
        ),
        _ => None,
    }
}

fn key_name(key: &Value) -> Option<String> {
    match key {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null => Some("null".to_string()),
        _ => None,
    }
}

pub(crate) fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "nothing",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a list",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
