//! Roles: every file below `tasks/`, then every file below `handlers/`.

use super::{task_file, walk_files, Resolver};
use crate::error::Result;
use crate::task::TaskRecord;
use std::path::Path;

/// Role subdirectories holding task lists, in resolution order.
pub const TASK_DIRS: &[&str] = &["tasks", "handlers"];

/// Resolves every task file of the role rooted at `dir`.
///
/// Files are read depth-first in file-name order, `tasks/` before
/// `handlers/`. Any file that is not a valid task list aborts the whole
/// role.
pub fn resolve(resolver: &Resolver, dir: &Path) -> Result<Vec<TaskRecord>> {
    let mut records = Vec::new();
    for sub in TASK_DIRS {
        for file in walk_files(&dir.join(sub))? {
            records.extend(task_file::resolve(resolver, &file)?);
        }
    }
    tracing::debug!(role = %dir.display(), tasks = records.len(), "role resolved");
    Ok(records)
}
