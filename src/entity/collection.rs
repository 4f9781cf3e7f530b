//! Collections: roles under `roles/`, then playbooks under `playbooks/`.

use super::{child_dirs, playbook, role, walk_files, Resolver};
use crate::error::Result;
use crate::task::TaskRecord;
use std::path::Path;

/// Resolves the collection rooted at `dir`.
///
/// Each immediate subdirectory of `roles/` is a role; every regular file
/// below `playbooks/` is a playbook. Role records come first.
pub fn resolve(resolver: &Resolver, dir: &Path) -> Result<Vec<TaskRecord>> {
    let mut records = Vec::new();

    for role_dir in child_dirs(&dir.join("roles"))? {
        records.extend(role::resolve(resolver, &role_dir)?);
    }
    for playbook_file in walk_files(&dir.join("playbooks"))? {
        records.extend(playbook::resolve(resolver, &playbook_file)?);
    }

    tracing::debug!(collection = %dir.display(), tasks = records.len(), "collection resolved");
    Ok(records)
}
