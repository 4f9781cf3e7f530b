//! Ansible entity resolution.
//!
//! Each entity kind knows where its tasks live and how to feed them to the
//! [task normalizer](crate::task):
//!
//! | Kind | Path | Tasks come from |
//! |------|------|-----------------|
//! | [`Task`](AnsibleEntity::Task) | file | the top-level task list |
//! | [`Playbook`](AnsibleEntity::Playbook) | file | the first play's `tasks` |
//! | [`Role`](AnsibleEntity::Role) | directory | every file under `tasks/`, then `handlers/` |
//! | [`Collection`](AnsibleEntity::Collection) | directory | roles under `roles/`, then playbooks under `playbooks/` |
//!
//! Paths of unknown kind go through the [`detect`] module instead.
//!
//! Directory traversal is depth-first and sorted by file name, so the task
//! order (and with it the positional pairing of findings) is reproducible.

pub mod collection;
pub mod detect;
pub mod playbook;
pub mod role;
pub mod task_file;

use crate::error::{Error, Result};
use crate::task::TaskRecord;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// File extensions recognized as YAML during auto-detection.
pub const YAML_EXTENSIONS: &[&str] = &["yml", "yaml"];

/// The kinds of Ansible content that can be resolved into tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnsibleEntity {
    Task,
    Playbook,
    Role,
    Collection,
}

impl AnsibleEntity {
    /// Human-readable description of the path this kind requires.
    pub fn expected(self) -> &'static str {
        match self {
            AnsibleEntity::Task => "task file",
            AnsibleEntity::Playbook => "playbook file",
            AnsibleEntity::Role => "role directory",
            AnsibleEntity::Collection => "collection directory",
        }
    }

    fn wants_directory(self) -> bool {
        matches!(self, AnsibleEntity::Role | AnsibleEntity::Collection)
    }
}

/// Resolves paths into [`TaskRecord`]s.
///
/// The resolver decides how the `source_file` of each record is rendered:
/// as given, or relative to a base directory (usually the working
/// directory the scan was started from).
///
/// # Examples
///
/// ```rust,no_run
/// use std::path::Path;
/// use steampunk_scanner::entity::{AnsibleEntity, Resolver};
///
/// let resolver = Resolver::from_current_dir()?;
/// let records = resolver.resolve(AnsibleEntity::Role, Path::new("roles/web"))?;
/// println!("{} tasks", records.len());
/// # Ok::<(), steampunk_scanner::error::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Resolver {
    base_dir: Option<PathBuf>,
}

impl Resolver {
    /// A resolver that reports paths exactly as they were supplied.
    pub fn new() -> Self {
        Resolver::default()
    }

    /// A resolver that reports paths relative to `base_dir` where possible.
    pub fn relative_to(base_dir: impl Into<PathBuf>) -> Self {
        Resolver {
            base_dir: Some(base_dir.into()),
        }
    }

    /// A resolver that reports paths relative to the working directory.
    pub fn from_current_dir() -> Result<Self> {
        let cwd = std::env::current_dir().map_err(|source| Error::Io {
            path: PathBuf::from("."),
            source,
        })?;
        Ok(Resolver::relative_to(cwd))
    }

    /// Resolves a single path of a declared kind.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidPath`] when `path` is not a file (task, playbook) or
    ///   not a directory (role, collection).
    /// - [`Error::Parse`] / [`Error::Structure`] for any file that cannot be
    ///   read as the expected content. One bad file aborts the resolution.
    pub fn resolve(&self, kind: AnsibleEntity, path: &Path) -> Result<Vec<TaskRecord>> {
        let valid = if kind.wants_directory() {
            path.is_dir()
        } else {
            path.is_file()
        };
        if !valid {
            return Err(Error::InvalidPath {
                path: path.to_path_buf(),
                expected: kind.expected(),
            });
        }

        tracing::debug!(path = %path.display(), kind = kind.expected(), "resolving");
        match kind {
            AnsibleEntity::Task => task_file::resolve(self, path),
            AnsibleEntity::Playbook => playbook::resolve(self, path),
            AnsibleEntity::Role => role::resolve(self, path),
            AnsibleEntity::Collection => collection::resolve(self, path),
        }
    }

    /// Resolves several paths of the same kind and concatenates the records
    /// in the order the paths were given.
    pub fn resolve_all(&self, kind: AnsibleEntity, paths: &[PathBuf]) -> Result<Vec<TaskRecord>> {
        let mut records = Vec::new();
        for path in paths {
            records.extend(self.resolve(kind, path)?);
        }
        Ok(records)
    }

    /// Resolves a path of undeclared kind. See [`detect`].
    pub fn detect(&self, path: &Path) -> Result<Vec<TaskRecord>> {
        detect::detect(self, path)
    }

    /// Renders `path` the way it should appear in records and diagnostics.
    ///
    /// With a base directory, `.` components are dropped and the base is
    /// stripped off; paths outside it stay otherwise as given. Without one,
    /// the path is rendered verbatim.
    pub fn source_name(&self, path: &Path) -> String {
        let Some(base) = &self.base_dir else {
            return path.to_string_lossy().into_owned();
        };

        let cleaned: PathBuf = path
            .components()
            .filter(|component| !matches!(component, Component::CurDir))
            .collect();
        let shown = cleaned.strip_prefix(base).unwrap_or(&cleaned);
        shown.to_string_lossy().into_owned()
    }
}

/// Every regular file below `root`, depth-first in file-name order.
///
/// A missing `root` yields nothing; any other traversal error is returned.
pub(crate) fn walk_files(root: &Path) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Ok(vec![]);
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root).follow_links(true).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// Immediate child directories of `root`, sorted by name.
pub(crate) fn child_dirs(root: &Path) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Ok(vec![]);
    }

    let mut dirs = Vec::new();
    for entry in WalkDir::new(root)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = entry?;
        if entry.file_type().is_dir() {
            dirs.push(entry.into_path());
        }
    }
    Ok(dirs)
}

/// Recursively collects files matching the given extensions.
///
/// Walks the directory tree under `path` in file-name order and returns
/// every regular file whose extension (case-insensitive) appears in
/// `extensions`. Unreadable entries are skipped.
///
/// # Examples
///
/// ```rust,no_run
/// use std::path::Path;
/// use steampunk_scanner::entity::{collect_files, YAML_EXTENSIONS};
///
/// let yaml_files = collect_files(Path::new("./site"), YAML_EXTENSIONS);
/// ```
pub fn collect_files(path: &Path, extensions: &[&str]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for entry in WalkDir::new(path)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| match e {
            Ok(entry) => Some(entry),
            Err(err) => {
                tracing::warn!("skipping unreadable entry: {err}");
                None
            }
        })
        .filter(|e| e.file_type().is_file())
    {
        let path = entry.path();
        if let Some(ext) = path.extension() {
            let ext_str = ext.to_string_lossy().to_lowercase();
            if extensions.contains(&ext_str.as_str()) {
                files.push(path.to_path_buf());
            }
        }
    }
    files
}
