//! Folder lookups against a live, externally owned file hierarchy.
//!
//! The folder index owns no state of its own. Every call walks the current
//! [`Namespace`], so results are never stale but also not snapshot-isolated.
//!
//! Paths are vault-relative, `/`-separated, with no leading or trailing
//! slash; the empty string names the vault root.

use std::collections::BTreeSet;

use super::types::IdSet;

/// One direct child of a folder, carrying its full vault-relative path.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum NamespaceEntry {
    File(String),
    Folder(String),
}

/// Read-only access to a hierarchical file namespace.
pub trait Namespace {
    /// Direct children of `folder`, or `None` if no such folder exists.
    fn children(&self, folder: &str) -> Option<Vec<NamespaceEntry>>;

    fn is_file(&self, path: &str) -> bool;

    fn is_folder(&self, path: &str) -> bool;
}

/// Canonical form of a vault path: `"/notes/./sub/../"` becomes `"notes"`.
///
/// `..` never climbs above the vault root.
pub fn normalize_path(path: &str) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for part in path.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            _ => parts.push(part),
        }
    }
    parts.join("/")
}

/// Parent folder of a path; the root for top-level entries.
pub fn parent_folder(path: &str) -> String {
    let path = normalize_path(path);
    match path.rsplit_once('/') {
        Some((parent, _)) => parent.to_string(),
        None => String::new(),
    }
}

fn join(folder: &str, name: &str) -> String {
    if folder.is_empty() { name.to_string() } else { format!("{folder}/{name}") }
}

/// Id filter applied to folder results.
pub type PathFilter<'f> = &'f dyn Fn(&str) -> bool;

/// Prefix and existence queries over a [`Namespace`].
#[derive(Debug, Clone, Default)]
pub struct FolderIndex<N> {
    namespace: N,
}

impl<N: Namespace> FolderIndex<N> {
    pub fn new(namespace: N) -> Self {
        Self { namespace }
    }

    pub fn namespace(&self) -> &N {
        &self.namespace
    }

    pub fn namespace_mut(&mut self) -> &mut N {
        &mut self.namespace
    }

    /// Every file anywhere under `prefix`, optionally filtered.
    pub fn get(&self, prefix: &str, filter: Option<PathFilter<'_>>) -> IdSet {
        let mut found = IdSet::new();
        let mut pending = vec![normalize_path(prefix)];

        while let Some(folder) = pending.pop() {
            let Some(children) = self.namespace.children(&folder) else {
                continue;
            };
            for child in children {
                match child {
                    NamespaceEntry::File(path) => {
                        if filter.is_none_or(|accept| accept(path.as_str())) {
                            found.insert(path);
                        }
                    }
                    NamespaceEntry::Folder(path) => pending.push(path),
                }
            }
        }

        found
    }

    /// Files directly inside `prefix`, optionally filtered.
    pub fn get_exact(&self, prefix: &str, filter: Option<PathFilter<'_>>) -> IdSet {
        self.namespace
            .children(&normalize_path(prefix))
            .unwrap_or_default()
            .into_iter()
            .filter_map(|child| match child {
                NamespaceEntry::File(path) => Some(path),
                NamespaceEntry::Folder(_) => None,
            })
            .filter(|path| filter.is_none_or(|accept| accept(path.as_str())))
            .collect()
    }

    /// Whether a file or folder exists at `path`.
    pub fn path_exists(&self, path: &str) -> bool {
        let path = normalize_path(path);
        self.namespace.is_file(&path) || self.namespace.is_folder(&path)
    }

    pub fn folder_exists(&self, path: &str) -> bool {
        self.namespace.is_folder(&normalize_path(path))
    }

    /// Resolve `path` as written inside `origin`.
    ///
    /// A leading `/` marks a vault-absolute path. Otherwise the path is tried
    /// relative to the origin's folder and returned as-is if nothing exists
    /// there.
    pub fn resolve_relative(&self, path: &str, origin: Option<&str>) -> String {
        let Some(origin) = origin else {
            return path.to_string();
        };
        if let Some(absolute) = path.strip_prefix('/') {
            return absolute.to_string();
        }

        let candidate = normalize_path(&join(&parent_folder(origin), path));
        if self.path_exists(&candidate) { candidate } else { path.to_string() }
    }
}

/// An in-memory namespace built from a set of file paths.
///
/// Folders exist implicitly whenever some file lives beneath them.
#[derive(Debug, Clone, Default)]
pub struct MemoryNamespace {
    files: BTreeSet<String>,
}

impl MemoryNamespace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: &str) -> bool {
        self.files.insert(normalize_path(path))
    }

    pub fn remove(&mut self, path: &str) -> bool {
        self.files.remove(&normalize_path(path))
    }

    pub fn rename(&mut self, old: &str, new: &str) -> bool {
        if self.remove(old) {
            self.insert(new);
            true
        } else {
            false
        }
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    fn files_under<'a>(&'a self, folder: &'a str) -> impl Iterator<Item = (&'a String, &'a str)> {
        let prefix = if folder.is_empty() { String::new() } else { format!("{folder}/") };
        self.files
            .range(prefix.clone()..)
            .take_while(move |path| path.starts_with(&prefix))
            .map(move |path| (path, &path[folder.len() + usize::from(!folder.is_empty())..]))
    }
}

impl<S: AsRef<str>> FromIterator<S> for MemoryNamespace {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self { files: iter.into_iter().map(|p| normalize_path(p.as_ref())).collect() }
    }
}

impl Namespace for MemoryNamespace {
    fn children(&self, folder: &str) -> Option<Vec<NamespaceEntry>> {
        if !self.is_folder(folder) {
            return None;
        }

        let mut children = BTreeSet::new();
        for (path, rest) in self.files_under(folder) {
            match rest.split_once('/') {
                Some((sub, _)) => children.insert(NamespaceEntry::Folder(join(folder, sub))),
                None => children.insert(NamespaceEntry::File(path.clone())),
            };
        }
        Some(children.into_iter().collect())
    }

    fn is_file(&self, path: &str) -> bool {
        self.files.contains(path)
    }

    fn is_folder(&self, path: &str) -> bool {
        path.is_empty() || self.files_under(path).next().is_some()
    }
}
