//! [`Namespace`] over a vault directory on disk.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::walker::{Exclusions, VaultWalkerError, is_markdown_file};
use crate::index::folder::normalize_path;
use crate::index::{Namespace, NamespaceEntry};

/// Reads the directory tree on every call, so it always reflects the
/// current state of the disk.
#[derive(Debug, Clone)]
pub struct VaultNamespace {
    exclusions: Exclusions,
}

impl VaultNamespace {
    pub fn new(root: &Path, excluded_folders: Vec<PathBuf>) -> Result<Self, VaultWalkerError> {
        Ok(Self { exclusions: Exclusions::new(root, excluded_folders)? })
    }

    pub fn root(&self) -> &Path {
        self.exclusions.root()
    }

    fn resolve(&self, path: &str) -> PathBuf {
        let mut resolved = self.exclusions.root().to_path_buf();
        let path = normalize_path(path);
        resolved.extend(path.split('/').filter(|part| !part.is_empty()));
        resolved
    }

    fn visible(&self, path: &Path) -> bool {
        !self.exclusions.excludes(path)
    }
}

impl Namespace for VaultNamespace {
    fn children(&self, folder: &str) -> Option<Vec<NamespaceEntry>> {
        let dir = self.resolve(folder);
        if !dir.is_dir() || !self.visible(&dir) {
            return None;
        }

        let mut children: Vec<NamespaceEntry> = WalkDir::new(&dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(false)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|entry| !self.exclusions.excludes(entry.path()))
            .filter_map(|entry| {
                let path = self.exclusions.namespace_path(entry.path());
                if entry.file_type().is_dir() {
                    Some(NamespaceEntry::Folder(path))
                } else if entry.file_type().is_file() && is_markdown_file(entry.path()) {
                    Some(NamespaceEntry::File(path))
                } else {
                    None
                }
            })
            .collect();
        children.sort();
        Some(children)
    }

    fn is_file(&self, path: &str) -> bool {
        let file = self.resolve(path);
        file.is_file() && is_markdown_file(&file) && self.visible(&file)
    }

    fn is_folder(&self, path: &str) -> bool {
        let dir = self.resolve(path);
        dir.is_dir() && self.visible(&dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::FolderIndex;
    use std::fs;
    use tempfile::TempDir;

    fn vault() -> TempDir {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("notes/sub")).unwrap();
        fs::create_dir_all(root.join("other")).unwrap();
        fs::create_dir_all(root.join(".obsidian")).unwrap();
        fs::write(root.join("notes/a.md"), "").unwrap();
        fs::write(root.join("notes/sub/b.md"), "").unwrap();
        fs::write(root.join("notes/image.png"), "").unwrap();
        fs::write(root.join("other/c.md"), "").unwrap();
        fs::write(root.join(".obsidian/app.md"), "").unwrap();
        dir
    }

    #[test]
    fn test_children_lists_markdown_and_folders() {
        let dir = vault();
        let ns = VaultNamespace::new(dir.path(), Vec::new()).unwrap();
        assert_eq!(
            ns.children("notes").unwrap(),
            vec![
                NamespaceEntry::File("notes/a.md".into()),
                NamespaceEntry::Folder("notes/sub".into()),
            ]
        );
        assert!(ns.children("missing").is_none());
        assert!(ns.children(".obsidian").is_none());
    }

    #[test]
    fn test_folder_index_over_disk() {
        let dir = vault();
        let index = FolderIndex::new(VaultNamespace::new(dir.path(), Vec::new()).unwrap());

        let found = index.get("notes", None);
        assert_eq!(found.into_iter().collect::<Vec<_>>(), vec!["notes/a.md", "notes/sub/b.md"]);
        assert!(index.path_exists("other/c.md"));
        assert!(!index.path_exists("notes/image.png"));
        assert!(!index.path_exists("../escape.md"));
    }

    #[test]
    fn test_excluded_folder_is_invisible() {
        let dir = vault();
        let ns = VaultNamespace::new(dir.path(), vec![PathBuf::from("notes/sub")]).unwrap();
        assert!(!ns.is_folder("notes/sub"));
        assert!(!ns.is_file("notes/sub/b.md"));
        assert_eq!(FolderIndex::new(ns).get("", None).len(), 2);
    }

    #[test]
    fn test_reflects_disk_changes() {
        let dir = vault();
        let index = FolderIndex::new(VaultNamespace::new(dir.path(), Vec::new()).unwrap());
        fs::write(dir.path().join("other/d.md"), "").unwrap();
        assert_eq!(index.get_exact("other", None).len(), 2);
    }
}
