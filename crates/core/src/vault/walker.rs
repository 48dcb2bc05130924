//! Recursive discovery of markdown files under a vault root.

use std::path::{Path, PathBuf};
use std::time::SystemTime;
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Debug, Error)]
pub enum VaultWalkerError {
    #[error("vault root does not exist: {0}")]
    MissingRoot(String),

    #[error("failed to walk vault directory {0}: {1}")]
    WalkError(String, #[source] walkdir::Error),

    #[error("failed to read file metadata {0}: {1}")]
    MetadataError(String, #[source] std::io::Error),
}

/// A markdown file found in the vault.
#[derive(Debug, Clone)]
pub struct WalkedFile {
    pub absolute_path: PathBuf,
    /// Vault-relative, `/`-separated; this is the file's namespace path.
    pub path: String,
    pub modified: SystemTime,
}

/// Which entries of a vault are invisible to indexing.
///
/// Hidden entries, tool directories and configured folders are skipped, as is
/// every file that is not markdown.
#[derive(Debug, Clone)]
pub struct Exclusions {
    root: PathBuf,
    /// Relative to `root`.
    folders: Vec<PathBuf>,
}

impl Exclusions {
    /// Canonicalise `root` and make absolute exclusions relative to it.
    pub fn new(root: &Path, folders: Vec<PathBuf>) -> Result<Self, VaultWalkerError> {
        let root = root
            .canonicalize()
            .map_err(|_| VaultWalkerError::MissingRoot(root.display().to_string()))?;
        if !root.is_dir() {
            return Err(VaultWalkerError::MissingRoot(root.display().to_string()));
        }

        let folders = folders
            .into_iter()
            .map(|p| {
                if p.is_absolute() {
                    // Exclusions may be written against the uncanonicalised root.
                    let canonical = p.canonicalize().unwrap_or_else(|_| p.clone());
                    canonical.strip_prefix(&root).map(Path::to_path_buf).unwrap_or(p)
                } else {
                    p
                }
            })
            .collect();

        Ok(Self { root, folders })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whether a directory entry at `path` (absolute, below the root) is hidden.
    pub fn excludes(&self, path: &Path) -> bool {
        let Ok(relative) = path.strip_prefix(&self.root) else {
            return true;
        };
        if relative.as_os_str().is_empty() {
            return false;
        }

        let hidden = relative.components().any(|c| {
            let name = c.as_os_str().to_string_lossy();
            name.starts_with('.')
                || matches!(name.as_ref(), "node_modules" | "target" | "__pycache__" | "venv")
        });
        if hidden {
            return true;
        }

        self.folders.iter().any(|excluded| relative.starts_with(excluded))
    }

    /// Namespace path (`a/b.md`) of an absolute path below the root.
    pub fn namespace_path(&self, path: &Path) -> String {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }
}

pub fn is_markdown_file(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()).is_some_and(|e| e == "md")
}

/// Walker for discovering markdown files in a vault.
#[derive(Debug)]
pub struct VaultWalker {
    exclusions: Exclusions,
}

impl VaultWalker {
    pub fn new(root: &Path) -> Result<Self, VaultWalkerError> {
        Self::with_exclusions(root, Vec::new())
    }

    /// Excluded folders may be relative to the root or absolute.
    pub fn with_exclusions(
        root: &Path,
        excluded_folders: Vec<PathBuf>,
    ) -> Result<Self, VaultWalkerError> {
        Ok(Self { exclusions: Exclusions::new(root, excluded_folders)? })
    }

    /// Every indexable markdown file, sorted by namespace path.
    pub fn walk(&self) -> Result<Vec<WalkedFile>, VaultWalkerError> {
        let root = self.exclusions.root();
        let mut files = Vec::new();

        for entry in WalkDir::new(root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|e| !self.exclusions.excludes(e.path()))
        {
            let entry =
                entry.map_err(|e| VaultWalkerError::WalkError(root.display().to_string(), e))?;

            let path = entry.path();
            if !entry.file_type().is_file() || !is_markdown_file(path) {
                continue;
            }

            let metadata = entry
                .metadata()
                .map_err(|e| VaultWalkerError::MetadataError(path.display().to_string(), e.into()))?;

            files.push(WalkedFile {
                absolute_path: path.to_path_buf(),
                path: self.exclusions.namespace_path(path),
                modified: metadata.modified().unwrap_or(std::time::UNIX_EPOCH),
            });
        }

        files.sort_by(|a, b| a.path.cmp(&b.path));
        tracing::debug!("walked {} markdown files under {}", files.len(), root.display());
        Ok(files)
    }

    pub fn exclusions(&self) -> &Exclusions {
        &self.exclusions
    }

    pub fn root(&self) -> &Path {
        self.exclusions.root()
    }
}
