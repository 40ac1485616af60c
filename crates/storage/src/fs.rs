//! Filesystem access scoped to a working root.

use crate::error::{ErrorKind, Result};
use crate::path::PathComponents;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::instrument;

/// The directory every scanned file lives under.
///
/// All moves are expressed as [`PathComponents`] relative to this root, and
/// the root itself is never created, moved, or removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkingRoot {
    root: PathBuf,
}
impl WorkingRoot {
    /// # Errors
    /// [`ErrorKind::InvalidPath`] if `root` is relative or isn't an existing
    /// directory.
    pub fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        if !root.is_absolute() {
            exn::bail!(ErrorKind::InvalidPath(root));
        }
        let metadata = fs::metadata(&root).map_err(|e| ErrorKind::io(e, &root))?;
        if !metadata.is_dir() {
            exn::bail!(ErrorKind::InvalidPath(root));
        }
        Ok(Self { root })
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Decomposes a path found under this root.
    pub fn components(&self, path: impl AsRef<Path>) -> Result<PathComponents> {
        PathComponents::from_path(&self.root, path)
    }

    /// Builds target components below this root.
    pub fn target(&self, sub_directories: Vec<String>, file_name: impl Into<String>) -> PathComponents {
        PathComponents::new(&self.root, sub_directories, file_name)
    }

    /// Creates `directory` (and any missing parents) if it doesn't exist yet.
    /// Returns `true` if anything was created.
    pub fn ensure_directory(&self, directory: &Path) -> Result<bool> {
        if directory.is_dir() {
            return Ok(false);
        }
        fs::create_dir_all(directory).map_err(|e| ErrorKind::io(e, directory))?;
        tracing::debug!(directory = %directory.display(), "Created directory");
        Ok(true)
    }

    /// Moves a file, creating the destination directory on demand.
    ///
    /// Never overwrites: if the destination is occupied by another file the
    /// move fails with [`ErrorKind::AlreadyExists`]. A destination that is the
    /// same file as the source (a case-only rename on a case-insensitive
    /// filesystem) is allowed.
    #[instrument(skip_all, fields(from = %from.relative_path().display(), to = %to.relative_path().display()))]
    pub fn move_file(&self, from: &PathComponents, to: &PathComponents) -> Result<()> {
        if from.root() != self.root || to.root() != self.root {
            exn::bail!(ErrorKind::OutsideRoot {
                root: self.root.clone(),
                path: if from.root() != self.root { from.full_path() } else { to.full_path() },
            });
        }
        let (source, destination) = (from.full_path(), to.full_path());
        if destination.try_exists().map_err(|e| ErrorKind::io(e, &destination))?
            && !is_same_file(&source, &destination)
        {
            exn::bail!(ErrorKind::AlreadyExists(destination));
        }
        self.ensure_directory(&to.directory())?;
        fs::rename(&source, &destination).map_err(|e| ErrorKind::io(e, &source))?;
        tracing::debug!("Moved file");
        Ok(())
    }
}

fn is_same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
