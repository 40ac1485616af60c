//! Removal of directories left empty after a reorganization.
//!
//! A directory counts as empty when it has no subdirectories and every file
//! in it is operating-system clutter (see [`JUNK_FILES`]). Those files are
//! deleted together with the directory. Traversal is post-order, so a parent
//! that only contained empty children is removed in the same pass.

use crate::error::{Error, ErrorKind, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::instrument;
use walkdir::WalkDir;

/// File names that don't keep a directory alive.
pub const JUNK_FILES: [&str; 3] = [".DS_Store", "Thumbs.db", "desktop.ini"];

/// Outcome of one deletion attempt.
#[derive(Debug)]
pub enum Cleanup {
    Removed(PathBuf),
    Failed { path: PathBuf, error: Error },
}
impl Cleanup {
    pub fn path(&self) -> &Path {
        match self {
            Cleanup::Removed(path) | Cleanup::Failed { path, .. } => path,
        }
    }

    pub fn is_removed(&self) -> bool {
        matches!(self, Cleanup::Removed(_))
    }
}

/// Returns `true` if `path`'s file name ends with one of [`JUNK_FILES`].
pub fn is_junk(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| JUNK_FILES.iter().any(|junk| name.ends_with(junk)))
}

/// Removes empty directories below `root`. The root itself is kept even when
/// it ends up empty.
///
/// Failures don't stop the walk; they are reported alongside the removals.
#[instrument(skip_all, fields(root = %root.display()))]
pub fn remove_empty_directories(root: &Path) -> Vec<Cleanup> {
    let mut results = Vec::new();
    let walker = WalkDir::new(root)
        .min_depth(1)
        .follow_links(false)
        .contents_first(true)
        .sort_by_file_name();
    for entry in walker {
        match entry {
            Ok(entry) if entry.file_type().is_dir() => sweep(entry.path(), &mut results),
            Ok(_) => {},
            Err(err) => results.push(walk_failure(err, root)),
        }
    }
    let removed = results.iter().filter(|r| r.is_removed()).count();
    tracing::info!(removed, failed = results.len() - removed, "Finished directory cleanup");
    results
}

/// Removes `directory` if only junk is left in it. Its children have already
/// been swept, so the listing is read fresh.
fn sweep(directory: &Path, results: &mut Vec<Cleanup>) {
    let listing = match Listing::read(directory) {
        Ok(listing) => listing,
        Err(error) => return results.push(Cleanup::Failed { path: directory.to_path_buf(), error }),
    };
    if !listing.directories.is_empty() || !listing.files.iter().all(|file| is_junk(file)) {
        return;
    }
    for file in listing.files {
        match fs::remove_file(&file) {
            Ok(()) => results.push(Cleanup::Removed(file)),
            Err(e) => {
                let error = Error::from(ErrorKind::io(e, &file));
                results.push(Cleanup::Failed { path: file, error });
                return;
            },
        }
    }
    match fs::remove_dir(directory) {
        Ok(()) => {
            tracing::debug!(directory = %directory.display(), "Removed empty directory");
            results.push(Cleanup::Removed(directory.to_path_buf()));
        },
        Err(e) => results.push(Cleanup::Failed {
            path: directory.to_path_buf(),
            error: Error::from(ErrorKind::io(e, directory)),
        }),
    }
}

fn walk_failure(err: walkdir::Error, root: &Path) -> Cleanup {
    let path = err.path().unwrap_or(root).to_path_buf();
    let kind = match err.into_io_error() {
        Some(e) => ErrorKind::io(e, &path),
        // Only symlink loops carry no I/O error, and links aren't followed.
        None => ErrorKind::InvalidPath(path.clone()),
    };
    tracing::warn!(path = %path.display(), error = %kind, "Could not walk directory");
    Cleanup::Failed { path, error: Error::from(kind) }
}

/// Immediate children of a directory. Symlinks are listed as files, so a
/// symlinked directory keeps its parent alive and is never followed.
struct Listing {
    directories: Vec<PathBuf>,
    files: Vec<PathBuf>,
}
impl Listing {
    fn read(directory: &Path) -> Result<Self> {
        let mut listing = Self { directories: Vec::new(), files: Vec::new() };
        for entry in fs::read_dir(directory).map_err(|e| ErrorKind::io(e, directory))? {
            let entry = entry.map_err(|e| ErrorKind::io(e, directory))?;
            let file_type = entry.file_type().map_err(|e| ErrorKind::io(e, entry.path()))?;
            if file_type.is_dir() {
                listing.directories.push(entry.path());
            } else {
                listing.files.push(entry.path());
            }
        }
        listing.directories.sort();
        listing.files.sort();
        Ok(listing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"").unwrap();
    }

    #[rstest]
    #[case(".DS_Store", true)]
    #[case("Thumbs.db", true)]
    #[case("desktop.ini", true)]
    #[case("._.DS_Store", true)]
    #[case("song.mp3", false)]
    #[case("cover.jpg", false)]
    fn test_is_junk(#[case] name: &str, #[case] expected: bool) {
        assert_eq!(is_junk(Path::new(name)), expected);
    }

    #[test]
    fn test_removes_nested_empty_directories() {
        let temp_dir = tempfile::tempdir().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("A/B/C")).unwrap();
        touch(&root.join("A/B/.DS_Store"));
        let results = remove_empty_directories(root);
        assert!(results.iter().all(Cleanup::is_removed));
        assert!(!root.join("A").exists());
        assert!(root.exists());
        let removed: Vec<_> = results.iter().map(|r| r.path().strip_prefix(root).unwrap().to_path_buf()).collect();
        assert_eq!(
            removed,
            vec![
                PathBuf::from("A/B/C"),
                PathBuf::from("A/B/.DS_Store"),
                PathBuf::from("A/B"),
                PathBuf::from("A"),
            ]
        );
    }

    #[test]
    fn test_keeps_directories_with_real_files() {
        let temp_dir = tempfile::tempdir().unwrap();
        let root = temp_dir.path();
        touch(&root.join("Artist/song.mp3"));
        touch(&root.join("Artist/Thumbs.db"));
        fs::create_dir_all(root.join("Artist/Empty")).unwrap();
        let results = remove_empty_directories(root);
        assert_eq!(results.len(), 1);
        assert!(!root.join("Artist/Empty").exists());
        assert!(root.join("Artist/song.mp3").exists());
        assert!(root.join("Artist/Thumbs.db").exists());
    }

    #[test]
    fn test_sibling_trees_are_swept_children_first() {
        let temp_dir = tempfile::tempdir().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("a/x")).unwrap();
        fs::create_dir_all(root.join("b/y/z")).unwrap();
        touch(&root.join("c/keep.mp3"));
        let removed: Vec<_> = remove_empty_directories(root)
            .iter()
            .map(|r| r.path().strip_prefix(root).unwrap().to_path_buf())
            .collect();
        let expected: Vec<PathBuf> = ["a/x", "a", "b/y/z", "b/y", "b"].iter().map(PathBuf::from).collect();
        assert_eq!(removed, expected);
        assert!(root.join("c/keep.mp3").exists());
    }

    #[test]
    fn test_root_is_never_removed() {
        let temp_dir = tempfile::tempdir().unwrap();
        touch(&temp_dir.path().join(".DS_Store"));
        assert!(remove_empty_directories(temp_dir.path()).is_empty());
        assert!(temp_dir.path().join(".DS_Store").exists());
    }

    #[test]
    fn test_missing_root_is_reported() {
        let temp_dir = tempfile::tempdir().unwrap();
        let results = remove_empty_directories(&temp_dir.path().join("missing"));
        assert_eq!(results.len(), 1);
        assert!(matches!(&results[0], Cleanup::Failed { error, .. } if matches!(&**error, ErrorKind::NotFound(_))));
    }
}
