//! Decomposed file locations.

use crate::error::{ErrorKind, Result};
use std::path::{Component, Path, PathBuf};

/// A file location split into the working root, the directories below it, and
/// the file name.
///
/// Constructed either explicitly with [`new`](Self::new) (for planned
/// targets) or by decomposing an existing absolute path with
/// [`from_path`](Self::from_path). Decomposition requires the path to live
/// under the root; anything else is a bug in the caller.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathComponents {
    root: PathBuf,
    sub_directories: Vec<String>,
    file_name: String,
}
impl PathComponents {
    pub fn new(root: impl Into<PathBuf>, sub_directories: Vec<String>, file_name: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            sub_directories,
            file_name: file_name.into(),
        }
    }

    /// Splits `path` relative to `root`.
    ///
    /// # Errors
    /// - [`ErrorKind::OutsideRoot`] if `path` doesn't start with `root`.
    /// - [`ErrorKind::InvalidPath`] if the remainder is empty, contains `..`,
    ///   or isn't valid UTF-8.
    pub fn from_path(root: impl AsRef<Path>, path: impl AsRef<Path>) -> Result<Self> {
        let (root, path) = (root.as_ref(), path.as_ref());
        let relative = path.strip_prefix(root).map_err(|_| ErrorKind::OutsideRoot {
            root: root.to_path_buf(),
            path: path.to_path_buf(),
        })?;
        let mut parts = Vec::new();
        for component in relative.components() {
            match component {
                Component::Normal(part) => match part.to_str() {
                    Some(part) => parts.push(part.to_string()),
                    None => exn::bail!(ErrorKind::InvalidPath(path.to_path_buf())),
                },
                Component::CurDir => {},
                _ => exn::bail!(ErrorKind::InvalidPath(path.to_path_buf())),
            }
        }
        let Some(file_name) = parts.pop() else {
            exn::bail!(ErrorKind::InvalidPath(path.to_path_buf()));
        };
        Ok(Self::new(root, parts, file_name))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn sub_directories(&self) -> &[String] {
        &self.sub_directories
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// The containing directory, including the root.
    pub fn directory(&self) -> PathBuf {
        let mut directory = self.root.clone();
        directory.extend(&self.sub_directories);
        directory
    }

    /// The fully-qualified path, including the root.
    pub fn full_path(&self) -> PathBuf {
        self.directory().join(&self.file_name)
    }

    /// The path below the root.
    pub fn relative_path(&self) -> PathBuf {
        self.sub_directories.iter().chain(std::iter::once(&self.file_name)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_path() {
        let components = PathComponents::from_path("/music", "/music/Artist/Album/song.mp3").unwrap();
        assert_eq!(components.root(), Path::new("/music"));
        assert_eq!(components.sub_directories(), ["Artist", "Album"]);
        assert_eq!(components.file_name(), "song.mp3");
        assert_eq!(components.directory(), Path::new("/music/Artist/Album"));
        assert_eq!(components.full_path(), Path::new("/music/Artist/Album/song.mp3"));
        assert_eq!(components.relative_path(), Path::new("Artist/Album/song.mp3"));
    }

    #[test]
    fn test_file_directly_under_root() {
        let components = PathComponents::from_path("/music", "/music/song.mp3").unwrap();
        assert!(components.sub_directories().is_empty());
        assert_eq!(components.full_path(), Path::new("/music/song.mp3"));
    }

    #[test]
    fn test_outside_root_fails() {
        let err = PathComponents::from_path("/music", "/other/song.mp3").unwrap_err();
        assert!(err.is_programming_error());
        // Component-wise comparison: "/musical" is not inside "/music".
        assert!(PathComponents::from_path("/music", "/musical/song.mp3").is_err());
    }

    #[test]
    fn test_root_itself_is_invalid() {
        let err = PathComponents::from_path("/music", "/music").unwrap_err();
        assert!(matches!(&*err, ErrorKind::InvalidPath(_)));
    }

    #[test]
    fn test_explicit_assembly_matches_decomposition() {
        let built = PathComponents::new("/music", vec!["Artist".to_string()], "song.mp3");
        let parsed = PathComponents::from_path("/music", "/music/Artist/song.mp3").unwrap();
        assert_eq!(built, parsed);
        assert_eq!(built.full_path(), parsed.full_path());
    }
}
