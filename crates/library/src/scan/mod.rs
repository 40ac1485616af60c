//! Media file discovery.
//!
//! [`Scanner::scan`] walks a [`WorkingRoot`] and collects every file with a
//! configured media extension, skipping files below excluded directory names.
//! [`read_entities`] then loads each discovered file through a
//! [`TagStore`](crate::TagStore).

mod load;

pub use self::load::read_entities;

use crate::error::ErrorKind;
use crate::report::Failure;
use retag_storage::{DEFAULT_EXTENSIONS, WorkingRoot};
use std::path::{Path, PathBuf};
use tracing::instrument;
use walkdir::WalkDir;


/// Result of walking the working root.
#[derive(Debug, Default)]
pub struct Scan {
    /// Media files in walk order (sorted by file name at each level).
    pub files: Vec<PathBuf>,
    /// Number of media files skipped because they live in an excluded
    /// directory.
    pub excluded: usize,
    /// Directory entries that couldn't be read.
    pub failures: Vec<Failure>,
}

#[derive(Debug, Clone)]
pub struct Scanner {
    extensions: Vec<String>,
    excluded: Vec<String>,
}
impl Default for Scanner {
    fn default() -> Self {
        Self::new(DEFAULT_EXTENSIONS)
    }
}
impl Scanner {
    /// Extensions are compared case-insensitively, with or without a leading
    /// dot.
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let extensions = extensions
            .into_iter()
            .map(|e| e.as_ref().trim().trim_start_matches('.').to_lowercase())
            .filter(|e| !e.is_empty())
            .collect();
        Self { extensions, excluded: Vec::new() }
    }

    /// Files anywhere below a directory with one of these names are skipped.
    pub fn with_excluded<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded = names.into_iter().map(Into::into).filter(|n: &String| !n.trim().is_empty()).collect();
        self
    }

    fn is_media(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|s| s.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
    }

    /// Returns `true` if any directory between `root` and `path` is excluded.
    fn is_excluded(&self, root: &Path, path: &Path) -> bool {
        let Some(parent) = path.parent().and_then(|p| p.strip_prefix(root).ok()) else {
            return false;
        };
        parent
            .components()
            .filter_map(|c| c.as_os_str().to_str())
            .any(|name| self.excluded.iter().any(|excluded| excluded == name))
    }

    #[instrument(skip_all, fields(root = %root.path().display()))]
    pub fn scan(&self, root: &WorkingRoot) -> Scan {
        let mut scan = Scan::default();
        for entry in WalkDir::new(root.path()).follow_links(false).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    let path = err.path().unwrap_or(root.path()).to_path_buf();
                    tracing::warn!(path = %path.display(), "Could not read directory entry");
                    scan.failures.push(Failure::new(path, exn::Exn::from(err).raise(ErrorKind::Scan)));
                    continue;
                },
            };
            if !entry.file_type().is_file() || !self.is_media(entry.path()) {
                continue;
            }
            if self.is_excluded(root.path(), entry.path()) {
                tracing::debug!(path = %entry.path().display(), "Skipping file in excluded directory");
                scan.excluded += 1;
                continue;
            }
            scan.files.push(entry.into_path());
        }
        tracing::info!(files = scan.files.len(), excluded = scan.excluded, "Finished scanning");
        scan
    }
}
