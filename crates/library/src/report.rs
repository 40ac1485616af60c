use crate::error::Error;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::{Path, PathBuf};

/// A per-file error that didn't stop the batch.
#[derive(Debug)]
pub struct Failure {
    pub path: PathBuf,
    pub error: Error,
}
impl Failure {
    pub fn new(path: impl Into<PathBuf>, error: Error) -> Self {
        Self { path: path.into(), error }
    }
}
impl Display for Failure {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}: {}", self.path.display(), *self.error)
    }
}

/// Everything that happened during one batch.
///
/// `actions` holds one entry per file that was handled, in processing order.
/// Files that failed are only listed in `failures`. When the operator
/// cancelled, `cancelled` is set and the remaining files are absent from
/// both lists.
#[derive(Debug)]
pub struct Report<A> {
    pub actions: Vec<A>,
    pub failures: Vec<Failure>,
    pub cancelled: bool,
}
impl<A> Default for Report<A> {
    fn default() -> Self {
        Self {
            actions: Vec::new(),
            failures: Vec::new(),
            cancelled: false,
        }
    }
}
impl<A> Report<A> {
    pub(crate) fn record(&mut self, action: A) {
        self.actions.push(action);
    }

    pub(crate) fn fail(&mut self, path: &Path, error: Error) {
        tracing::error!(path = %path.display(), error = %*error, "Failed to process file");
        self.failures.push(Failure::new(path, error));
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty() && !self.cancelled
    }
}
