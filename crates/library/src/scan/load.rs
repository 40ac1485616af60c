use crate::TagStore;
use crate::report::Failure;
use retag_extract::models::MediaEntity;
use std::path::PathBuf;

/// Reads every file through `store`, in order.
///
/// Files whose tags can't be read are returned as failures; the rest of the
/// list is still loaded.
pub fn read_entities(store: &dyn TagStore, files: &[PathBuf]) -> (Vec<MediaEntity>, Vec<Failure>) {
    let mut entities = Vec::with_capacity(files.len());
    let mut failures = Vec::new();
    for path in files {
        match store.read(path) {
            Ok(entity) => entities.push(entity),
            Err(error) => {
                tracing::warn!(path = %path.display(), error = %*error, "Could not read tags");
                failures.push(Failure::new(path, error));
            },
        }
    }
    (entities, failures)
}
