use crate::error::Result;
use retag_extract::models::MediaEntity;
use std::path::Path;

/// Reads and writes the embedded tags of media files.
///
/// The library never touches tag containers itself; everything goes through
/// this trait so that the binary codec can be swapped out (or faked in
/// tests).
pub trait TagStore {
    /// Loads the tags of the file at `path` into a new entity.
    ///
    /// # Errors
    /// [`ErrorKind::ReadTags`](crate::error::ErrorKind::ReadTags) if the file
    /// can't be opened or has an unsupported format.
    fn read(&self, path: &Path) -> Result<MediaEntity>;

    /// Persists the entity's tag values to the file at `entity.path`.
    ///
    /// # Errors
    /// [`ErrorKind::WriteTags`](crate::error::ErrorKind::WriteTags) if the
    /// file can't be updated.
    fn write(&self, entity: &MediaEntity) -> Result<()>;
}
