use crate::error::{ErrorKind, Result};
use crate::template::RenamePatterns;
use retag_extract::models::{FieldSet, MediaEntity, has_values};
use retag_extract::LIST_SEPARATOR;
use retag_storage::{PathComponents, Sanitizer, WorkingRoot};
use std::collections::HashMap;

/// Directory used when an artist directory is wanted but the entity has
/// neither artists nor an album.
pub const UNSPECIFIED_DIRECTORY: &str = "___UNSPECIFIED___";

/// Number of tracks per [artist summary](MediaEntity::artist_summary) across
/// a whole batch. Built once before the batch starts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtistCounts(HashMap<String, usize>);
impl ArtistCounts {
    pub fn get(&self, entity: &MediaEntity) -> usize {
        self.0.get(&entity.artist_summary()).copied().unwrap_or_default()
    }
}
impl<'a> FromIterator<&'a MediaEntity> for ArtistCounts {
    fn from_iter<I: IntoIterator<Item = &'a MediaEntity>>(iter: I) -> Self {
        let mut counts = HashMap::new();
        for entity in iter {
            *counts.entry(entity.artist_summary()).or_insert(0) += 1;
        }
        Self(counts)
    }
}

/// Which directories a file is placed in below the working root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    /// Group artists with more than one track in the batch into a directory.
    pub artist_directories: bool,
    /// Nest an album directory inside the artist directory.
    pub album_directories: bool,
}
impl Default for Placement {
    fn default() -> Self {
        Self {
            artist_directories: true,
            album_directories: false,
        }
    }
}
impl Placement {
    /// Sub-directories (already sanitized) for `entity`, outermost first.
    pub fn directories(&self, entity: &MediaEntity, counts: &ArtistCounts, sanitizer: &Sanitizer) -> Vec<String> {
        let mut directories = Vec::new();
        if !self.artist_directories || counts.get(entity) <= 1 {
            return directories;
        }
        directories.push(directory_name(&artist_directory(entity), sanitizer));
        if self.album_directories && !entity.album.trim().is_empty() {
            directories.push(directory_name(&entity.album, sanitizer));
        }
        directories
    }
}

fn artist_directory(entity: &MediaEntity) -> String {
    if has_values(&entity.album_artists) {
        entity.album_artists.join(LIST_SEPARATOR)
    } else if has_values(&entity.artists) {
        entity.artists.join(LIST_SEPARATOR)
    } else if !entity.album.trim().is_empty() {
        entity.album.clone()
    } else {
        UNSPECIFIED_DIRECTORY.to_string()
    }
}

/// A sanitized directory name that can't step outside its parent.
fn directory_name(value: &str, sanitizer: &Sanitizer) -> String {
    let name = sanitizer.sanitize(value.trim());
    if name.is_empty() || name.chars().all(|c| c == '.') {
        return UNSPECIFIED_DIRECTORY.to_string();
    }
    name
}

/// Where one file should go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Plan {
    Move { from: PathComponents, to: PathComponents },
    /// The file is already at its planned location.
    AlreadyCorrect(PathComponents),
    /// No template's placeholder set equals the entity's populated fields.
    NoTemplate(FieldSet),
}

/// Computes target locations from rename templates and placement rules.
#[derive(Debug, Clone)]
pub struct Planner {
    templates: RenamePatterns,
    placement: Placement,
    sanitizer: Sanitizer,
}
impl Planner {
    pub fn new(templates: RenamePatterns) -> Self {
        Self {
            templates,
            placement: Placement::default(),
            sanitizer: Sanitizer::default(),
        }
    }

    pub fn with_placement(mut self, placement: Placement) -> Self {
        self.placement = placement;
        self
    }

    pub fn with_sanitizer(mut self, sanitizer: Sanitizer) -> Self {
        self.sanitizer = sanitizer;
        self
    }

    /// # Errors
    /// - [`ErrorKind::OutsideRoot`] if the entity doesn't live under `root`.
    /// - [`ErrorKind::UnknownPlaceholder`] if the selected template is broken.
    pub fn plan(&self, root: &WorkingRoot, entity: &MediaEntity, counts: &ArtistCounts) -> Result<Plan> {
        let from = root.components(&entity.path).map_err(ErrorKind::storage)?;
        let fields = FieldSet::populated(entity);
        let Some(pattern) = self.templates.select(&fields) else {
            return Ok(Plan::NoTemplate(fields));
        };
        let file_name = pattern.render(entity, &self.sanitizer)?;
        let to = root.target(self.placement.directories(entity, counts, &self.sanitizer), file_name);
        if to.full_path() == from.full_path() {
            return Ok(Plan::AlreadyCorrect(from));
        }
        Ok(Plan::Move { from, to })
    }
}
