//! Diffing of extracted values against an entity's current tags.
//!
//! [`plan_updates`] keeps only the fields whose values actually need to
//! change. An empty [`UpdateMap`] means the file is already up to date.
//!
//! List fields use a *containment* check rather than equality: an update is
//! only proposed when at least one extracted item is missing from the current
//! list. Extra items already present on the entity never trigger an update, so
//! `["A", "B"]` is left alone when the filename only yields `["A"]`.

use crate::consts::LIST_SEPARATOR;
use crate::fields::ExtractedFields;
use crate::models::MediaEntity;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// A single proposed tag change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagUpdate {
    Title(String),
    AlbumArtists(Vec<String>),
    Artists(Vec<String>),
    Album(String),
    Genres(Vec<String>),
    Year(u32),
    Track(u32),
}
impl TagUpdate {
    /// Human-readable field label.
    pub fn label(&self) -> &'static str {
        match self {
            TagUpdate::Title(_) => "Title",
            TagUpdate::AlbumArtists(_) => "Album Artists",
            TagUpdate::Artists(_) => "Artists",
            TagUpdate::Album(_) => "Album",
            TagUpdate::Genres(_) => "Genres",
            TagUpdate::Year(_) => "Year",
            TagUpdate::Track(_) => "Track",
        }
    }

    /// The proposed value as shown to the operator.
    ///
    /// Genre lists with more than one entry are suffixed with their count.
    pub fn display_value(&self) -> String {
        match self {
            TagUpdate::Title(s) | TagUpdate::Album(s) => s.clone(),
            TagUpdate::AlbumArtists(v) | TagUpdate::Artists(v) => v.join(LIST_SEPARATOR),
            TagUpdate::Genres(v) if v.len() > 1 => format!("{} ({} genres)", v.join(LIST_SEPARATOR), v.len()),
            TagUpdate::Genres(v) => v.join(LIST_SEPARATOR),
            TagUpdate::Year(n) | TagUpdate::Track(n) => n.to_string(),
        }
    }

    /// Writes the new value into `entity`.
    pub fn apply(self, entity: &mut MediaEntity) {
        match self {
            TagUpdate::Title(s) => entity.title = s,
            TagUpdate::AlbumArtists(v) => entity.album_artists = v,
            TagUpdate::Artists(v) => entity.artists = v,
            TagUpdate::Album(s) => entity.album = s,
            TagUpdate::Genres(v) => entity.genres = v,
            TagUpdate::Year(n) => entity.year = n,
            TagUpdate::Track(n) => entity.track = n,
        }
    }
}
impl Display for TagUpdate {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}: {}", self.label(), self.display_value())
    }
}

/// Ordered list of [`TagUpdate`]s for one file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateMap(Vec<TagUpdate>);
impl UpdateMap {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TagUpdate> {
        self.0.iter()
    }

    /// `(label, display value)` pairs in field order.
    pub fn entries(&self) -> impl Iterator<Item = (&'static str, String)> + '_ {
        self.0.iter().map(|update| (update.label(), update.display_value()))
    }

    /// Applies every update to `entity`, in order.
    pub fn apply(self, entity: &mut MediaEntity) {
        for update in self.0 {
            update.apply(entity);
        }
    }
}
impl IntoIterator for UpdateMap {
    type Item = TagUpdate;
    type IntoIter = std::vec::IntoIter<TagUpdate>;
    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Computes the updates needed to bring `entity` in line with `fields`.
pub fn plan_updates(fields: &ExtractedFields, entity: &MediaEntity) -> UpdateMap {
    let mut updates = Vec::new();
    if let Some(title) = scalar(fields.title.as_ref(), &entity.title) {
        updates.push(TagUpdate::Title(title));
    }
    if let Some(values) = items(fields.album_artists.as_ref(), &entity.album_artists) {
        updates.push(TagUpdate::AlbumArtists(values));
    }
    if let Some(values) = items(fields.artists.as_ref(), &entity.artists) {
        updates.push(TagUpdate::Artists(values));
    }
    if let Some(album) = scalar(fields.album.as_ref(), &entity.album) {
        updates.push(TagUpdate::Album(album));
    }
    if let Some(values) = items(fields.genres.as_ref(), &entity.genres) {
        updates.push(TagUpdate::Genres(values));
    }
    if let Some(year) = fields.year.filter(|year| *year != 0 && *year != entity.year) {
        updates.push(TagUpdate::Year(year));
    }
    if let Some(track) = fields.track.filter(|track| *track != entity.track) {
        updates.push(TagUpdate::Track(track));
    }
    UpdateMap(updates)
}

fn scalar(extracted: Option<&String>, current: &str) -> Option<String> {
    extracted.filter(|value| value.as_str() != current).cloned()
}

fn items(extracted: Option<&Vec<String>>, current: &[String]) -> Option<Vec<String>> {
    extracted.filter(|values| !values.iter().all(|value| current.contains(value))).cloned()
}
