//! Embedded tag access backed by [lofty].
//!
//! [`LoftyStore`] implements [`TagStore`] by reading the primary tag of a
//! file (falling back to the first tag present) and writing changes back into
//! the primary tag type, creating it if needed.
//!
//! List fields are stored as a single `"; "`-joined value and split on `;`
//! when read, so multi-value frames and joined strings both load the same.

pub mod error;

use crate::error::{ErrorKind, Result};
use exn::{OptionExt, ResultExt};
use lofty::config::WriteOptions;
use lofty::file::{AudioFile, TaggedFileExt};
use lofty::prelude::Accessor;
use lofty::read_from_path;
use lofty::tag::{ItemKey, Tag};
use retag_extract::models::MediaEntity;
use retag_extract::{LIST_DELIMITER, LIST_SEPARATOR};
use retag_library::TagStore;
use retag_library::error::{ErrorKind as LibraryErrorKind, Result as LibraryResult};
use std::fs;
use std::path::Path;
use tracing::instrument;

#[derive(Debug, Default, Clone, Copy)]
pub struct LoftyStore;
impl LoftyStore {
    #[instrument(level = "debug", skip_all, fields(path = %path.display()))]
    pub fn read_entity(&self, path: &Path) -> Result<MediaEntity> {
        let size = fs::metadata(path).or_raise(|| ErrorKind::Metadata(path.to_path_buf()))?.len();
        let tagged_file = read_from_path(path).or_raise(|| ErrorKind::Unreadable(path.to_path_buf()))?;
        let mut entity = MediaEntity::new(path, size);
        let Some(tag) = tagged_file.primary_tag().or_else(|| tagged_file.first_tag()) else {
            tracing::debug!("File has no tags");
            return Ok(entity);
        };
        entity.title = tag.title().map(|v| v.trim().to_string()).unwrap_or_default();
        entity.album = tag.album().map(|v| v.trim().to_string()).unwrap_or_default();
        entity.artists = list(tag, ItemKey::TrackArtist);
        entity.album_artists = list(tag, ItemKey::AlbumArtist);
        entity.genres = list(tag, ItemKey::Genre);
        entity.year = tag
            .get_string(ItemKey::Year)
            .or_else(|| tag.get_string(ItemKey::RecordingDate))
            .and_then(parse_year)
            .unwrap_or_default();
        entity.track = tag.track().unwrap_or_default();
        Ok(entity)
    }

    #[instrument(level = "debug", skip_all, fields(path = %entity.path.display()))]
    pub fn write_entity(&self, entity: &MediaEntity) -> Result<()> {
        let path = entity.path.as_path();
        let mut tagged_file = read_from_path(path).or_raise(|| ErrorKind::Unreadable(path.to_path_buf()))?;
        let tag_type = tagged_file.primary_tag_type();
        if tagged_file.tag(tag_type).is_none() {
            tagged_file.insert_tag(Tag::new(tag_type));
        }
        let tag = tagged_file.tag_mut(tag_type).ok_or_raise(|| ErrorKind::NoWritableTag(path.to_path_buf()))?;

        text(tag, ItemKey::TrackTitle, &entity.title);
        text(tag, ItemKey::AlbumTitle, &entity.album);
        text(tag, ItemKey::TrackArtist, &entity.artists.join(LIST_SEPARATOR));
        text(tag, ItemKey::AlbumArtist, &entity.album_artists.join(LIST_SEPARATOR));
        text(tag, ItemKey::Genre, &entity.genres.join(LIST_SEPARATOR));
        if entity.year == 0 {
            tag.remove_key(ItemKey::Year);
        } else {
            tag.insert_text(ItemKey::Year, entity.year.to_string());
        }
        if entity.track == 0 {
            tag.remove_track();
        } else {
            tag.set_track(entity.track);
        }

        tagged_file
            .save_to_path(path, WriteOptions::default())
            .or_raise(|| ErrorKind::Save(path.to_path_buf()))?;
        tracing::debug!("Saved tags");
        Ok(())
    }
}
impl TagStore for LoftyStore {
    fn read(&self, path: &Path) -> LibraryResult<MediaEntity> {
        self.read_entity(path).or_raise(|| LibraryErrorKind::ReadTags(path.to_path_buf()))
    }

    fn write(&self, entity: &MediaEntity) -> LibraryResult<()> {
        self.write_entity(entity).or_raise(|| LibraryErrorKind::WriteTags(entity.path.clone()))
    }
}

fn list(tag: &Tag, key: ItemKey) -> Vec<String> {
    split(tag.get_strings(key))
}

fn split<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    values
        .flat_map(|value| value.split(LIST_DELIMITER))
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .collect()
}

fn text(tag: &mut Tag, key: ItemKey, value: &str) {
    if value.trim().is_empty() {
        tag.remove_key(key);
    } else {
        tag.insert_text(key, value.to_string());
    }
}

/// Year from either a bare year or a date such as `1999-04-01`.
fn parse_year(value: &str) -> Option<u32> {
    let digits: String = value.trim().chars().take_while(char::is_ascii_digit).collect();
    digits.parse().ok().filter(|year| *year != 0)
}
