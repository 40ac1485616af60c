use super::entity::{MediaEntity, has_values};
use crate::consts::LIST_SEPARATOR;
use crate::error::{Error, ErrorKind};
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// One of the tag fields that can appear as a `%PLACEHOLDER%` in a rename
/// template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    AlbumArtists,
    Artists,
    Album,
    Title,
    Year,
    Track,
}
impl Field {
    /// Every field in the vocabulary.
    pub const ALL: [Field; 6] = [
        Field::AlbumArtists,
        Field::Artists,
        Field::Album,
        Field::Title,
        Field::Year,
        Field::Track,
    ];

    /// Placeholder name, without the surrounding `%` signs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::AlbumArtists => "ALBUMARTISTS",
            Field::Artists => "ARTISTS",
            Field::Album => "ALBUM",
            Field::Title => "TITLE",
            Field::Year => "YEAR",
            Field::Track => "TRACK",
        }
    }

    /// The full `%NAME%` token.
    pub fn placeholder(&self) -> String {
        format!("%{}%", self.as_str())
    }

    /// Whether this field counts as populated on the given entity.
    pub fn is_populated(&self, entity: &MediaEntity) -> bool {
        match self {
            Field::AlbumArtists => has_values(&entity.album_artists),
            Field::Artists => has_values(&entity.artists),
            Field::Album => !entity.album.trim().is_empty(),
            Field::Title => !entity.title.trim().is_empty(),
            Field::Year => entity.year != 0,
            Field::Track => entity.track != 0,
        }
    }

    /// Textual (unsanitized) value of this field on the given entity.
    pub fn value(&self, entity: &MediaEntity) -> String {
        match self {
            Field::AlbumArtists => entity.album_artists.join(LIST_SEPARATOR),
            Field::Artists => entity.artists.join(LIST_SEPARATOR),
            Field::Album => entity.album.clone(),
            Field::Title => entity.title.clone(),
            Field::Year => entity.year.to_string(),
            Field::Track => entity.track.to_string(),
        }
    }
}
impl FromStr for Field {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().trim_matches('%') {
            "ALBUMARTISTS" => Self::AlbumArtists,
            "ARTISTS" => Self::Artists,
            "ALBUM" => Self::Album,
            "TITLE" => Self::Title,
            "YEAR" => Self::Year,
            "TRACK" => Self::Track,
            other => exn::bail!(ErrorKind::UnknownField(other.to_string())),
        })
    }
}
impl Display for Field {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

/// An order-irrelevant set of [`Field`]s.
///
/// Two sets compare equal when they hold the same members, regardless of the
/// order the fields were inserted in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FieldSet(BTreeSet<Field>);
impl FieldSet {
    /// The set of fields populated on `entity`.
    pub fn populated(entity: &MediaEntity) -> Self {
        Field::ALL.into_iter().filter(|field| field.is_populated(entity)).collect()
    }

    pub fn contains(&self, field: Field) -> bool {
        self.0.contains(&field)
    }

    pub fn insert(&mut self, field: Field) -> bool {
        self.0.insert(field)
    }

    pub fn iter(&self) -> impl Iterator<Item = Field> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
impl FromIterator<Field> for FieldSet {
    fn from_iter<I: IntoIterator<Item = Field>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
impl Display for FieldSet {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let names: Vec<_> = self.iter().map(|field| field.as_str()).collect();
        write!(f, "{{{}}}", names.join(", "))
    }
}
