//! Filename-driven tag recovery.
//!
//! - [`PatternMatcher`] tries an ordered list of regular expressions against a
//!   filename; the first rule that matches wins.
//! - [`FieldExtractor`] turns the named groups of that match into normalized
//!   [`ExtractedFields`].
//! - [`plan_updates`] diffs the extracted fields against a [`MediaEntity`] and
//!   returns only what needs to change.

mod consts;
pub mod error;
mod fields;
mod matcher;
pub mod models;
mod update;

pub use crate::consts::{LIST_DELIMITER, LIST_SEPARATOR, UNKNOWN_SENTINEL};
pub use crate::fields::{ExtractedFields, FieldExtractor, GenreLookup};
pub use crate::matcher::{PatternMatch, PatternMatcher};
pub use crate::update::{TagUpdate, UpdateMap, plan_updates};
