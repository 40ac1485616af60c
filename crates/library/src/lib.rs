//! Batch operations over a media library.
//!
//! - [`scan`]: discover media files below a working root and read their tags.
//! - [`retag`]: recover tags from filenames and write them back.
//! - [`organize`]: rename and move files according to rename templates.
//!
//! Tag containers and the operator are reached through the [`TagStore`] and
//! [`Prompt`] traits.

pub mod confirm;
pub mod error;
pub mod organize;
mod report;
pub mod retag;
pub mod scan;
mod store;
mod template;

pub use crate::confirm::{AutoConfirm, Choice, Prompt};
pub use crate::report::{Failure, Report};
pub use crate::store::TagStore;
pub use crate::template::{RenamePattern, RenamePatterns};
