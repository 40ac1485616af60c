//! CLI Error Types
//!
//! Only errors that end the run surface here. Per-file problems are reported
//! in the batch summary instead.

use derive_more::{Display, Error};
use std::path::PathBuf;

pub type Error = exn::Exn<ErrorKind>;
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// Settings or the rule file couldn't be loaded.
    #[display("could not load configuration")]
    Config,
    /// The filename rules don't compile.
    #[display("invalid filename rules")]
    Rules,
    /// The rename templates are unusable.
    #[display("invalid rename templates")]
    Templates,
    /// The directory argument isn't an existing directory.
    #[display("not a usable directory: {}", _0.display())]
    Directory(#[error(not(source))] PathBuf),
    /// The reorganization was aborted part way through.
    #[display("reorganization aborted")]
    Organize,
}
