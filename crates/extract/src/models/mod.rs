mod entity;
mod field;

pub use self::entity::{MediaEntity, has_values};
pub use self::field::{Field, FieldSet};
