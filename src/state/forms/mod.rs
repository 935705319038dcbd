//! Form domain layer
//!
//! Field identifiers and the declarative constraints checked before a
//! step transition or a submission.

mod field;
mod schema;

pub use field::{Field, UnknownField};
pub use schema::{parse_amount, validate_field, validate_subset, FieldValues, ValidationErrors};
