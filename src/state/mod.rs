//! Form state: fields, the draft record and the step flow

mod draft;
mod flow;
pub mod forms;

pub use draft::*;
pub use flow::*;
pub use forms::{Field, ValidationErrors};
