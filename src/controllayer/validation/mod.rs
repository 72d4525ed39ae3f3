pub mod validation;

pub use validation::{FieldKind, FieldSpec, ViewModel, validate, validate_and_convert};
