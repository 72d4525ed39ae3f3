use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::borrow::Cow;
use validator::{ValidationError, ValidationErrors};

use crate::datalayer::CRUD::helper::object_id::is_valid_object_id;
use crate::errors::{ServiceError, ServiceResult};

/// Primitive type a field must convert to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Number,
    ObjectId,
}

/// One entry of an input shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub required: bool,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub const fn required(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            required: true,
            kind,
        }
    }

    pub const fn optional(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            required: false,
            kind,
        }
    }
}

/// Typed input whose raw form is checked against `SCHEMA` before deserializing
pub trait ViewModel: DeserializeOwned {
    const SCHEMA: &'static [FieldSpec];
}

fn field_error(code: &'static str, message: String, value: Option<&Value>) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Owned(message));
    if let Some(value) = value {
        error.add_param(Cow::Borrowed("value"), value);
    }
    error
}

fn check_string(spec: &FieldSpec, value: &Value) -> Result<Value, ValidationError> {
    match value {
        Value::String(s) if s.is_empty() => Err(field_error(
            "is_not_empty",
            format!("{} should not be empty", spec.name),
            Some(value),
        )),
        Value::String(_) => Ok(value.clone()),
        _ => Err(field_error(
            "is_string",
            format!("{} must be a string", spec.name),
            Some(value),
        )),
    }
}

fn check_number(spec: &FieldSpec, value: &Value) -> Result<Value, ValidationError> {
    let not_a_number = || {
        field_error(
            "is_number",
            format!(
                "{} must be a number conforming to the specified constraints",
                spec.name
            ),
            Some(value),
        )
    };

    match value {
        Value::Number(_) => Ok(value.clone()),
        Value::String(s) if s.trim().is_empty() => Err(field_error(
            "is_not_empty",
            format!("{} should not be empty", spec.name),
            Some(value),
        )),
        // numeric strings are coerced, as urlencoded form bodies carry them
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .and_then(serde_json::Number::from_f64)
            .map(Value::Number)
            .ok_or_else(not_a_number),
        _ => Err(not_a_number()),
    }
}

fn check_object_id(spec: &FieldSpec, value: &Value) -> Result<Value, ValidationError> {
    match value {
        Value::String(s) if is_valid_object_id(s) => Ok(value.clone()),
        Value::String(_) => Err(field_error(
            "is_object_id",
            format!("{} must be a valid object id", spec.name),
            Some(value),
        )),
        _ => Err(field_error(
            "is_string",
            format!("{} must be a string", spec.name),
            Some(value),
        )),
    }
}

/// Check `input` against `schema`.
///
/// Every field is checked and all failures are reported together. On success
/// the returned object holds only the schema's fields, with numeric strings
/// converted to numbers and absent optional fields left out. Fields not in the
/// schema are ignored.
pub fn validate(schema: &[FieldSpec], input: &Map<String, Value>) -> Result<Map<String, Value>, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let mut converted = Map::new();

    for spec in schema {
        let value = match input.get(spec.name) {
            None | Some(Value::Null) => {
                if spec.required {
                    errors.add(
                        spec.name,
                        field_error(
                            "is_defined",
                            format!("{} should not be null or undefined", spec.name),
                            None,
                        ),
                    );
                }
                continue;
            }
            Some(value) => value,
        };

        let checked = match spec.kind {
            FieldKind::String => check_string(spec, value),
            FieldKind::Number => check_number(spec, value),
            FieldKind::ObjectId => check_object_id(spec, value),
        };

        match checked {
            Ok(value) => {
                converted.insert(spec.name.to_string(), value);
            }
            Err(error) => errors.add(spec.name, error),
        }
    }

    if errors.is_empty() {
        Ok(converted)
    } else {
        Err(errors)
    }
}

/// Validate a raw request body and convert it into `T`
pub fn validate_and_convert<T: ViewModel>(input: &Value) -> ServiceResult<T> {
    let object = input.as_object().ok_or_else(|| {
        ServiceError::InvalidInput("Request body must be a JSON object".to_string())
    })?;

    let converted = validate(T::SCHEMA, object)?;

    serde_json::from_value(Value::Object(converted))
        .map_err(|e| ServiceError::InvalidInput(e.to_string()))
}
