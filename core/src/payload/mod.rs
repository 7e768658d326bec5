//! Payload builder for the bulk student endpoint.
//!
//! # Overview
//! Turns a caller request of the form `{"students": [{...}, ...]}` into the
//! records the endpoint accepts, one per input, in input order:
//!
//! 1. [`validate`] checks the request shape.
//! 2. [`record`] maps each element for the chosen [`Action`].
//! 3. [`extension`] formats database-extension tables.
//! 4. [`prune`] strips null, empty-string and empty-object entries.
//!
//! Any malformed element rejects the whole batch; there is no partial result.

pub mod extension;
pub mod input;
pub mod prune;
pub mod record;
pub mod validate;

use serde_json::{json, Value};

use crate::error::{ApiError, Result};
use crate::types::Action;

pub use extension::{ExtensionData, ExtensionField, TableExtension};
pub use input::StudentInput;
pub use record::StudentRecord;

/// Validate `request` and map every student for `action`.
pub fn build_students_payload(action: Action, request: &Value) -> Result<Vec<Value>> {
    let students = validate::validate_request(request)?;
    students
        .iter()
        .map(|student| build_student(action, student))
        .collect()
}

/// Map a single element of `students` into its pruned wire form.
pub fn build_student(action: Action, student: &Value) -> Result<Value> {
    let map = validate::validate_record(student)?;
    let input: StudentInput = serde_json::from_value(Value::Object(map.clone()))
        .map_err(|e| ApiError::invalid(format!("malformed student {student}: {e}")))?;
    let record = StudentRecord::from_input(action, &input)?;

    let mut value =
        serde_json::to_value(&record).map_err(|e| ApiError::SerializationError(e.to_string()))?;
    prune::prune_empty(&mut value);
    Ok(value)
}

/// Wrap mapped records in the bulk envelope `{"students": {"student": [...]}}`.
pub fn envelope(records: Vec<Value>) -> Value {
    json!({ "students": { "student": records } })
}

/// Text form of a caller value: strings verbatim, `null` as empty, anything
/// else as its JSON text.
pub(crate) fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
