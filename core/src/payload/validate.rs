//! Shape checks run before any record is mapped.

use serde_json::{Map, Value};

use crate::error::{ApiError, Result};

const REQUEST_SHAPE: &str = r#"{"students": [{...}, {...}]}"#;

/// Check the top-level request and return its `students` array.
///
/// Only the first element is inspected here; the mapper rejects any later
/// element that is not a usable record.
pub fn validate_request(request: &Value) -> Result<&[Value]> {
    let students = request
        .as_object()
        .and_then(|obj| obj.get("students"))
        .and_then(Value::as_array)
        .ok_or_else(|| shape_error(request))?;

    match students.first() {
        Some(Value::Object(_)) => Ok(students.as_slice()),
        _ => Err(shape_error(request)),
    }
}

/// Check one element of `students` and return it as a map.
pub fn validate_record(record: &Value) -> Result<&Map<String, Value>> {
    match record {
        Value::Object(map) if !map.is_empty() => Ok(map),
        other => Err(ApiError::invalid(format!(
            "each student must be a non-empty map like {REQUEST_SHAPE}, got {other}"
        ))),
    }
}

fn shape_error(request: &Value) -> ApiError {
    ApiError::invalid(format!(
        "request must look like {REQUEST_SHAPE}, got {request}"
    ))
}
