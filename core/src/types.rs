//! Action tags and result types of the student bulk endpoint.
//!
//! # Design
//! The endpoint's 200 body is handed back untouched inside
//! [`BulkOutcome::Completed`]; [`BulkResults`] is an optional typed view for
//! callers that want per-record status without walking JSON themselves.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::{ApiError, Result};

/// What the endpoint should do with each record of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Action {
    Insert,
    Update,
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Action::Insert => "INSERT",
            Action::Update => "UPDATE",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "INSERT" => Ok(Action::Insert),
            "UPDATE" => Ok(Action::Update),
            other => Err(ApiError::invalid(format!(
                "action must be 'INSERT' or 'UPDATE', got {other:?}"
            ))),
        }
    }
}

/// What `create_students` / `update_students` hand back.
///
/// Serializes to exactly what the caller would see on the wire: the
/// endpoint's own body, `{"errorMessage": ...}`, or the empty record array.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum BulkOutcome {
    /// Status 200; the parsed response body.
    Completed(Value),
    /// Any other status; the raw response body.
    Failed {
        #[serde(rename = "errorMessage")]
        error_message: String,
    },
    /// Update short-circuit: the mapper produced no records, nothing was sent.
    Skipped(Vec<Value>),
}

impl BulkOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, BulkOutcome::Completed(_))
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            BulkOutcome::Failed { error_message } => Some(error_message.as_str()),
            _ => None,
        }
    }

    /// Typed view of a `Completed` body. `Ok(None)` for the other variants.
    pub fn results(&self) -> Result<Option<BulkResults>> {
        match self {
            BulkOutcome::Completed(body) => {
                let response: BulkResponse = serde_json::from_value(body.clone())
                    .map_err(|e| ApiError::DeserializationError(e.to_string()))?;
                Ok(Some(response.results))
            }
            _ => Ok(None),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct BulkResponse {
    results: BulkResults,
}

/// Summary of a bulk POST.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BulkResults {
    pub update_count: u64,
    /// One entry per posted record. The endpoint sends a bare object instead
    /// of an array when a single record was posted.
    #[serde(default, deserialize_with = "one_or_many")]
    pub result: Vec<RecordResult>,
}

/// Per-record status reported by the endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RecordResult {
    /// Echo of the posted `client_uid`; some servers send it back as a number.
    pub client_uid: Value,
    pub status: String,
    pub action: Action,
    #[serde(default)]
    pub success_message: Option<SuccessMessage>,
    #[serde(default)]
    pub error_message: Option<Value>,
}

impl RecordResult {
    pub fn is_success(&self) -> bool {
        self.status.eq_ignore_ascii_case("SUCCESS")
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SuccessMessage {
    pub id: Value,
    #[serde(rename = "ref", default)]
    pub reference: Option<String>,
}

fn one_or_many<'de, D>(deserializer: D) -> std::result::Result<Vec<RecordResult>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        Many(Vec<RecordResult>),
        One(Box<RecordResult>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::Many(many) => many,
        OneOrMany::One(one) => vec![*one],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn action_parses_exact_tags_only() {
        assert_eq!("INSERT".parse::<Action>().unwrap(), Action::Insert);
        assert_eq!("UPDATE".parse::<Action>().unwrap(), Action::Update);
        assert!(matches!("".parse::<Action>(), Err(ApiError::InvalidArgument(_))));
        assert!(matches!("insert".parse::<Action>(), Err(ApiError::InvalidArgument(_))));
        assert!(matches!("DELETE".parse::<Action>(), Err(ApiError::InvalidArgument(_))));
    }

    #[test]
    fn action_serializes_upper_case() {
        assert_eq!(serde_json::to_value(Action::Insert).unwrap(), json!("INSERT"));
        assert_eq!(Action::Update.to_string(), "UPDATE");
    }

    #[test]
    fn failed_outcome_serializes_to_error_message_map() {
        let outcome = BulkOutcome::Failed {
            error_message: "Server Error".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&outcome).unwrap(),
            json!({"errorMessage": "Server Error"})
        );
        assert_eq!(outcome.error_message(), Some("Server Error"));
        assert!(outcome.results().unwrap().is_none());
    }

    #[test]
    fn skipped_outcome_serializes_to_empty_array() {
        let outcome = BulkOutcome::Skipped(Vec::new());
        assert_eq!(serde_json::to_value(&outcome).unwrap(), json!([]));
    }

    #[test]
    fn results_view_reads_record_array() {
        let outcome = BulkOutcome::Completed(json!({
            "results": {
                "update_count": 2,
                "result": [
                    {
                        "client_uid": "124",
                        "status": "SUCCESS",
                        "action": "INSERT",
                        "success_message": {"id": 442, "ref": "https://sis.test/ws/v1/student/442"}
                    },
                    {
                        "client_uid": 125,
                        "status": "ERROR",
                        "action": "UPDATE",
                        "error_message": {"error": [{"field": "id", "error_description": "not found"}]}
                    }
                ]
            }
        }));
        let results = outcome.results().unwrap().unwrap();
        assert_eq!(results.update_count, 2);
        assert_eq!(results.result.len(), 2);
        assert!(results.result[0].is_success());
        assert_eq!(
            results.result[0].success_message.as_ref().unwrap().reference.as_deref(),
            Some("https://sis.test/ws/v1/student/442")
        );
        assert!(!results.result[1].is_success());
        assert_eq!(results.result[1].client_uid, json!(125));
        assert!(results.result[1].error_message.is_some());
    }

    #[test]
    fn results_view_accepts_single_record_object() {
        let outcome = BulkOutcome::Completed(json!({
            "results": {
                "update_count": 1,
                "result": {"client_uid": "7", "status": "SUCCESS", "action": "UPDATE",
                           "success_message": {"id": 7}}
            }
        }));
        let results = outcome.results().unwrap().unwrap();
        assert_eq!(results.result.len(), 1);
        assert_eq!(results.result[0].action, Action::Update);
    }

    #[test]
    fn results_view_rejects_foreign_body() {
        let outcome = BulkOutcome::Completed(json!({"unexpected": true}));
        assert!(matches!(outcome.results(), Err(ApiError::DeserializationError(_))));
    }
}
