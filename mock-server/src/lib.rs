use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::{net::TcpListener, sync::RwLock};

pub const STUDENT_PATH: &str = "/ws/v1/student";

#[derive(Deserialize)]
pub struct BulkRequest {
    pub students: StudentList,
}

#[derive(Deserialize)]
pub struct StudentList {
    pub student: Vec<PostedStudent>,
}

#[derive(Deserialize)]
pub struct PostedStudent {
    pub action: String,
    pub client_uid: String,
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub local_id: Option<i64>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkResponse {
    pub results: BulkResults,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkResults {
    pub update_count: u64,
    pub result: Vec<RecordResult>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordResult {
    pub client_uid: String,
    pub status: String,
    pub action: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success_message: Option<SuccessMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<ErrorMessage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuccessMessage {
    pub id: i64,
    #[serde(rename = "ref")]
    pub reference: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorMessage {
    pub error: Vec<FieldError>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub error_description: String,
}

#[derive(Debug)]
pub struct Store {
    next_id: i64,
    students: HashMap<i64, Map<String, Value>>,
}

impl Default for Store {
    fn default() -> Self {
        Self {
            next_id: 1000,
            students: HashMap::new(),
        }
    }
}

pub type Db = Arc<RwLock<Store>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route(STUDENT_PATH, post(post_students))
        .route("/ws/v1/student/{id}", get(get_student))
        .with_state(db)
}

/// A server that answers every request with 500 and `body`.
pub fn failing_app(body: &'static str) -> Router {
    Router::new().fallback(move || async move { (StatusCode::INTERNAL_SERVER_ERROR, body) })
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

pub async fn run_failing(listener: TcpListener, body: &'static str) -> Result<(), std::io::Error> {
    axum::serve(listener, failing_app(body)).await
}

async fn post_students(State(db): State<Db>, Json(input): Json<BulkRequest>) -> Json<BulkResponse> {
    let mut store = db.write().await;
    let result: Vec<RecordResult> = input
        .students
        .student
        .into_iter()
        .map(|posted| store.apply(posted))
        .collect();
    let update_count = result.iter().filter(|r| r.status == "SUCCESS").count() as u64;
    tracing::info!(records = result.len(), update_count, "bulk student request");
    Json(BulkResponse {
        results: BulkResults {
            update_count,
            result,
        },
    })
}

async fn get_student(
    State(db): State<Db>,
    Path(id): Path<i64>,
) -> Result<Json<Map<String, Value>>, StatusCode> {
    let store = db.read().await;
    store.students.get(&id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

impl Store {
    fn apply(&mut self, posted: PostedStudent) -> RecordResult {
        let outcome = match posted.action.as_str() {
            "INSERT" => self.insert(posted.local_id, posted.fields),
            "UPDATE" => self.update(posted.id, posted.fields),
            _ => Err(field_error("action", "action must be INSERT or UPDATE")),
        };
        let (success_message, error_message, status) = match outcome {
            Ok(id) => (
                Some(SuccessMessage {
                    id,
                    reference: format!("{STUDENT_PATH}/{id}"),
                }),
                None,
                "SUCCESS",
            ),
            Err(err) => (None, Some(err), "ERROR"),
        };
        RecordResult {
            client_uid: posted.client_uid,
            status: status.to_string(),
            action: posted.action,
            success_message,
            error_message,
        }
    }

    fn insert(&mut self, local_id: Option<i64>, mut fields: Map<String, Value>) -> Result<i64, ErrorMessage> {
        let local_id = local_id.ok_or_else(|| field_error("local_id", "local_id is required"))?;
        let taken = self
            .students
            .values()
            .any(|s| s.get("local_id").and_then(Value::as_i64) == Some(local_id));
        if taken {
            return Err(field_error("local_id", "local_id is already in use"));
        }

        let id = self.next_id;
        self.next_id += 1;
        fields.insert("id".to_string(), Value::from(id));
        fields.insert("local_id".to_string(), Value::from(local_id));
        self.students.insert(id, fields);
        Ok(id)
    }

    fn update(&mut self, id: Option<i64>, fields: Map<String, Value>) -> Result<i64, ErrorMessage> {
        let id = id.ok_or_else(|| field_error("id", "id is required"))?;
        let stored = self
            .students
            .get_mut(&id)
            .ok_or_else(|| field_error("id", "student not found"))?;
        for (key, value) in fields {
            let replaced = match (stored.get_mut(&key), value) {
                (Some(Value::Object(existing)), Value::Object(incoming)) => {
                    existing.extend(incoming);
                    None
                }
                (_, value) => Some(value),
            };
            if let Some(value) = replaced {
                stored.insert(key, value);
            }
        }
        Ok(id)
    }
}

fn field_error(field: &str, description: &str) -> ErrorMessage {
    ErrorMessage {
        error: vec![FieldError {
            field: field.to_string(),
            error_description: description.to_string(),
        }],
    }
}
