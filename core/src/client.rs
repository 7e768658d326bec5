//! Stateless request builder and response parser for the student endpoint.
//!
//! # Design
//! `StudentClient` holds only a `base_url`. Each entry point is split into a
//! `build_*` method that produces an `HttpRequest` and `parse_bulk_response`
//! that consumes an `HttpResponse`. `create_students` / `update_students`
//! chain the two through an injected [`HttpTransport`], so the client itself
//! never touches the network.

use serde_json::Value;

use crate::error::{ApiError, Result};
use crate::http::{HttpRequest, HttpResponse, HttpTransport, RequestOptions};
use crate::payload::{build_students_payload, envelope};
use crate::types::{Action, BulkOutcome};

/// Path of the bulk student endpoint, relative to the server root.
pub const STUDENT_ENDPOINT: &str = "/ws/v1/student";

/// Synchronous, stateless client for the bulk student endpoint.
#[derive(Debug, Clone)]
pub struct StudentClient {
    base_url: String,
}

impl StudentClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build the INSERT batch for `request` (`{"students": [{...}, ...]}`).
    pub fn build_create_students(&self, request: &Value) -> Result<HttpRequest> {
        let records = build_students_payload(Action::Insert, request)?;
        self.bulk_request(records)
    }

    /// Build the UPDATE batch for `request`. `Ok(None)` when no record was
    /// produced and nothing should be sent.
    pub fn build_update_students(&self, request: &Value) -> Result<Option<HttpRequest>> {
        let records = build_students_payload(Action::Update, request)?;
        if records.is_empty() {
            return Ok(None);
        }
        self.bulk_request(records).map(Some)
    }

    /// Interpret the endpoint's answer. Only status 200 counts as success;
    /// every other status becomes `BulkOutcome::Failed` with the raw body.
    pub fn parse_bulk_response(&self, response: HttpResponse) -> Result<BulkOutcome> {
        if response.status != 200 {
            tracing::warn!(
                status = response.status,
                "student endpoint returned a non-success status"
            );
            return Ok(BulkOutcome::Failed {
                error_message: response.body,
            });
        }
        serde_json::from_str(&response.body)
            .map(BulkOutcome::Completed)
            .map_err(|e| ApiError::DeserializationError(e.to_string()))
    }

    /// Create every student in `request` with one bulk POST.
    pub fn create_students<T: HttpTransport + ?Sized>(
        &self,
        transport: &T,
        request: &Value,
    ) -> Result<BulkOutcome> {
        let req = self.build_create_students(request)?;
        self.send(transport, Action::Insert, req)
    }

    /// Update every student in `request` with one bulk POST.
    ///
    /// Returns `BulkOutcome::Skipped` without calling the transport when no
    /// record was produced.
    pub fn update_students<T: HttpTransport + ?Sized>(
        &self,
        transport: &T,
        request: &Value,
    ) -> Result<BulkOutcome> {
        let records = build_students_payload(Action::Update, request)?;
        if records.is_empty() {
            return Ok(BulkOutcome::Skipped(records));
        }
        let req = self.bulk_request(records)?;
        self.send(transport, Action::Update, req)
    }

    fn send<T: HttpTransport + ?Sized>(
        &self,
        transport: &T,
        action: Action,
        req: HttpRequest,
    ) -> Result<BulkOutcome> {
        tracing::debug!(%action, path = %req.path, "posting student batch");
        let response = transport.post(&req.path, &req.options)?;
        self.parse_bulk_response(response)
    }

    fn bulk_request(&self, records: Vec<Value>) -> Result<HttpRequest> {
        tracing::debug!(records = records.len(), "built student batch");
        let body = serde_json::to_string(&envelope(records))
            .map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(HttpRequest {
            path: format!("{}{STUDENT_ENDPOINT}", self.base_url),
            options: RequestOptions {
                headers: vec![
                    ("content-type".to_string(), "application/json".to_string()),
                    ("accept".to_string(), "application/json".to_string()),
                ],
                body,
            },
        })
    }
}
