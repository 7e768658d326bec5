//! Synchronous client core for a student-information-system bulk endpoint.
//!
//! # Overview
//! Turns flat per-student parameter maps into the nested records the SIS
//! expects at `POST /ws/v1/student`, then posts them as one batch through a
//! caller-supplied [`HttpTransport`] (host-does-IO pattern).
//!
//! # Design
//! - `StudentClient` is stateless and holds only `base_url`.
//! - `payload` is a pure function of its input: validate, map each record,
//!   format extension tables, prune empty entries.
//! - Caller mistakes are `ApiError::InvalidArgument` and abort the batch
//!   before any I/O. Non-200 answers are returned as
//!   `BulkOutcome::Failed { error_message }` data, not as errors.

pub mod client;
pub mod error;
pub mod http;
pub mod payload;
pub mod types;

pub use client::{StudentClient, STUDENT_ENDPOINT};
pub use error::{ApiError, Result};
pub use http::{HttpRequest, HttpResponse, HttpTransport, RequestOptions};
pub use payload::{build_student, build_students_payload, envelope};
pub use types::{Action, BulkOutcome, BulkResults, RecordResult, SuccessMessage};
