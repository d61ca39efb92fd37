//! Collector error types
//!
//! Failures carry a kind and a structured detail. The detail only becomes
//! text when an error record is built for the output stream.

use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;

/// Why a single instance could not be assembled
#[derive(Error, Debug, Clone, PartialEq)]
pub enum JoinError {
    #[error("instance has no {0}")]
    MissingField(&'static str),

    #[error("join worker failed: {0}")]
    Worker(String),
}

impl JoinError {
    /// Structured form used as the error detail
    pub fn detail(&self, instance_name: Option<&str>) -> Value {
        match self {
            JoinError::MissingField(field) => json!({
                "reason": "missing_field",
                "field": field,
                "instance_name": instance_name,
            }),
            JoinError::Worker(message) => json!({
                "reason": "worker_failed",
                "message": message,
                "instance_name": instance_name,
            }),
        }
    }
}

/// Batch phase or step a failure belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Static cloud service type descriptors could not be produced
    Advertise,
    /// A shared resource list or the instance list could not be fetched
    Fetch,
    /// One instance could not be assembled
    Join,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::Advertise => write!(f, "advertise"),
            ErrorKind::Fetch => write!(f, "fetch"),
            ErrorKind::Join => write!(f, "join"),
        }
    }
}

/// A failure surfaced to the caller as an error record
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{kind} failed: {}", detail_text(.detail))]
pub struct CollectError {
    pub kind: ErrorKind,
    pub detail: Value,
}

impl CollectError {
    pub fn new(kind: ErrorKind, detail: Value) -> Self {
        Self { kind, detail }
    }

    /// Wrap an I/O failure; the whole context chain is kept
    pub fn from_anyhow(kind: ErrorKind, error: &anyhow::Error) -> Self {
        Self::new(kind, Value::String(format!("{:#}", error)))
    }

    pub fn from_join(error: &JoinError, instance_name: Option<&str>) -> Self {
        Self::new(ErrorKind::Join, error.detail(instance_name))
    }

    /// Text form of the detail; structured details are serialized as JSON
    pub fn message(&self) -> String {
        detail_text(&self.detail)
    }
}

fn detail_text(detail: &Value) -> String {
    match detail {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
