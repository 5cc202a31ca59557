use thiserror::Error;

use crate::executor::CollaboratorError;

/// Failure to turn one textual field into a value. Recovered per stream.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("invalid angle: {0:?}")]
    InvalidAngle(String),
    #[error("invalid duration: {0:?}")]
    InvalidDuration(String),
    #[error("invalid timestamp: {0:?}")]
    InvalidTimestamp(String),
    #[error("{stream}: missing field {field}")]
    MissingField { stream: String, field: &'static str },
}

/// The source asset cannot be used at all.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("input file not found: {0}")]
    NotFound(String),
    #[error("metadata read failed: {0}")]
    Metadata(#[from] CollaboratorError),
    #[error("metadata output is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("metadata output contains no record")]
    NoRecord,
    #[error("unsupported projection: {}", .0.as_deref().unwrap_or("none"))]
    Projection(Option<String>),
    #[error("unreadable media duration: {0}")]
    Duration(ParseError),
    #[error("no usable GPS samples in source")]
    NoTelemetry,
}
