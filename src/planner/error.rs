use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("window size must be a positive number of seconds, got {0}")]
    InvalidWindow(f64),
    #[error("media duration must be a non-negative number of seconds, got {0}")]
    InvalidDuration(f64),
}

#[derive(Debug, Error)]
pub enum InterpolationError {
    #[error("no telemetry sample on either side of {0}")]
    NoBracket(DateTime<Utc>),
}
