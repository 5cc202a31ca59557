use serde::Serialize;
use strum_macros::Display;

use crate::executor::CollaboratorError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Stage {
    Transcode,
    TagWrite,
}

/// A window whose artifact could not be produced or tagged.
/// Recorded and reported; never aborts the run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowFailure {
    pub window: usize,
    pub stage: Stage,
    pub reason: String,
}

impl WindowFailure {
    pub fn new(window: usize, stage: Stage, error: &CollaboratorError) -> Self {
        Self {
            window,
            stage,
            reason: error.to_string(),
        }
    }
}
