use thiserror::Error;

use crate::config::ConfigError;
use crate::pipeline::gpx::TrackLogError;
use crate::planner::{InterpolationError, PlanError};
use crate::telemetry::InputError;

/// Fatal errors. Per-window collaborator failures are not in here; they are
/// collected on the run summary instead.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("input error: {0}")]
    Input(#[from] InputError),
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("plan error: {0}")]
    Plan(#[from] PlanError),
    #[error("interpolation error: {0}")]
    Interpolation(#[from] InterpolationError),
    #[error("track log error: {0}")]
    TrackLog(#[from] TrackLogError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
