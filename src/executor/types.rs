use std::path::PathBuf;

use chrono::{DateTime, Utc};
use strum_macros::Display;

use crate::telemetry::MediaDescriptor;

#[derive(Debug, Clone, Copy, PartialEq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum ArtifactKind {
    Clip { duration_seconds: f64 },
    Frame,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TranscodeRequest {
    pub source: PathBuf,
    pub start_seconds: f64,
    pub kind: ArtifactKind,
    pub destination: PathBuf,
}

/// Values written onto one artifact.
#[derive(Debug, Clone, PartialEq)]
pub struct TagSet {
    pub capture_time: DateTime<Utc>,
    pub latitude: f64,
    pub longitude: f64,
    pub altitude_m: f64,
    pub panorama: Option<PanoramaTags>,
}

/// Photo-sphere block copied from the source video onto still frames.
#[derive(Debug, Clone, PartialEq)]
pub struct PanoramaTags {
    pub projection: String,
    pub make: Option<String>,
    pub model: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl From<&MediaDescriptor> for PanoramaTags {
    fn from(descriptor: &MediaDescriptor) -> Self {
        Self {
            projection: descriptor.projection.clone(),
            make: descriptor.make.clone(),
            model: descriptor.model.clone(),
            width: descriptor.image_width,
            height: descriptor.image_height,
        }
    }
}
