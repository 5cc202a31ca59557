use std::path::PathBuf;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use strum_macros::Display;

use crate::config::{ConfigError, TimeBasis};
use crate::executor::{ArtifactKind, PanoramaTags, TagSet, TagWriter, TranscodeRequest, Transcoder};
use crate::failure::{Stage, WindowFailure};
use crate::pipeline::PipelineError;
use crate::planner::{interpolate, BracketCursor, InterpolatedFix, PlanError, WindowPlanner};
use crate::telemetry::{InputError, MediaDescriptor, TelemetrySeries};

const FRAME_EXTENSION: &str = "jpg";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Variant {
    /// One sub-clip per window.
    Clips,
    /// One still frame per window, tagged as a photo sphere.
    Frames,
}

#[derive(Debug, Clone)]
pub struct RunPlan {
    pub source: PathBuf,
    pub output_dir: PathBuf,
    pub variant: Variant,
    pub window_seconds: f64,
    pub time_basis: TimeBasis,
}

#[derive(Debug, Clone, Serialize)]
pub struct WindowOutcome {
    pub index: usize,
    pub offset_seconds: f64,
    pub target: DateTime<Utc>,
    pub artifact: PathBuf,
    pub fix: InterpolatedFix,
    pub ok: bool,
    pub failure: Option<WindowFailure>,
}

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub anchor: DateTime<Utc>,
    pub windows: Vec<WindowOutcome>,
    /// One fix per window, in window order.
    pub track_log: Vec<InterpolatedFix>,
}

impl RunSummary {
    pub fn failures(&self) -> impl Iterator<Item = &WindowFailure> {
        self.windows.iter().filter_map(|w| w.failure.as_ref())
    }
}

pub struct Runner<'a> {
    pub plan: &'a RunPlan,
    pub transcoder: &'a dyn Transcoder,
    pub tag_writer: &'a dyn TagWriter,
}

impl Runner<'_> {
    /// Process every window in order: cut the artifact, resolve its position,
    /// tag it and append the fix to the track log.
    pub fn run(
        &self,
        descriptor: &MediaDescriptor,
        series: &TelemetrySeries,
    ) -> Result<RunSummary, PipelineError> {
        if series.is_empty() {
            return Err(InputError::NoTelemetry.into());
        }
        let anchor = resolve_anchor(self.plan.time_basis, descriptor, series)?;
        let planner = WindowPlanner::new(descriptor.duration_seconds, self.plan.window_seconds)?;

        let (kind, extension, panorama) = match self.plan.variant {
            Variant::Clips => (
                ArtifactKind::Clip {
                    duration_seconds: planner.window_seconds(),
                },
                descriptor.clip_extension(),
                None,
            ),
            Variant::Frames => (
                ArtifactKind::Frame,
                FRAME_EXTENSION.to_string(),
                Some(PanoramaTags::from(descriptor)),
            ),
        };
        let subsecond_names = planner.window_seconds().fract() != 0.0;

        log::info!(
            "Splitting {} into {} every {}s (time basis {}, anchor {})",
            self.plan.source.display(),
            self.plan.variant,
            planner.window_seconds(),
            self.plan.time_basis,
            anchor
        );

        let mut cursor = BracketCursor::new(series);
        let mut windows = Vec::new();
        let mut track_log = Vec::new();

        for (index, offset) in planner.offsets().enumerate() {
            let target = window_target(anchor, offset)?;
            let fix = interpolate(target, &cursor.advance_to(offset))?;

            let request = TranscodeRequest {
                source: self.plan.source.clone(),
                start_seconds: offset,
                kind,
                destination: self.plan.output_dir.join(artifact_name(
                    target,
                    subsecond_names,
                    &extension,
                )),
            };
            let tags = TagSet {
                capture_time: target,
                latitude: fix.latitude,
                longitude: fix.longitude,
                altitude_m: fix.altitude_m,
                panorama: panorama.clone(),
            };

            let failure = self.produce(index, &request, &tags).err();
            if let Some(failure) = &failure {
                log::warn!(
                    "Window {} at {}s failed during {}: {}",
                    index,
                    offset,
                    failure.stage,
                    failure.reason
                );
            }

            track_log.push(fix.clone());
            windows.push(WindowOutcome {
                index,
                offset_seconds: offset,
                target,
                artifact: request.destination,
                fix,
                ok: failure.is_none(),
                failure,
            });
        }

        Ok(RunSummary {
            anchor,
            windows,
            track_log,
        })
    }

    fn produce(
        &self,
        index: usize,
        request: &TranscodeRequest,
        tags: &TagSet,
    ) -> Result<(), WindowFailure> {
        let artifact = self
            .transcoder
            .transcode(request)
            .map_err(|e| WindowFailure::new(index, Stage::Transcode, &e))?;
        log::info!(
            "Got {} from video at {} seconds: {}",
            request.kind,
            request.start_seconds,
            artifact.display()
        );

        self.tag_writer
            .write_tags(&artifact, tags)
            .map_err(|e| WindowFailure::new(index, Stage::TagWrite, &e))?;
        log::info!("Set metadata of {}", artifact.display());
        Ok(())
    }
}

/// Absolute time of media offset zero.
pub fn resolve_anchor(
    basis: TimeBasis,
    descriptor: &MediaDescriptor,
    series: &TelemetrySeries,
) -> Result<DateTime<Utc>, PipelineError> {
    match basis {
        TimeBasis::TimeGps => series
            .first()
            .map(|s| s.timestamp)
            .ok_or_else(|| InputError::NoTelemetry.into()),
        TimeBasis::TimeCapture => descriptor
            .create_date
            .ok_or_else(|| ConfigError::MissingCaptureDate.into()),
    }
}

/// `anchor + offset`, or an error once the offset leaves chrono's range.
fn window_target(anchor: DateTime<Utc>, offset_seconds: f64) -> Result<DateTime<Utc>, PlanError> {
    let nanos = (offset_seconds * 1e9).round();
    if !nanos.is_finite() || nanos.abs() >= i64::MAX as f64 {
        return Err(PlanError::InvalidDuration(offset_seconds));
    }
    anchor
        .checked_add_signed(Duration::nanoseconds(nanos as i64))
        .ok_or(PlanError::InvalidDuration(offset_seconds))
}

fn artifact_name(target: DateTime<Utc>, subsecond: bool, extension: &str) -> String {
    let stamp = target.format("%Y_%m_%d_%H%M%S");
    if subsecond {
        format!("{}_{:03}.{}", stamp, target.timestamp_subsec_millis(), extension)
    } else {
        format!("{}.{}", stamp, extension)
    }
}
