mod error;
pub mod gpx;
mod report;
mod runner;

use std::fs;

use chrono::Utc;

pub use error::PipelineError;
pub use report::{RunReport, REPORT_FILE};
pub use runner::{resolve_anchor, RunPlan, RunSummary, Runner, Variant};

use crate::config::Settings;
use crate::executor::{MetadataReader, TagWriter, Transcoder};
use crate::planner::WindowPlanner;
use crate::telemetry;

/// The collaborators one run talks to.
pub struct Collaborators<'a> {
    pub reader: &'a dyn MetadataReader,
    pub transcoder: &'a dyn Transcoder,
    pub tag_writer: &'a dyn TagWriter,
}

/// Extract telemetry, process every window, then write the track log and
/// the run report. Fails before touching the output directory when the
/// source or the configuration is unusable.
pub fn execute(
    plan: &RunPlan,
    settings: &Settings,
    tools: &Collaborators,
) -> Result<RunSummary, PipelineError> {
    let started_at = Utc::now();
    let (descriptor, series) = telemetry::extract(tools.reader, &plan.source)?;
    if series.is_empty() {
        return Err(telemetry::InputError::NoTelemetry.into());
    }
    resolve_anchor(plan.time_basis, &descriptor, &series)?;
    WindowPlanner::new(descriptor.duration_seconds, plan.window_seconds)?;

    fs::create_dir_all(&plan.output_dir)?;

    let runner = Runner {
        plan,
        transcoder: tools.transcoder,
        tag_writer: tools.tag_writer,
    };
    let summary = runner.run(&descriptor, &series)?;

    gpx::write_track_log(&settings.track_log, &summary.track_log)?;

    if settings.write_report {
        let path = plan.output_dir.join(REPORT_FILE);
        RunReport::new(plan, &summary, started_at).save(&path)?;
        log::info!("Run report written to {}", path.display());
    }

    Ok(summary)
}
