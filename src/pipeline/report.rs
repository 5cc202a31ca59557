use std::{fs, io, path::Path, path::PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::TimeBasis;
use crate::pipeline::runner::{RunPlan, RunSummary, Variant, WindowOutcome};

pub const REPORT_FILE: &str = "run_report.yaml";

/// Per-run record of what was produced and which windows failed.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub source: PathBuf,
    pub variant: Variant,
    pub time_basis: TimeBasis,
    pub anchor: DateTime<Utc>,
    pub window_seconds: f64,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub failed_windows: Vec<usize>,
    pub windows: Vec<WindowOutcome>,
}

impl RunReport {
    pub fn new(plan: &RunPlan, summary: &RunSummary, started_at: DateTime<Utc>) -> Self {
        Self {
            source: plan.source.clone(),
            variant: plan.variant,
            time_basis: plan.time_basis,
            anchor: summary.anchor,
            window_seconds: plan.window_seconds,
            started_at,
            completed_at: Utc::now(),
            failed_windows: summary.failures().map(|f| f.window).collect(),
            windows: summary.windows.clone(),
        }
    }

    pub fn save(&self, path: &Path) -> io::Result<()> {
        fs::write(
            path,
            serde_yaml::to_string(self)
                .map_err(|e| io::Error::other(format!("Failed to serialize report: {}", e)))?,
        )
    }
}
