use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use strum_macros::Display;
use thiserror::Error;

const DEFAULT_TRACK_LOG: &str = "log.gpx";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("time mode should be one of \"timegps\", \"timecapture\", got {0:?}")]
    InvalidTimeBasis(String),
    #[error("{flag} must be a number, got {value:?}")]
    InvalidWindow { flag: &'static str, value: String },
    #[error("{0}")]
    WindowOutOfRange(String),
    #[error("time mode is timecapture but the source has no CreateDate")]
    MissingCaptureDate,
}

/// Which clock anchors offset zero of the video.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TimeBasis {
    /// Timestamp of the first GPS sample.
    #[default]
    TimeGps,
    /// The asset's `CreateDate`.
    TimeCapture,
}

impl FromStr for TimeBasis {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "timegps" => Ok(TimeBasis::TimeGps),
            "timecapture" => Ok(TimeBasis::TimeCapture),
            _ => Err(ConfigError::InvalidTimeBasis(s.to_string())),
        }
    }
}

/// Optional YAML configuration file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub tools: ToolsConfig,
    pub time: Option<String>,
    pub track_log: Option<PathBuf>,
    pub report: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    pub exiftool: Option<PathBuf>,
    pub ffmpeg: Option<PathBuf>,
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }
}

/// Command-line values that take precedence over the file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub exiftool: Option<PathBuf>,
    pub ffmpeg: Option<PathBuf>,
    pub time: Option<String>,
    pub track_log: Option<PathBuf>,
    pub no_report: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub exiftool: PathBuf,
    pub ffmpeg: PathBuf,
    pub time_basis: TimeBasis,
    pub track_log: PathBuf,
    pub write_report: bool,
}

impl Settings {
    pub fn resolve(config: Config, overrides: Overrides) -> Result<Self, ConfigError> {
        let time_basis = overrides
            .time
            .or(config.time)
            .map(|t| t.parse())
            .transpose()?
            .unwrap_or_default();

        Ok(Settings {
            exiftool: overrides
                .exiftool
                .or(config.tools.exiftool)
                .unwrap_or_else(|| default_tool("exiftool")),
            ffmpeg: overrides
                .ffmpeg
                .or(config.tools.ffmpeg)
                .unwrap_or_else(|| default_tool("ffmpeg")),
            time_basis,
            track_log: overrides
                .track_log
                .or(config.track_log)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_TRACK_LOG)),
            write_report: !overrides.no_report && config.report.unwrap_or(true),
        })
    }
}

/// On Windows a tool shipped next to the executable wins over `PATH`.
fn default_tool(name: &str) -> PathBuf {
    if cfg!(windows) {
        let bundled = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|dir| dir.join(format!("{}.exe", name))));
        if let Some(path) = bundled.filter(|p| p.is_file()) {
            return path;
        }
    }
    PathBuf::from(name)
}

/// Clip length: plain seconds (`2.5`) or a humantime duration (`1m30s`).
pub fn clip_window_seconds(text: &str) -> Result<f64, ConfigError> {
    let text = text.trim();
    let seconds = match text.parse::<f64>() {
        Ok(seconds) => seconds,
        Err(_) => humantime::parse_duration(text)
            .map_err(|_| ConfigError::InvalidWindow {
                flag: "window",
                value: text.to_string(),
            })?
            .as_secs_f64(),
    };

    if !seconds.is_finite() || seconds <= 0.0 {
        return Err(ConfigError::WindowOutOfRange(format!(
            "window must be a positive duration, got {}",
            text
        )));
    }
    Ok(seconds)
}

/// Still-frame spacing: `1 / fps`, at least one second.
pub fn frame_window_seconds(text: &str) -> Result<f64, ConfigError> {
    let text = text.trim();
    let fps: f64 = text.parse().map_err(|_| ConfigError::InvalidWindow {
        flag: "frame rate",
        value: text.to_string(),
    })?;

    if !fps.is_finite() || fps <= 0.0 {
        return Err(ConfigError::WindowOutOfRange(format!(
            "frame rate must be positive, got {}",
            text
        )));
    }
    let window = 1.0 / fps;
    if window < 1.0 {
        return Err(ConfigError::WindowOutOfRange(format!(
            "frame rate {} is faster than one frame per second",
            text
        )));
    }
    Ok(window)
}
