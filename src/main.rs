mod config;
mod executor;
mod failure;
mod pipeline;
mod planner;
mod telemetry;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use crate::config::{Config, Overrides, Settings};
use crate::executor::{ExifTool, Ffmpeg};
use crate::pipeline::{Collaborators, PipelineError, RunPlan, RunSummary, Variant};
use crate::planner::PlanError;

const EXIT_FAILURE: u8 = 1;
const EXIT_CONFIG: u8 = 2;
const EXIT_INPUT: u8 = 3;
const EXIT_PARTIAL: u8 = 4;

#[derive(Parser)]
#[command(name = "geoframes", version)]
#[command(about = "Split a 360 GPS video into geotagged clips or frames")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Split the video into clips of a fixed length
    Clips {
        #[command(flatten)]
        common: CommonArgs,
        /// Seconds per clip (`5`, `2.5`, `1m 30s`)
        #[arg(short, long)]
        window: String,
    },
    /// Extract geotagged still frames at a fixed rate
    Frames {
        #[command(flatten)]
        common: CommonArgs,
        /// Frames per second, at most 1
        #[arg(short = 'r', long)]
        frame_rate: String,
    },
}

#[derive(Args)]
struct CommonArgs {
    /// Path to input video
    input_path: PathBuf,
    /// Path to output folder
    output_directory: PathBuf,
    /// Path to the exiftool executable
    #[arg(short = 'e', long = "exiftool-exec-path")]
    exiftool: Option<PathBuf>,
    /// Path to the ffmpeg executable
    #[arg(short = 'f', long = "ffmpeg-exec-path")]
    ffmpeg: Option<PathBuf>,
    /// "timegps" or "timecapture"
    #[arg(short, long)]
    time: Option<String>,
    /// YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Where to write the GPX track log
    #[arg(long)]
    track_log: Option<PathBuf>,
    /// Skip writing run_report.yaml
    #[arg(long)]
    no_report: bool,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Clips { common, window } => run(common, Variant::Clips, &window),
        Commands::Frames { common, frame_rate } => run(common, Variant::Frames, &frame_rate),
    };

    match result {
        Ok(summary) => report(&summary),
        Err(e) => {
            log::error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::from(exit_code(&e))
        }
    }
}

fn run(common: CommonArgs, variant: Variant, window: &str) -> Result<RunSummary, PipelineError> {
    let config = match &common.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    let settings = Settings::resolve(
        config,
        Overrides {
            exiftool: common.exiftool,
            ffmpeg: common.ffmpeg,
            time: common.time,
            track_log: common.track_log,
            no_report: common.no_report,
        },
    )?;

    let window_seconds = match variant {
        Variant::Clips => config::clip_window_seconds(window)?,
        Variant::Frames => config::frame_window_seconds(window)?,
    };

    let plan = RunPlan {
        source: common.input_path,
        output_dir: common.output_directory,
        variant,
        window_seconds,
        time_basis: settings.time_basis,
    };

    let exiftool = ExifTool::new(settings.exiftool.clone());
    let ffmpeg = Ffmpeg::new(settings.ffmpeg.clone());
    let tools = Collaborators {
        reader: &exiftool,
        transcoder: &ffmpeg,
        tag_writer: &exiftool,
    };

    let started = Instant::now();
    let summary = pipeline::execute(&plan, &settings, &tools)?;
    let elapsed = Duration::from_millis(started.elapsed().as_millis() as u64);
    log::info!(
        "Processed {} windows in {}",
        summary.windows.len(),
        humantime::format_duration(elapsed)
    );

    Ok(summary)
}

fn report(summary: &RunSummary) -> ExitCode {
    let failures: Vec<_> = summary.failures().collect();
    println!(
        "Wrote {} of {} windows",
        summary.windows.len() - failures.len(),
        summary.windows.len()
    );

    if failures.is_empty() {
        return ExitCode::SUCCESS;
    }
    for failure in failures {
        eprintln!(
            "  window {}: {} failed: {}",
            failure.window, failure.stage, failure.reason
        );
    }
    ExitCode::from(EXIT_PARTIAL)
}

fn exit_code(err: &PipelineError) -> u8 {
    match err {
        PipelineError::Config(_) | PipelineError::Plan(PlanError::InvalidWindow(_)) => EXIT_CONFIG,
        PipelineError::Input(_) | PipelineError::Plan(PlanError::InvalidDuration(_)) => EXIT_INPUT,
        _ => EXIT_FAILURE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_frames_args() {
        let cli = Cli::try_parse_from([
            "geoframes", "frames", "in.mp4", "out", "-r", "0.5", "-t", "timecapture", "-e",
            "/opt/exiftool",
        ])
        .unwrap();
        match cli.command {
            Commands::Frames { common, frame_rate } => {
                assert_eq!(frame_rate, "0.5");
                assert_eq!(common.time.as_deref(), Some("timecapture"));
                assert_eq!(common.exiftool, Some(PathBuf::from("/opt/exiftool")));
                assert_eq!(common.output_directory, PathBuf::from("out"));
            }
            Commands::Clips { .. } => panic!("expected frames"),
        }
    }

    #[test]
    fn test_window_is_required() {
        assert!(Cli::try_parse_from(["geoframes", "clips", "in.mp4", "out"]).is_err());
    }

    #[test]
    fn test_exit_codes() {
        let config = PipelineError::Config(config::ConfigError::MissingCaptureDate);
        assert_eq!(exit_code(&config), EXIT_CONFIG);
        let input = PipelineError::Input(telemetry::InputError::NoRecord);
        assert_eq!(exit_code(&input), EXIT_INPUT);
    }
}
