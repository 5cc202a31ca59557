use std::path::PathBuf;

use crate::executor::{process, ArtifactKind, CollaboratorError, TranscodeRequest, Transcoder};

pub struct Ffmpeg {
    program: PathBuf,
}

impl Ffmpeg {
    pub fn new(program: PathBuf) -> Self {
        Self { program }
    }
}

impl Transcoder for Ffmpeg {
    fn transcode(&self, request: &TranscodeRequest) -> Result<PathBuf, CollaboratorError> {
        process::run(&self.program, &args(request))?;

        if !request.destination.is_file() {
            return Err(CollaboratorError::MissingArtifact(
                request.destination.clone(),
            ));
        }
        Ok(request.destination.clone())
    }
}

fn args(request: &TranscodeRequest) -> Vec<String> {
    let mut args = vec![
        "-y".into(),
        "-ss".into(),
        request.start_seconds.to_string(),
        "-i".into(),
        request.source.display().to_string(),
    ];

    match request.kind {
        ArtifactKind::Clip { duration_seconds } => {
            args.extend([
                "-t".into(),
                duration_seconds.to_string(),
                "-c".into(),
                "copy".into(),
            ]);
        }
        ArtifactKind::Frame => {
            args.extend(["-vframes".into(), "1".into()]);
        }
    }

    args.push(request.destination.display().to_string());
    args
}
