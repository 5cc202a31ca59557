use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CollaboratorError {
    #[error("failed to start {tool}: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{tool} exited with code {code}: {stderr}")]
    Exit {
        tool: String,
        code: i32,
        stderr: String,
    },
    #[error("no artifact written at {0}")]
    MissingArtifact(PathBuf),
}
