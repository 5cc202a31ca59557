//! External collaborators: metadata read/write (exiftool) and transcoding
//! (ffmpeg). The pipeline only sees the three traits below, so it can run
//! against fakes in tests.

mod error;
mod exiftool;
mod ffmpeg;
mod process;
mod types;

use std::path::{Path, PathBuf};

pub use error::CollaboratorError;
pub use exiftool::ExifTool;
pub use ffmpeg::Ffmpeg;
pub use types::{ArtifactKind, PanoramaTags, TagSet, TranscodeRequest};

pub trait MetadataReader {
    /// Raw JSON metadata of `input`, including per-stream GPS fields.
    fn read_metadata(&self, input: &Path) -> Result<String, CollaboratorError>;
}

pub trait Transcoder {
    /// Produce one artifact and return its path.
    fn transcode(&self, request: &TranscodeRequest) -> Result<PathBuf, CollaboratorError>;
}

pub trait TagWriter {
    /// Overwrite the tags of `artifact` in place.
    fn write_tags(&self, artifact: &Path, tags: &TagSet) -> Result<(), CollaboratorError>;
}
