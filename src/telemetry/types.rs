use chrono::{DateTime, Utc};

pub const EQUIRECTANGULAR: &str = "equirectangular";

/// Asset-level metadata of the source video.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaDescriptor {
    pub projection: String,
    pub duration_seconds: f64,
    pub create_date: Option<DateTime<Utc>>,
    pub image_width: Option<u32>,
    pub image_height: Option<u32>,
    pub make: Option<String>,
    pub model: Option<String>,
    pub file_extension: Option<String>,
}

impl MediaDescriptor {
    /// Extension for clip outputs, lowercased, `mp4` when unknown.
    pub fn clip_extension(&self) -> String {
        self.file_extension
            .as_deref()
            .map(str::trim)
            .filter(|ext| !ext.is_empty())
            .map(str::to_lowercase)
            .unwrap_or_else(|| "mp4".to_string())
    }
}
