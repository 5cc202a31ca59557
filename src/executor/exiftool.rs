use std::path::{Path, PathBuf};

use crate::executor::{process, CollaboratorError, MetadataReader, TagSet, TagWriter};

pub struct ExifTool {
    program: PathBuf,
}

impl ExifTool {
    pub fn new(program: PathBuf) -> Self {
        Self { program }
    }
}

impl MetadataReader for ExifTool {
    fn read_metadata(&self, input: &Path) -> Result<String, CollaboratorError> {
        process::run(&self.program, &read_args(input))
    }
}

impl TagWriter for ExifTool {
    fn write_tags(&self, artifact: &Path, tags: &TagSet) -> Result<(), CollaboratorError> {
        process::run(&self.program, &write_args(artifact, tags)).map(|_| ())
    }
}

fn read_args(input: &Path) -> Vec<String> {
    vec![
        "-j".into(),
        "-ee".into(),
        "-G3".into(),
        "-s".into(),
        "-api".into(),
        "largefilesupport=1".into(),
        input.display().to_string(),
    ]
}

fn write_args(artifact: &Path, tags: &TagSet) -> Vec<String> {
    let time = tags.capture_time;
    let mut args = vec![
        format!("-DateTimeOriginal={}", time.format("%Y:%m:%d %H:%M:%S")),
        format!("-GPSDateStamp={}", time.format("%Y:%m:%d")),
        format!("-GPSTimeStamp={}", time.format("%H:%M:%S")),
        // exiftool derives N/S, E/W and above/below sea level from the sign
        format!("-GPSLatitude={}", tags.latitude),
        format!("-GPSLatitudeRef={}", tags.latitude),
        format!("-GPSLongitude={}", tags.longitude),
        format!("-GPSLongitudeRef={}", tags.longitude),
        format!("-GPSAltitude={}", tags.altitude_m),
        format!("-GPSAltitudeRef={}", tags.altitude_m),
    ];

    if let Some(pano) = &tags.panorama {
        args.push(format!("-XMP-GPano:ProjectionType={}", pano.projection));
        args.push("-XMP-GPano:UsePanoramaViewer=True".into());
        if let (Some(width), Some(height)) = (pano.width, pano.height) {
            args.push(format!("-XMP-GPano:CroppedAreaImageWidthPixels={}", width));
            args.push(format!("-XMP-GPano:CroppedAreaImageHeightPixels={}", height));
            args.push(format!("-XMP-GPano:FullPanoWidthPixels={}", width));
            args.push(format!("-XMP-GPano:FullPanoHeightPixels={}", height));
            args.push("-XMP-GPano:CroppedAreaLeftPixels=0".into());
            args.push("-XMP-GPano:CroppedAreaTopPixels=0".into());
        }
        if let Some(make) = &pano.make {
            args.push(format!("-Make={}", make));
        }
        if let Some(model) = &pano.model {
            args.push(format!("-Model={}", model));
        }
    }

    args.push("-overwrite_original".into());
    args.push(artifact.display().to_string());
    args
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::PanoramaTags;
    use chrono::{TimeZone, Utc};

    fn tags(panorama: Option<PanoramaTags>) -> TagSet {
        TagSet {
            capture_time: Utc.with_ymd_and_hms(2020, 6, 4, 10, 27, 12).unwrap(),
            latitude: -51.5,
            longitude: 0.25,
            altitude_m: 87.5,
            panorama,
        }
    }

    #[test]
    fn test_read_args_end_with_input() {
        let args = read_args(Path::new("/videos/in.mp4"));
        assert_eq!(args.first().map(String::as_str), Some("-j"));
        assert!(args.contains(&"-ee".to_string()));
        assert_eq!(args.last().map(String::as_str), Some("/videos/in.mp4"));
    }

    #[test]
    fn test_write_args_clip() {
        let args = write_args(Path::new("out/clip.mp4"), &tags(None));
        assert_eq!(args[0], "-DateTimeOriginal=2020:06:04 10:27:12");
        assert!(args.contains(&"-GPSDateStamp=2020:06:04".to_string()));
        assert!(args.contains(&"-GPSTimeStamp=10:27:12".to_string()));
        assert!(args.contains(&"-GPSLatitude=-51.5".to_string()));
        assert!(args.contains(&"-GPSLongitudeRef=0.25".to_string()));
        assert!(args.contains(&"-GPSAltitude=87.5".to_string()));
        assert!(!args.iter().any(|a| a.starts_with("-XMP-GPano")));
        assert_eq!(args[args.len() - 2], "-overwrite_original");
        assert_eq!(args[args.len() - 1], "out/clip.mp4");
    }

    #[test]
    fn test_write_args_frame_panorama() {
        let pano = PanoramaTags {
            projection: "equirectangular".into(),
            make: Some("GoPro".into()),
            model: None,
            width: Some(5760),
            height: Some(2880),
        };
        let args = write_args(Path::new("out/frame.jpg"), &tags(Some(pano)));
        assert!(args.contains(&"-XMP-GPano:ProjectionType=equirectangular".to_string()));
        assert!(args.contains(&"-XMP-GPano:FullPanoWidthPixels=5760".to_string()));
        assert!(args.contains(&"-XMP-GPano:CroppedAreaImageHeightPixels=2880".to_string()));
        assert!(args.contains(&"-Make=GoPro".to_string()));
        assert!(!args.iter().any(|a| a.starts_with("-Model=")));
    }
}
