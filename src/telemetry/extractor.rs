use std::path::Path;

use serde_json::{Map, Value};

use crate::executor::MetadataReader;
use crate::telemetry::parsing::{
    parse_altitude_meters, parse_angle, parse_capture_date, parse_duration_seconds,
    parse_timestamp,
};
use crate::telemetry::{
    GpsSample, InputError, MediaDescriptor, ParseError, TelemetrySeries, EQUIRECTANGULAR,
};

const MAIN: &str = "Main";
const GPS_LATITUDE: &str = "GPSLatitude";
const GPS_LONGITUDE: &str = "GPSLongitude";
const GPS_ALTITUDE: &str = "GPSAltitude";
const SAMPLE_TIME: &str = "SampleTime";
const GPS_DATE_TIME: &str = "GPSDateTime";

type Record = Map<String, Value>;

/// Read the source once through the metadata collaborator and normalise it.
///
/// This is the only fatal gate of a run: any error here means neither the
/// descriptor nor the series exist.
pub fn extract<R: MetadataReader + ?Sized>(
    reader: &R,
    input: &Path,
) -> Result<(MediaDescriptor, TelemetrySeries), InputError> {
    if !input.is_file() {
        return Err(InputError::NotFound(input.display().to_string()));
    }

    log::info!("Fetching metadata from {}", input.display());
    let text = reader.read_metadata(input)?;
    parse_record(&text)
}

/// Parse the JSON array emitted by the metadata collaborator.
pub fn parse_record(text: &str) -> Result<(MediaDescriptor, TelemetrySeries), InputError> {
    let records: Vec<Record> = serde_json::from_str(text)?;
    let record = records.into_iter().next().ok_or(InputError::NoRecord)?;

    let descriptor = parse_descriptor(&record)?;

    let streams = gps_streams(&record);
    let mut samples = Vec::with_capacity(streams.len());
    let mut skipped = 0usize;
    for stream in &streams {
        match parse_stream(&record, stream) {
            Ok(sample) => samples.push(sample),
            Err(e) => {
                log::debug!("Skipping telemetry stream {}: {}", stream, e);
                skipped += 1;
            }
        }
    }
    if skipped > 0 {
        log::warn!(
            "Skipped {} of {} telemetry streams with unreadable fields",
            skipped,
            streams.len()
        );
    }

    let series = TelemetrySeries::from_samples(samples);
    log::info!(
        "Found {} GPS samples over {:.1}s of video",
        series.len(),
        descriptor.duration_seconds
    );

    Ok((descriptor, series))
}

fn parse_descriptor(record: &Record) -> Result<MediaDescriptor, InputError> {
    let projection = text_field(record, MAIN, "ProjectionType");
    if projection.as_deref() != Some(EQUIRECTANGULAR) {
        return Err(InputError::Projection(projection));
    }

    let duration_seconds = ["MediaDuration", "Duration"]
        .iter()
        .find_map(|field| record.get(&key(MAIN, field)))
        .ok_or_else(|| {
            InputError::Duration(ParseError::MissingField {
                stream: MAIN.to_string(),
                field: "MediaDuration",
            })
        })
        .and_then(|value| match value {
            Value::Number(n) => n.as_f64().ok_or_else(|| {
                InputError::Duration(ParseError::InvalidDuration(n.to_string()))
            }),
            other => parse_duration_seconds(&render(other)).map_err(InputError::Duration),
        })?;

    Ok(MediaDescriptor {
        projection: EQUIRECTANGULAR.to_string(),
        duration_seconds,
        create_date: text_field(record, MAIN, "CreateDate")
            .as_deref()
            .and_then(parse_capture_date),
        image_width: pixels_field(record, "ImageWidth"),
        image_height: pixels_field(record, "ImageHeight"),
        make: text_field(record, MAIN, "Make"),
        model: text_field(record, MAIN, "Model"),
        file_extension: text_field(record, MAIN, "FileTypeExtension"),
    })
}

fn parse_stream(record: &Record, stream: &str) -> Result<GpsSample, ParseError> {
    let required = |field: &'static str| {
        text_field(record, stream, field).ok_or_else(|| ParseError::MissingField {
            stream: stream.to_string(),
            field,
        })
    };

    Ok(GpsSample {
        latitude: parse_angle(&required(GPS_LATITUDE)?)?,
        longitude: parse_angle(&required(GPS_LONGITUDE)?)?,
        altitude_m: parse_altitude_meters(&required(GPS_ALTITUDE)?),
        offset_seconds: parse_duration_seconds(&required(SAMPLE_TIME)?)?,
        timestamp: parse_timestamp(&required(GPS_DATE_TIME)?)?,
    })
}

/// Stream identifiers carrying a latitude, in natural order (`Doc2` < `Doc10`).
fn gps_streams(record: &Record) -> Vec<String> {
    let mut streams: Vec<String> = record
        .keys()
        .filter_map(|k| k.split_once(':'))
        .filter(|(stream, field)| *field == GPS_LATITUDE && *stream != MAIN)
        .map(|(stream, _)| stream.to_string())
        .collect();

    streams.sort_by_key(|s| natural_key(s));
    streams.dedup();
    streams
}

fn natural_key(stream: &str) -> (String, u64) {
    let digits = stream.len()
        - stream
            .chars()
            .rev()
            .take_while(|c| c.is_ascii_digit())
            .count();
    let (prefix, number) = stream.split_at(digits);
    (prefix.to_string(), number.parse().unwrap_or(0))
}

fn key(stream: &str, field: &str) -> String {
    format!("{}:{}", stream, field)
}

fn text_field(record: &Record, stream: &str, field: &str) -> Option<String> {
    record
        .get(&key(stream, field))
        .map(render)
        .filter(|s| !s.is_empty())
}

fn pixels_field(record: &Record, field: &str) -> Option<u32> {
    match record.get(&key(MAIN, field))? {
        Value::Number(n) => n.as_u64().and_then(|v| u32::try_from(v).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn stream_fields(record: &mut Record, stream: &str, lat: &str, offset: &str, time: &str) {
        record.insert(key(stream, GPS_LATITUDE), json!(lat));
        record.insert(key(stream, GPS_LONGITUDE), json!("0 deg 7' 39.60\" W"));
        record.insert(key(stream, GPS_ALTITUDE), json!("87.2 m"));
        record.insert(key(stream, SAMPLE_TIME), json!(offset));
        record.insert(key(stream, GPS_DATE_TIME), json!(time));
    }

    fn base_record() -> Record {
        let mut record = Record::new();
        record.insert("Main:ProjectionType".into(), json!("equirectangular"));
        record.insert("Main:MediaDuration".into(), json!("12.50 s"));
        record.insert("Main:CreateDate".into(), json!("2020:06:04 10:00:00"));
        record.insert("Main:ImageWidth".into(), json!(5760));
        record.insert("Main:ImageHeight".into(), json!(2880));
        record.insert("Main:Make".into(), json!("GoPro"));
        record.insert("Main:Model".into(), json!("GoPro Max"));
        record.insert("Main:FileTypeExtension".into(), json!("MP4"));
        record
    }

    fn to_text(record: Record) -> String {
        Value::Array(vec![Value::Object(record)]).to_string()
    }

    #[test]
    fn test_parse_record_descriptor() {
        let mut record = base_record();
        stream_fields(&mut record, "Doc1", "1deg30'0\"S", "0 s", "2020:06:04 10:00:00.000000Z");
        let (descriptor, series) = parse_record(&to_text(record)).unwrap();

        assert_eq!(descriptor.duration_seconds, 12.5);
        assert_eq!(
            descriptor.create_date,
            Some(Utc.with_ymd_and_hms(2020, 6, 4, 10, 0, 0).unwrap())
        );
        assert_eq!(descriptor.image_width, Some(5760));
        assert_eq!(descriptor.image_height, Some(2880));
        assert_eq!(descriptor.model.as_deref(), Some("GoPro Max"));
        assert_eq!(descriptor.clip_extension(), "mp4");
        assert_eq!(series.len(), 1);

        let sample = &series.samples()[0];
        assert!((sample.latitude - 1.5).abs() < 1e-9);
        assert!((sample.altitude_m - 87.2).abs() < 1e-9);
    }

    #[test]
    fn test_malformed_streams_are_skipped() {
        let mut record = base_record();
        stream_fields(&mut record, "Doc1", "1deg0'0\"S", "0 s", "2020:06:04 10:00:00.000000Z");
        stream_fields(&mut record, "Doc2", "1deg0'0\"S", "1 s", "2020:06:04 10:00:01.000000Z");
        stream_fields(&mut record, "Doc3", "1deg0'0\"S", "2 s", "2020:06:04 10:00:02.000000Z");
        // bad angle
        stream_fields(&mut record, "Doc4", "north", "3 s", "2020:06:04 10:00:03.000000Z");
        // missing field
        stream_fields(&mut record, "Doc5", "1deg0'0\"S", "4 s", "2020:06:04 10:00:04.000000Z");
        record.remove("Doc5:GPSDateTime");

        let (_, series) = parse_record(&to_text(record)).unwrap();
        assert_eq!(series.len(), 3);
    }

    #[test]
    fn test_overflowing_sample_time_drops_stream() {
        let mut record = base_record();
        stream_fields(&mut record, "Doc1", "1deg0'0\"S", "0 s", "2020:06:04 10:00:00.000000Z");
        stream_fields(
            &mut record,
            "Doc2",
            "1deg0'0\"S",
            "5124095576030432:00:00",
            "2020:06:04 10:00:01.000000Z",
        );

        let (_, series) = parse_record(&to_text(record)).unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(series.samples()[0].offset_seconds, 0.0);
    }

    #[test]
    fn test_duplicate_offsets_keep_last_stream() {
        let mut record = base_record();
        stream_fields(&mut record, "Doc2", "2deg0'0\"S", "1 s", "2020:06:04 10:00:01.000000Z");
        stream_fields(&mut record, "Doc10", "10deg0'0\"S", "1 s", "2020:06:04 10:00:01.000000Z");
        stream_fields(&mut record, "Doc1", "1deg0'0\"S", "0 s", "2020:06:04 10:00:00.000000Z");

        let (_, series) = parse_record(&to_text(record)).unwrap();
        assert_eq!(series.len(), 2);
        assert!((series.samples()[1].latitude - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_series_is_sorted_by_offset() {
        let mut record = base_record();
        stream_fields(&mut record, "Doc1", "1deg0'0\"S", "2 s", "2020:06:04 10:00:02.000000Z");
        stream_fields(&mut record, "Doc2", "1deg0'0\"S", "0 s", "2020:06:04 10:00:00.000000Z");
        stream_fields(&mut record, "Doc3", "1deg0'0\"S", "1 s", "2020:06:04 10:00:01.000000Z");

        let (_, series) = parse_record(&to_text(record)).unwrap();
        let offsets: Vec<f64> = series.samples().iter().map(|s| s.offset_seconds).collect();
        assert_eq!(offsets, vec![0.0, 1.0, 2.0]);
    }

    #[test]
    fn test_wrong_projection_is_rejected() {
        let mut record = base_record();
        record.insert("Main:ProjectionType".into(), json!("cubemap"));
        let err = parse_record(&to_text(record)).unwrap_err();
        assert!(matches!(err, InputError::Projection(Some(p)) if p == "cubemap"));

        let mut record = base_record();
        record.remove("Main:ProjectionType");
        let err = parse_record(&to_text(record)).unwrap_err();
        assert!(matches!(err, InputError::Projection(None)));
    }

    #[test]
    fn test_unusable_output_is_rejected() {
        assert!(matches!(parse_record("[]"), Err(InputError::NoRecord)));
        assert!(matches!(parse_record("not json"), Err(InputError::Json(_))));
    }

    #[test]
    fn test_numeric_duration_and_fallback_key() {
        let mut record = base_record();
        record.remove("Main:MediaDuration");
        record.insert("Main:Duration".into(), json!(42.0));
        let (descriptor, series) = parse_record(&to_text(record)).unwrap();
        assert_eq!(descriptor.duration_seconds, 42.0);
        assert!(series.is_empty());
    }

    #[test]
    fn test_natural_stream_order() {
        let mut record = Record::new();
        for stream in ["Doc10", "Doc2", "Doc1"] {
            record.insert(key(stream, GPS_LATITUDE), json!("x"));
        }
        record.insert("Main:GPSLatitude".into(), json!("x"));
        assert_eq!(gps_streams(&record), vec!["Doc1", "Doc2", "Doc10"]);
    }
}
