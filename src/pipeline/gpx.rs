use std::fs;
use std::path::Path;

use chrono::SecondsFormat;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use thiserror::Error;

use crate::planner::InterpolatedFix;

#[derive(Debug, Error)]
pub enum TrackLogError {
    #[error("XML error: {0}")]
    Xml(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Write the fixes as a single-track, single-segment GPX 1.1 file.
pub fn write_track_log(path: &Path, fixes: &[InterpolatedFix]) -> Result<(), TrackLogError> {
    log::info!("Writing GPS track log to {}", path.display());
    let document = to_gpx(fixes)?;
    fs::write(path, document)?;
    Ok(())
}

/// Points carry position and time only; altitude is not exported.
pub fn to_gpx(fixes: &[InterpolatedFix]) -> Result<Vec<u8>, TrackLogError> {
    let mut w = Writer::new_with_indent(Vec::new(), b' ', 2);
    w.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(xml_error)?;

    let mut gpx = BytesStart::new("gpx");
    gpx.push_attribute(("version", "1.1"));
    gpx.push_attribute(("creator", "geoframes"));
    gpx.push_attribute(("xmlns", "http://www.topografix.com/GPX/1/1"));
    w.write_event(Event::Start(gpx)).map_err(xml_error)?;
    w.write_event(Event::Start(BytesStart::new("trk"))).map_err(xml_error)?;
    w.write_event(Event::Start(BytesStart::new("trkseg"))).map_err(xml_error)?;

    for fix in fixes {
        let mut trkpt = BytesStart::new("trkpt");
        trkpt.push_attribute(("lat", fix.latitude.to_string().as_str()));
        trkpt.push_attribute(("lon", fix.longitude.to_string().as_str()));
        w.write_event(Event::Start(trkpt)).map_err(xml_error)?;

        let time = fix.timestamp.to_rfc3339_opts(SecondsFormat::Micros, true);
        w.write_event(Event::Start(BytesStart::new("time"))).map_err(xml_error)?;
        w.write_event(Event::Text(BytesText::new(&time))).map_err(xml_error)?;
        w.write_event(Event::End(BytesEnd::new("time"))).map_err(xml_error)?;

        w.write_event(Event::End(BytesEnd::new("trkpt"))).map_err(xml_error)?;
    }

    w.write_event(Event::End(BytesEnd::new("trkseg"))).map_err(xml_error)?;
    w.write_event(Event::End(BytesEnd::new("trk"))).map_err(xml_error)?;
    w.write_event(Event::End(BytesEnd::new("gpx"))).map_err(xml_error)?;

    Ok(w.into_inner())
}

fn xml_error<E: std::fmt::Display>(e: E) -> TrackLogError {
    TrackLogError::Xml(e.to_string())
}
