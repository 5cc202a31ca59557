use chrono::{DateTime, Duration, NaiveDateTime, Utc};

use crate::telemetry::ParseError;

const DMS_SEPARATORS: [char; 5] = ['d', 'e', 'g', '\'', '"'];
const TIMESTAMP_FORMAT: &str = "%Y:%m:%d %H:%M:%S";

/// Parse an angle such as `51 deg 30' 12.34" N` into decimal degrees.
///
/// The string is split on runs of `d`, `e`, `g`, `'` and `"`, which must leave
/// exactly degrees, minutes, seconds and the hemisphere letter. `E` and `N`
/// negate the result.
pub fn parse_angle(dms: &str) -> Result<f64, ParseError> {
    let err = || ParseError::InvalidAngle(dms.to_string());

    let parts: Vec<&str> = dms
        .split(|c: char| DMS_SEPARATORS.contains(&c))
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();

    let [degrees, minutes, seconds, direction] = parts.as_slice() else {
        return Err(err());
    };

    let degrees: f64 = degrees.parse().map_err(|_| err())?;
    let minutes: f64 = minutes.parse().map_err(|_| err())?;
    let seconds: f64 = seconds.parse().map_err(|_| err())?;

    let mut value = degrees + minutes / 60.0 + seconds / 3600.0;
    if *direction == "E" || *direction == "N" {
        value *= -1.0;
    }
    Ok(value)
}

/// Parse `12.5 s` (fractional seconds) or `HH:MM:SS` (whole seconds).
pub fn parse_duration_seconds(text: &str) -> Result<f64, ParseError> {
    for (idx, _) in text.match_indices(" s") {
        if let Some(seconds) = trailing_number(&text[..idx]) {
            return Ok(seconds);
        }
    }

    let err = || ParseError::InvalidDuration(text.to_string());
    let fields: Vec<&str> = text.trim().split(':').collect();
    let [hours, minutes, seconds] = fields.as_slice() else {
        return Err(err());
    };
    let hours: u64 = hours.parse().map_err(|_| err())?;
    let minutes: u64 = minutes.parse().map_err(|_| err())?;
    let seconds: u64 = seconds.parse().map_err(|_| err())?;

    hours
        .checked_mul(3600)
        .and_then(|h| minutes.checked_mul(60).and_then(|m| h.checked_add(m)))
        .and_then(|hm| hm.checked_add(seconds))
        .map(|total| total as f64)
        .ok_or_else(err)
}

/// First unsigned decimal number in the string, or `0.0` when there is none.
pub fn parse_altitude_meters(text: &str) -> f64 {
    let Some(start) = text.find(|c: char| c.is_ascii_digit()) else {
        return 0.0;
    };
    let rest = &text[start..];
    let int_len = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let mut end = int_len;
    if rest[int_len..].starts_with('.') {
        let frac_len = rest[int_len + 1..]
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len() - int_len - 1);
        end = int_len + 1 + frac_len;
    }
    rest[..end].parse().unwrap_or(0.0)
}

/// Parse `YYYY:MM:DD HH:MM:SS.ffffff`, with or without a trailing `Z`.
///
/// The fractional part is mandatory and may carry 1 to 9 digits.
pub fn parse_timestamp(text: &str) -> Result<DateTime<Utc>, ParseError> {
    let err = || ParseError::InvalidTimestamp(text.to_string());

    let trimmed = text.trim();
    let bare = trimmed.strip_suffix('Z').unwrap_or(trimmed);
    let (whole, fraction) = bare.split_once('.').ok_or_else(err)?;

    if fraction.is_empty() || fraction.len() > 9 || !fraction.bytes().all(|b| b.is_ascii_digit()) {
        return Err(err());
    }
    let nanos: i64 = format!("{:0<9}", fraction).parse().map_err(|_| err())?;

    let naive = NaiveDateTime::parse_from_str(whole, TIMESTAMP_FORMAT).map_err(|_| err())?;
    Ok((naive + Duration::nanoseconds(nanos)).and_utc())
}

/// Parse the asset-level `CreateDate` (`YYYY:MM:DD HH:MM:SS`, no fraction).
pub fn parse_capture_date(text: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(text.trim(), TIMESTAMP_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

// `12.5` out of `Duration: 12.5`
fn trailing_number(prefix: &str) -> Option<f64> {
    let start = prefix
        .rfind(|c: char| !(c.is_ascii_digit() || c == '.'))
        .map(|i| i + 1)
        .unwrap_or(0);
    let number = &prefix[start..];
    if !number.starts_with(|c: char| c.is_ascii_digit()) {
        return None;
    }
    number.parse().ok()
}
