use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::planner::{BracketPair, InterpolationError};
use crate::telemetry::GpsSample;

/// A resolved position for one window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InterpolatedFix {
    pub timestamp: DateTime<Utc>,
    pub latitude: f64,
    pub longitude: f64,
    pub altitude_m: f64,
}

impl From<&GpsSample> for InterpolatedFix {
    fn from(sample: &GpsSample) -> Self {
        Self {
            timestamp: sample.timestamp,
            latitude: sample.latitude,
            longitude: sample.longitude,
            altitude_m: sample.altitude_m,
        }
    }
}

/// Resolve the position at `target` from its bracketing samples.
///
/// Linear in time, independently per axis. A target equal to a sample's
/// timestamp, or a bracket with a single side, yields that sample unchanged.
pub fn interpolate(
    target: DateTime<Utc>,
    pair: &BracketPair,
) -> Result<InterpolatedFix, InterpolationError> {
    let (before, after) = match (pair.before, pair.after) {
        (Some(before), Some(after)) => (before, after),
        (Some(only), None) | (None, Some(only)) => return Ok(only.into()),
        (None, None) => return Err(InterpolationError::NoBracket(target)),
    };

    if target == before.timestamp {
        return Ok(before.into());
    }
    if target == after.timestamp {
        return Ok(after.into());
    }

    let before_to_target = seconds_between(before.timestamp, target);
    let target_to_after = seconds_between(target, after.timestamp);
    let span = before_to_target + target_to_after;
    if span == 0.0 {
        return Ok(before.into());
    }
    let ratio = before_to_target / span;
    let lerp = |a: f64, b: f64| a + (b - a) * ratio;

    Ok(InterpolatedFix {
        timestamp: target,
        latitude: lerp(before.latitude, after.latitude),
        longitude: lerp(before.longitude, after.longitude),
        altitude_m: lerp(before.altitude_m, after.altitude_m),
    })
}

fn seconds_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    let delta = to - from;
    match delta.num_nanoseconds() {
        Some(nanos) => nanos as f64 / 1e9,
        None => delta.num_milliseconds() as f64 / 1e3,
    }
}
