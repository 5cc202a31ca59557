use crate::planner::PlanError;
use crate::telemetry::{GpsSample, TelemetrySeries};

/// Splits the media timeline into fixed-size windows.
#[derive(Debug, Clone, Copy)]
pub struct WindowPlanner {
    total_duration_seconds: f64,
    window_seconds: f64,
}

impl WindowPlanner {
    pub fn new(total_duration_seconds: f64, window_seconds: f64) -> Result<Self, PlanError> {
        if !window_seconds.is_finite() || window_seconds <= 0.0 {
            return Err(PlanError::InvalidWindow(window_seconds));
        }
        if !total_duration_seconds.is_finite() || total_duration_seconds < 0.0 {
            return Err(PlanError::InvalidDuration(total_duration_seconds));
        }
        Ok(Self {
            total_duration_seconds,
            window_seconds,
        })
    }

    pub fn window_seconds(&self) -> f64 {
        self.window_seconds
    }

    /// Window start offsets `0, w, 2w, ...`.
    ///
    /// The first offset past the end of the media is still emitted, then the
    /// sequence stops, so the tail of the video is always covered.
    pub fn offsets(&self) -> Offsets {
        Offsets {
            planner: *self,
            index: 0,
            done: false,
        }
    }
}

pub struct Offsets {
    planner: WindowPlanner,
    index: u64,
    done: bool,
}

impl Iterator for Offsets {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        if self.done {
            return None;
        }
        let offset = self.index as f64 * self.planner.window_seconds;
        if offset > self.planner.total_duration_seconds {
            self.done = true;
        }
        self.index += 1;
        Some(offset)
    }
}

/// Nearest samples at-or-before and strictly after an offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BracketPair<'a> {
    pub before: Option<&'a GpsSample>,
    pub after: Option<&'a GpsSample>,
}

impl<'a> BracketPair<'a> {
    fn split(samples: &'a [GpsSample], next: usize) -> Self {
        Self {
            before: next.checked_sub(1).and_then(|i| samples.get(i)),
            after: samples.get(next),
        }
    }
}

/// Bracket lookup for monotonically advancing offsets.
///
/// Keeps the index of the first sample after the last queried offset and only
/// walks forward from there. A query that moves backwards falls back to a
/// binary search.
pub struct BracketCursor<'a> {
    samples: &'a [GpsSample],
    next: usize,
}

impl<'a> BracketCursor<'a> {
    pub fn new(series: &'a TelemetrySeries) -> Self {
        Self {
            samples: series.samples(),
            next: 0,
        }
    }

    pub fn advance_to(&mut self, offset: f64) -> BracketPair<'a> {
        let moved_back = self
            .next
            .checked_sub(1)
            .is_some_and(|i| self.samples[i].offset_seconds > offset);

        if moved_back {
            self.next = first_after(self.samples, offset);
        } else {
            while self
                .samples
                .get(self.next)
                .is_some_and(|s| s.offset_seconds <= offset)
            {
                self.next += 1;
            }
        }

        BracketPair::split(self.samples, self.next)
    }
}

/// Index of the first sample strictly after `offset`.
fn first_after(samples: &[GpsSample], offset: f64) -> usize {
    samples.partition_point(|s| s.offset_seconds <= offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn bracket_at(series: &TelemetrySeries, offset: f64) -> BracketPair<'_> {
        let samples = series.samples();
        BracketPair::split(samples, first_after(samples, offset))
    }

    fn series(offsets: &[f64]) -> TelemetrySeries {
        let base = Utc.with_ymd_and_hms(2020, 6, 4, 10, 0, 0).unwrap();
        TelemetrySeries::from_samples(
            offsets
                .iter()
                .map(|&o| GpsSample {
                    timestamp: base + chrono::Duration::milliseconds((o * 1000.0) as i64),
                    offset_seconds: o,
                    latitude: o,
                    longitude: o,
                    altitude_m: 0.0,
                })
                .collect(),
        )
    }

    fn offsets_of(pair: &BracketPair) -> (Option<f64>, Option<f64>) {
        (
            pair.before.map(|s| s.offset_seconds),
            pair.after.map(|s| s.offset_seconds),
        )
    }

    #[test]
    fn test_offsets_run_one_past_the_end() {
        let planner = WindowPlanner::new(10.0, 3.0).unwrap();
        let offsets: Vec<f64> = planner.offsets().collect();
        assert_eq!(offsets, vec![0.0, 3.0, 6.0, 9.0, 12.0]);
    }

    #[test]
    fn test_offsets_exact_multiple() {
        let planner = WindowPlanner::new(10.0, 5.0).unwrap();
        let offsets: Vec<f64> = planner.offsets().collect();
        assert_eq!(offsets, vec![0.0, 5.0, 10.0, 15.0]);
    }

    #[test]
    fn test_offsets_zero_duration() {
        let planner = WindowPlanner::new(0.0, 1.0).unwrap();
        let offsets: Vec<f64> = planner.offsets().collect();
        assert_eq!(offsets, vec![0.0, 1.0]);
    }

    #[test]
    fn test_planner_rejects_bad_window() {
        assert!(matches!(
            WindowPlanner::new(10.0, 0.0),
            Err(PlanError::InvalidWindow(_))
        ));
        assert!(WindowPlanner::new(10.0, -1.0).is_err());
        assert!(WindowPlanner::new(10.0, f64::NAN).is_err());
        assert!(matches!(
            WindowPlanner::new(-1.0, 1.0),
            Err(PlanError::InvalidDuration(_))
        ));
    }

    #[test]
    fn test_bracket_at_boundaries() {
        let s = series(&[1.0, 2.0, 4.0]);
        assert_eq!(offsets_of(&bracket_at(&s, 0.5)), (None, Some(1.0)));
        assert_eq!(offsets_of(&bracket_at(&s, 1.0)), (Some(1.0), Some(2.0)));
        assert_eq!(offsets_of(&bracket_at(&s, 3.0)), (Some(2.0), Some(4.0)));
        assert_eq!(offsets_of(&bracket_at(&s, 4.0)), (Some(4.0), None));
        assert_eq!(offsets_of(&bracket_at(&s, 9.0)), (Some(4.0), None));
    }

    #[test]
    fn test_bracket_at_empty_series() {
        let s = series(&[]);
        assert_eq!(offsets_of(&bracket_at(&s, 0.0)), (None, None));
    }

    #[test]
    fn test_cursor_matches_full_scan() {
        let s = series(&[0.0, 0.5, 1.0, 2.5, 3.0, 7.0, 7.5]);
        let planner = WindowPlanner::new(8.0, 0.75).unwrap();
        let mut cursor = BracketCursor::new(&s);
        for offset in planner.offsets() {
            assert_eq!(
                offsets_of(&cursor.advance_to(offset)),
                offsets_of(&bracket_at(&s, offset)),
                "offset {offset}"
            );
        }
    }

    #[test]
    fn test_cursor_moving_backwards() {
        let s = series(&[0.0, 1.0, 2.0, 3.0]);
        let mut cursor = BracketCursor::new(&s);
        cursor.advance_to(2.5);
        assert_eq!(offsets_of(&cursor.advance_to(0.5)), (Some(0.0), Some(1.0)));
    }
}
