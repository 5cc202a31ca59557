use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq)]
pub struct GpsSample {
    pub timestamp: DateTime<Utc>,
    /// Seconds since media start.
    pub offset_seconds: f64,
    pub latitude: f64,
    pub longitude: f64,
    pub altitude_m: f64,
}

/// Samples ordered by `offset_seconds`, one per distinct offset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TelemetrySeries {
    samples: Vec<GpsSample>,
}

impl TelemetrySeries {
    /// Sort by offset and collapse equal offsets, keeping the last one seen.
    pub fn from_samples(mut samples: Vec<GpsSample>) -> Self {
        samples.sort_by(|a, b| a.offset_seconds.total_cmp(&b.offset_seconds));

        let mut deduped: Vec<GpsSample> = Vec::with_capacity(samples.len());
        for sample in samples {
            match deduped.last_mut() {
                Some(last) if last.offset_seconds == sample.offset_seconds => *last = sample,
                _ => deduped.push(sample),
            }
        }

        Self { samples: deduped }
    }

    pub fn samples(&self) -> &[GpsSample] {
        &self.samples
    }

    pub fn first(&self) -> Option<&GpsSample> {
        self.samples.first()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}
