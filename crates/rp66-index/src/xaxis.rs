//! X-axis traces: per frame array, where every frame lives and what its
//! index value is.

use rp66_types::{LogicalRecordPosition, ObjectName};

use crate::rle::Rle;

/// One frame's location and x-axis value.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FrameRef {
    /// Address of the frame's logical record.
    pub position: LogicalRecordPosition,
    /// Frame ordinal as recorded in the file (counting from one).
    pub frame_number: u64,
    /// Decoded x-axis value.
    pub x: f64,
}

/// Spacing buckets over consecutive x deltas, classified around the
/// median delta m: reversed below -m/2, duplicate within +/- m/2, normal
/// up to 1.5 m, skipped beyond (mirrored when the log runs downward).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SpacingCounts {
    pub normal: u64,
    pub duplicate: u64,
    pub skipped: u64,
    pub reversed: u64,
}

impl SpacingCounts {
    /// Total number of deltas classified.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.normal + self.duplicate + self.skipped + self.reversed
    }
}

/// Summary of the deltas between consecutive x values.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SpacingSummary {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
    /// Histogram of deltas bucketed by kind.
    pub counts: SpacingCounts,
}

/// Summary of a whole trace.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct XAxisSummary {
    pub min: f64,
    pub max: f64,
    pub count: u64,
    /// `None` when the trace has fewer than two frames.
    pub spacing: Option<SpacingSummary>,
}

/// The x-axis trace of one frame array.
///
/// Four parallel run-length sequences keyed by frame ordinal: x values,
/// file frame numbers, and the two halves of the record position. Uniform
/// logs of any length cost a handful of runs.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct XAxisTrace {
    /// Name of the index (x-axis) channel.
    pub channel: ObjectName,
    /// The index channel's long name.
    pub long_name: Vec<u8>,
    /// The index channel's units.
    pub units: Vec<u8>,
    x: Rle<f64>,
    frame_numbers: Rle<u64>,
    visible_records: Rle<u64>,
    segments: Rle<u64>,
}

impl XAxisTrace {
    /// An empty trace for the given index channel.
    #[must_use]
    pub fn new(channel: ObjectName, long_name: Vec<u8>, units: Vec<u8>) -> Self {
        Self {
            channel,
            long_name,
            units,
            x: Rle::new(),
            frame_numbers: Rle::new(),
            visible_records: Rle::new(),
            segments: Rle::new(),
        }
    }

    /// Append one frame.
    pub fn append(&mut self, position: LogicalRecordPosition, frame_number: u64, x: f64) {
        self.x.push(x);
        self.frame_numbers.push(frame_number);
        self.visible_records.push(position.visible_record);
        self.segments.push(position.segment);
    }

    /// Number of frames.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.x.count()
    }

    /// True when no frame has been appended.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// The x-value run-length sequence.
    #[must_use]
    pub const fn x(&self) -> &Rle<f64> {
        &self.x
    }

    /// The `i`th frame.
    #[must_use]
    pub fn get(&self, i: u64) -> Option<FrameRef> {
        Some(FrameRef {
            position: LogicalRecordPosition {
                visible_record: self.visible_records.value(i)?,
                segment: self.segments.value(i)?,
            },
            frame_number: self.frame_numbers.value(i)?,
            x: self.x.value(i)?,
        })
    }

    /// The last frame whose x value does not exceed `x`, for traces whose
    /// x axis does not decrease. Logarithmic in the number of runs.
    #[must_use]
    pub fn nearest_preceding(&self, x: f64) -> Option<FrameRef> {
        let (index, _) = self.x.largest_le(x)?;
        self.get(index)
    }

    /// Min / max / count plus the spacing summary.
    #[must_use]
    pub fn summary(&self) -> Option<XAxisSummary> {
        if self.is_empty() {
            return None;
        }
        let values: Vec<f64> = self.x.iter().collect();
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for &v in &values {
            min = min.min(v);
            max = max.max(v);
        }
        Some(XAxisSummary {
            min,
            max,
            count: self.count(),
            spacing: compute_spacing(&values),
        })
    }
}

/// Median of a non-empty slice.
fn median(sorted: &[f64]) -> f64 {
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        f64::midpoint(sorted[mid - 1], sorted[mid])
    } else {
        sorted[mid]
    }
}

/// Summarize consecutive deltas; `None` for fewer than two values.
fn compute_spacing(values: &[f64]) -> Option<SpacingSummary> {
    if values.len() < 2 {
        return None;
    }
    let diffs: Vec<f64> = values.windows(2).map(|w| w[1] - w[0]).collect();
    let mut sorted = diffs.clone();
    sorted.sort_by(f64::total_cmp);
    let median = median(&sorted);
    let half = median / 2.0;
    let mut counts = SpacingCounts::default();
    for &d in &diffs {
        let bucket = if median < 0.0 {
            if d < 3.0 * half {
                &mut counts.skipped
            } else if d < half {
                &mut counts.normal
            } else if d < -half {
                &mut counts.duplicate
            } else {
                &mut counts.reversed
            }
        } else if d >= 3.0 * half {
            &mut counts.skipped
        } else if d >= half {
            &mut counts.normal
        } else if d >= -half {
            &mut counts.duplicate
        } else {
            &mut counts.reversed
        };
        *bucket += 1;
    }
    let sum: f64 = diffs.iter().sum();
    Some(SpacingSummary {
        min: sorted[0],
        max: sorted[sorted.len() - 1],
        mean: sum / diffs.len() as f64,
        median,
        counts,
    })
}
