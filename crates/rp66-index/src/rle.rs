//! Run-length encoding of arithmetic sequences.
//!
//! A run is (datum, stride, repeat): `repeat + 1` values starting at
//! `datum` and spaced by `stride`. Uniformly spaced data of any length
//! compresses to a single run.

/// Values a run-length sequence can hold.
pub trait RleValue: Copy + PartialEq {
    /// The stride type between consecutive values.
    type Stride: Copy + PartialEq + Default + std::fmt::Debug;

    /// Stride from `prev` to `next`.
    fn stride_between(prev: Self, next: Self) -> Self::Stride;

    /// The value `steps` strides after `self`.
    fn advance(self, stride: Self::Stride, steps: u64) -> Self;

    /// Whether `self` matches the `expected` extrapolated value.
    fn matches(self, expected: Self) -> bool;
}

impl RleValue for f64 {
    type Stride = f64;

    fn stride_between(prev: Self, next: Self) -> f64 {
        next - prev
    }

    fn advance(self, stride: f64, steps: u64) -> Self {
        stride.mul_add(steps as f64, self)
    }

    fn matches(self, expected: Self) -> bool {
        // Relative tolerance comparison; a run absorbs values that agree
        // with the extrapolation to machine precision.
        self == expected
            || (self - expected).abs() <= f64::EPSILON * self.abs().max(expected.abs())
    }
}

impl RleValue for u64 {
    type Stride = i64;

    fn stride_between(prev: Self, next: Self) -> i64 {
        next.wrapping_sub(prev) as i64
    }

    fn advance(self, stride: i64, steps: u64) -> Self {
        (self as i64).wrapping_add(stride.wrapping_mul(steps as i64)) as u64
    }

    fn matches(self, expected: Self) -> bool {
        self == expected
    }
}

/// One run of an arithmetic sequence.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RleRun<T, S> {
    /// First value of the run.
    pub datum: T,
    /// Spacing between consecutive values.
    pub stride: S,
    /// Number of values after the datum.
    pub repeat: u64,
}

impl<T: RleValue> RleRun<T, T::Stride> {
    /// Number of values in the run.
    pub fn count(&self) -> u64 {
        self.repeat + 1
    }

    /// Last value of the run.
    pub fn last(&self) -> T {
        self.datum.advance(self.stride, self.repeat)
    }

    /// The `i`th value of the run.
    pub fn value(&self, i: u64) -> T {
        self.datum.advance(self.stride, i)
    }
}

/// Run-length encoded sequence.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(bound(
    serialize = "T: serde::Serialize, T::Stride: serde::Serialize",
    deserialize = "T: serde::Deserialize<'de>, T::Stride: serde::Deserialize<'de>"
))]
pub struct Rle<T: RleValue> {
    runs: Vec<RleRun<T, T::Stride>>,
}

impl<T: RleValue> Default for Rle<T> {
    fn default() -> Self {
        Self { runs: Vec::new() }
    }
}

impl<T: RleValue> Rle<T> {
    /// An empty sequence.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one value.
    ///
    /// A run with a single value has no stride yet and absorbs the next
    /// value unconditionally; after that, only values matching the
    /// extrapolation extend the run.
    pub fn push(&mut self, value: T) {
        if let Some(run) = self.runs.last_mut() {
            if run.repeat == 0 {
                run.stride = T::stride_between(run.datum, value);
                run.repeat = 1;
                return;
            }
            if value.matches(run.datum.advance(run.stride, run.repeat + 1)) {
                run.repeat += 1;
                return;
            }
        }
        self.runs.push(RleRun {
            datum: value,
            stride: T::Stride::default(),
            repeat: 0,
        });
    }

    /// The runs in order.
    #[must_use]
    pub fn runs(&self) -> &[RleRun<T, T::Stride>] {
        &self.runs
    }

    /// Total number of values.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.runs.iter().map(RleRun::count).sum()
    }

    /// True when no value has been appended.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// The `i`th value appended.
    #[must_use]
    pub fn value(&self, mut i: u64) -> Option<T> {
        for run in &self.runs {
            if i < run.count() {
                return Some(run.value(i));
            }
            i -= run.count();
        }
        None
    }

    /// First value.
    #[must_use]
    pub fn first(&self) -> Option<T> {
        self.runs.first().map(|run| run.datum)
    }

    /// Last value.
    #[must_use]
    pub fn last(&self) -> Option<T> {
        self.runs.last().map(RleRun::last)
    }

    /// Iterate every value.
    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        self.runs
            .iter()
            .flat_map(|run| (0..run.count()).map(move |i| run.value(i)))
    }
}

impl Rle<f64> {
    /// For a non-decreasing sequence: the greatest index whose value is
    /// `<= x`, with that value.
    ///
    /// Binary search over run datums, then direct arithmetic within the
    /// located run; cost is logarithmic in the number of runs, never
    /// linear in the number of values.
    #[must_use]
    pub fn largest_le(&self, x: f64) -> Option<(u64, f64)> {
        // Index of the first run whose datum is > x.
        let after = self.runs.partition_point(|run| run.datum <= x);
        if after == 0 {
            return None;
        }
        let run = &self.runs[after - 1];
        let base: u64 = self.runs[..after - 1].iter().map(RleRun::count).sum();
        let offset = if run.stride > 0.0 {
            (((x - run.datum) / run.stride).floor() as u64).min(run.repeat)
        } else {
            // Zero or negative stride inside a run of a non-decreasing
            // sequence means repeated values; take the last.
            run.repeat
        };
        Some((base + offset, run.value(offset)))
    }
}
