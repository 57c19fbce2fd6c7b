//! Histogram binner: fixed-bucket-count binning of a value series.

use crate::types::DataError;
use crate::utils::format_number;

/// Number of buckets in a population histogram.
pub const BUCKET_COUNT: usize = 10;

/// Binned view of a value series.
#[derive(Clone, Debug, PartialEq)]
pub struct Histogram {
    /// Bucket bounds as (low, high) pairs
    pub bounds: Vec<(f64, f64)>,
    /// Value count per bucket, parallel to `bounds`
    pub counts: Vec<usize>,
}

impl Histogram {
    /// Human-readable bucket labels, e.g. `"1,000 - 2,000"`.
    pub fn labels(&self) -> Vec<String> {
        self.bounds
            .iter()
            .map(|&(low, high)| format!("{} - {}", format_number(low), format_number(high)))
            .collect()
    }

    /// Total values across all buckets. Always equals the input length.
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

/// Bin values into [`BUCKET_COUNT`] equal-width buckets.
///
/// Bucket `i` covers `[min + i*size, min + (i+1)*size)`, except that the
/// last bucket's upper bound is inclusive so a value equal to the maximum
/// is counted instead of falling off the end. When every value is equal
/// (`min == max`) the width would be zero, so a single bucket holds all
/// values. Empty input yields [`DataError::EmptySeries`].
pub fn bin_values(values: &[f64]) -> Result<Histogram, DataError> {
    if values.is_empty() {
        return Err(DataError::EmptySeries);
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    if min == max {
        return Ok(Histogram {
            bounds: vec![(min, max)],
            counts: vec![values.len()],
        });
    }

    let bin_size = (max - min) / BUCKET_COUNT as f64;
    let mut counts = vec![0; BUCKET_COUNT];
    for &value in values {
        let mut idx = ((value - min) / bin_size) as usize;
        if idx >= BUCKET_COUNT {
            idx = BUCKET_COUNT - 1;
        }
        counts[idx] += 1;
    }

    let bounds = (0..BUCKET_COUNT)
        .map(|i| {
            (
                min + i as f64 * bin_size,
                min + (i + 1) as f64 * bin_size,
            )
        })
        .collect();

    Ok(Histogram { bounds, counts })
}
