//! Statistics engine: aggregates over one country's valid values.

use std::collections::HashMap;

use statrs::statistics::Statistics;

use crate::types::{DataError, DerivedStats, Year};

/// Compute summary statistics for a value series and its parallel year
/// series.
///
/// Extrema are paired with the year at the first index where they occur.
/// Variance is the population variance (denominator = count). The mode is
/// found in a single left-to-right scan: the candidate is replaced only
/// when a value's count strictly exceeds the current best, so the first
/// value to reach the winning frequency wins ties.
///
/// An empty series is a caller error and yields [`DataError::EmptySeries`]
/// instead of a silent division by zero.
pub fn derive_stats(years: &[Year], values: &[f64]) -> Result<DerivedStats, DataError> {
    if values.is_empty() {
        return Err(DataError::EmptySeries);
    }
    if years.len() != values.len() {
        return Err(DataError::Validation(
            "year and value series lengths differ".to_string(),
        ));
    }

    let mut max_idx = 0;
    let mut min_idx = 0;
    for (i, &value) in values.iter().enumerate() {
        if value > values[max_idx] {
            max_idx = i;
        }
        if value < values[min_idx] {
            min_idx = i;
        }
    }

    let sum: f64 = values.iter().sum();
    let mean = values.iter().mean();
    let variance = values.iter().population_variance();

    Ok(DerivedStats {
        max: values[max_idx],
        max_year: years[max_idx],
        min: values[min_idx],
        min_year: years[min_idx],
        sum,
        mean,
        mode: mode_of(values),
        variance,
        std_dev: variance.sqrt(),
    })
}

fn mode_of(values: &[f64]) -> f64 {
    let mut freq: HashMap<u64, usize> = HashMap::new();
    let mut mode = values[0];
    let mut best = 0;
    for &value in values {
        let count = freq.entry(value.to_bits()).or_insert(0);
        *count += 1;
        if *count > best {
            best = *count;
            mode = value;
        }
    }
    mode
}
