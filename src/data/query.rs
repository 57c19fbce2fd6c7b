//! Query layer: pure lookups over a built dataset.

use crate::types::{CountryRecord, Dataset, Year};

/// Look up a country by exact name. Absent names yield `None`, never panic.
pub fn find_by_name<'a>(dataset: &'a Dataset, name: &str) -> Option<&'a CountryRecord> {
    dataset.records().iter().find(|record| record.name == name)
}

/// Years with a defined value, strictly ascending.
pub fn sorted_years(record: &CountryRecord) -> Vec<Year> {
    record.series.keys().copied().collect()
}

/// Defined population values, in [`sorted_years`] order.
pub fn valid_values(record: &CountryRecord) -> Vec<f64> {
    record.series.values().copied().collect()
}

/// Case-insensitive substring search over country names, in dataset order.
pub fn search_by_name<'a>(dataset: &'a Dataset, term: &str) -> Vec<&'a CountryRecord> {
    let term = term.to_lowercase();
    dataset
        .records()
        .iter()
        .filter(|record| record.name.to_lowercase().contains(&term))
        .collect()
}
