//! Dataset builder: raw spreadsheet grid -> normalized [`Dataset`].

use std::collections::{BTreeMap, HashSet};

use log::warn;

use crate::types::{CountryRecord, DataError, Dataset, Year};

/// Build a dataset from a raw 2D grid of cells.
///
/// The first row is the header: a leading label cell followed by one year
/// per column. Each following row is a country name followed by values.
/// Rows with an empty first cell are dropped. A cell that is empty or does
/// not parse as a finite number is omitted from that country's series
/// rather than recorded as zero. Row order is preserved.
pub fn build_dataset(grid: &[Vec<String>]) -> Result<Dataset, DataError> {
    let header = grid
        .first()
        .ok_or_else(|| DataError::Parse("missing header row".to_string()))?;
    if header.len() < 2 {
        return Err(DataError::Parse(
            "header row has no year columns".to_string(),
        ));
    }
    let years = parse_year_columns(&header[1..])?;

    let mut records = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    for row in &grid[1..] {
        let name = match row.first().map(|cell| cell.trim()) {
            Some(name) if !name.is_empty() => name,
            _ => continue,
        };
        if !seen.insert(name.to_string()) {
            warn!("duplicate country row skipped: {}", name);
            continue;
        }

        let mut series = BTreeMap::new();
        for (i, &year) in years.iter().enumerate() {
            if let Some(cell) = row.get(i + 1) {
                if let Ok(value) = cell.trim().parse::<f64>() {
                    if value.is_finite() {
                        series.insert(year, value);
                    }
                }
            }
        }

        records.push(CountryRecord {
            name: name.to_string(),
            series,
        });
    }

    Ok(Dataset::new(records))
}

fn parse_year_columns(cells: &[String]) -> Result<Vec<Year>, DataError> {
    cells
        .iter()
        .map(|cell| {
            cell.trim()
                .parse::<Year>()
                .map_err(|_| DataError::Parse(format!("header cell {:?} is not a year", cell)))
        })
        .collect()
}
