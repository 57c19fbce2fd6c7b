//! Spreadsheet loading: the one asynchronous boundary in the application.
//!
//! Reading and decoding the file runs in a blocking task; everything
//! downstream is pure. A second load simply replaces the dataset when it
//! completes; overlapping loads are not guarded, last write wins.

use anyhow::Context;
use log::info;
use tokio::task::spawn_blocking;

use crate::data::builder::build_dataset;
use crate::types::{DataError, Dataset};

/// Read a spreadsheet export and build a dataset from it.
pub async fn load_dataset_async(path: String) -> Result<Dataset, DataError> {
    let grid = spawn_blocking(move || read_grid(&path))
        .await
        .map_err(|e| DataError::Parse(e.to_string()))??;

    let dataset = build_dataset(&grid)?;
    info!(
        "loaded {} countries from {} rows",
        dataset.len(),
        grid.len().saturating_sub(1)
    );
    Ok(dataset)
}

/// Read the raw cell grid from a CSV spreadsheet export.
///
/// Rows may have differing lengths; missing trailing cells are treated the
/// same as empty ones by the builder.
pub fn read_grid(path: &str) -> Result<Vec<Vec<String>>, DataError> {
    read_grid_inner(path).map_err(|e| DataError::Parse(format!("{:#}", e)))
}

fn read_grid_inner(path: &str) -> anyhow::Result<Vec<Vec<String>>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("failed to open spreadsheet: {}", path))?;

    let mut grid = Vec::new();
    for result in reader.records() {
        let record = result.context("failed to read spreadsheet row")?;
        grid.push(record.iter().map(str::to_string).collect());
    }
    Ok(grid)
}
