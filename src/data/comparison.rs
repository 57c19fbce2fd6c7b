//! Comparison assembler: builds the chart-ready dataset views for the
//! current comparison mode.

use std::collections::BTreeSet;

use crate::data::query::{find_by_name, sorted_years, valid_values};
use crate::types::{
    ChartData, ChartSeries, ComparisonMode, ComparisonState, ComparisonSummary, CountryRecord,
    DataError, Dataset, SeriesValues, Year,
};

/// Single-series view of one country: labels are its sorted years, the one
/// dataset is its valid values.
pub fn single_view(record: &CountryRecord) -> ChartData {
    let years = sorted_years(record);
    ChartData {
        labels: years.iter().map(|year| year.to_string()).collect(),
        datasets: vec![ChartSeries {
            label: record.name.clone(),
            values: SeriesValues::Flat(valid_values(record).into_iter().map(Some).collect()),
            emphasis: false,
        }],
    }
}

/// Trend view for the primary country under the current comparison state.
///
/// - `None`, or a comparison mode with no targets selected yet: the primary
///   series alone.
/// - `ByCountry`: the primary plus each existing target country as its own
///   labeled line; labels are the ascending union of all participating
///   years, with `None` filling the gaps.
/// - `ByYear`: the primary's full series plus one sparse emphasis series
///   per selected year that the primary has data for, `None` everywhere
///   except at the matching index.
pub fn trend_view(
    dataset: &Dataset,
    primary: &str,
    state: &ComparisonState,
) -> Result<ChartData, DataError> {
    let record = find_by_name(dataset, primary)
        .ok_or_else(|| DataError::Validation(format!("unknown country: {}", primary)))?;

    match state.mode {
        ComparisonMode::None => Ok(single_view(record)),
        ComparisonMode::ByCountry => {
            if state.countries.is_empty() {
                return Ok(single_view(record));
            }
            let mut participants = vec![record];
            for name in &state.countries {
                if let Some(other) = find_by_name(dataset, name) {
                    participants.push(other);
                }
            }

            let years: BTreeSet<Year> = participants
                .iter()
                .flat_map(|r| r.series.keys().copied())
                .collect();
            let years: Vec<Year> = years.into_iter().collect();

            let datasets = participants
                .iter()
                .map(|r| ChartSeries {
                    label: r.name.clone(),
                    values: SeriesValues::Flat(
                        years.iter().map(|year| r.series.get(year).copied()).collect(),
                    ),
                    emphasis: false,
                })
                .collect();

            Ok(ChartData {
                labels: years.iter().map(|year| year.to_string()).collect(),
                datasets,
            })
        }
        ComparisonMode::ByYear => {
            if state.years.is_empty() {
                return Ok(single_view(record));
            }
            let years = sorted_years(record);
            let mut data = single_view(record);

            for &target in &state.years {
                if let Some(idx) = years.iter().position(|&year| year == target) {
                    let mut values = vec![None; years.len()];
                    values[idx] = record.series.get(&target).copied();
                    data.datasets.push(ChartSeries {
                        label: format!("{} ({})", record.name, target),
                        values: SeriesValues::Flat(values),
                        emphasis: true,
                    });
                }
            }

            Ok(data)
        }
    }
}

/// Bar view for a single year.
///
/// The primary country contributes one bar if it has data for the year.
/// In by-country mode each target country contributes a bar as well, and a
/// country lacking data for the year is omitted entirely.
pub fn year_view(
    dataset: &Dataset,
    primary: &str,
    year: Year,
    state: &ComparisonState,
) -> Result<ChartData, DataError> {
    let record = find_by_name(dataset, primary)
        .ok_or_else(|| DataError::Validation(format!("unknown country: {}", primary)))?;

    let mut participants = vec![record];
    if state.mode == ComparisonMode::ByCountry {
        for name in &state.countries {
            if let Some(other) = find_by_name(dataset, name) {
                participants.push(other);
            }
        }
    }

    let mut data = ChartData::default();
    for r in participants {
        if let Some(&value) = r.series.get(&year) {
            data.labels.push(r.name.clone());
            data.datasets.push(ChartSeries {
                label: format!("{} ({})", r.name, year),
                values: SeriesValues::Flat(vec![Some(value)]),
                emphasis: false,
            });
        }
    }

    Ok(data)
}

/// Scatter view: one point series of (year, value) pairs.
pub fn scatter_view(dataset: &Dataset, primary: &str) -> Result<ChartData, DataError> {
    let record = find_by_name(dataset, primary)
        .ok_or_else(|| DataError::Validation(format!("unknown country: {}", primary)))?;

    Ok(ChartData {
        labels: Vec::new(),
        datasets: vec![ChartSeries {
            label: format!("{} population", record.name),
            values: SeriesValues::Points(
                record.series.iter().map(|(&year, &value)| (year, value)).collect(),
            ),
            emphasis: false,
        }],
    })
}

/// Pairwise comparison for the summary panel.
///
/// Requires a comparison mode, a selected target (the most recent one),
/// a primary country, and a year; any missing piece or missing data value
/// yields [`DataError::Validation`].
pub fn compare_summary(
    dataset: &Dataset,
    primary: &str,
    year: Year,
    state: &ComparisonState,
) -> Result<ComparisonSummary, DataError> {
    if primary.is_empty() {
        return Err(DataError::Validation(
            "select a country before comparing".to_string(),
        ));
    }
    let record = find_by_name(dataset, primary)
        .ok_or_else(|| DataError::Validation(format!("unknown country: {}", primary)))?;

    let (label_b, year_b, value_b) = match state.mode {
        ComparisonMode::None => {
            return Err(DataError::Validation(
                "select a comparison mode before comparing".to_string(),
            ));
        }
        ComparisonMode::ByYear => {
            let &other_year = state.years.last().ok_or_else(|| {
                DataError::Validation("select a second year before comparing".to_string())
            })?;
            let value = record.series.get(&other_year).copied();
            (format!("{} ({})", primary, other_year), other_year, value)
        }
        ComparisonMode::ByCountry => {
            let other_name = state.countries.last().ok_or_else(|| {
                DataError::Validation("select a second country before comparing".to_string())
            })?;
            let other = find_by_name(dataset, other_name).ok_or_else(|| {
                DataError::Validation(format!("unknown country: {}", other_name))
            })?;
            let value = other.series.get(&year).copied();
            (format!("{} ({})", other_name, year), year, value)
        }
    };

    let value_a = record.series.get(&year).copied();
    let (value_a, value_b) = match (value_a, value_b) {
        (Some(a), Some(b)) => (a, b),
        _ => {
            return Err(DataError::Validation(
                "no data available for the comparison".to_string(),
            ));
        }
    };

    let difference = value_b - value_a;
    Ok(ComparisonSummary {
        label_a: format!("{} ({})", primary, year),
        label_b,
        year_a: year,
        year_b,
        value_a,
        value_b,
        difference,
        percent: difference / value_a * 100.0,
    })
}
