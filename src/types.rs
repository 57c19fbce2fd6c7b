//! # Common Types
//!
//! This module contains the common types used throughout the application for
//! representing the population dataset, comparison state, and derived views.

use std::collections::BTreeMap;
use thiserror::Error;

/// Calendar year of a population observation.
pub type Year = i32;

/// First year covered by the population export.
pub const FIRST_YEAR: Year = 1960;
/// Last year covered by the population export.
pub const LAST_YEAR: Year = 2024;

/// One country's population time series.
///
/// The series maps year to population. A year with no observation is absent
/// from the map, which is distinct from a recorded population of zero.
/// Records are built once per spreadsheet row and never mutated; a new file
/// upload replaces the whole dataset.
#[derive(Clone, Debug, PartialEq)]
pub struct CountryRecord {
    /// Country name, unique within a dataset
    pub name: String,
    /// Ordered year -> population mapping
    pub series: BTreeMap<Year, f64>,
}

/// An ordered collection of country records, in spreadsheet row order.
///
/// Name uniqueness is enforced by the dataset builder; the first row wins
/// when a name repeats.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Dataset {
    records: Vec<CountryRecord>,
}

impl Dataset {
    /// Wrap records built by the dataset builder. Callers are expected to
    /// have deduplicated names already.
    pub fn new(records: Vec<CountryRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[CountryRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Which secondary dimension the charts overlay, if any.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ComparisonMode {
    #[default]
    None,
    ByYear,
    ByCountry,
}

impl ComparisonMode {
    pub fn label(self) -> &'static str {
        match self {
            ComparisonMode::None => "No comparison",
            ComparisonMode::ByYear => "Compare years",
            ComparisonMode::ByCountry => "Compare countries",
        }
    }
}

/// Current comparison selection.
///
/// Targets are cleared whenever the mode changes, so a leftover selection
/// from one mode never leaks into another.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ComparisonState {
    pub mode: ComparisonMode,
    /// Secondary countries, in selection order (by-country mode)
    pub countries: Vec<String>,
    /// Secondary years, in selection order (by-year mode)
    pub years: Vec<Year>,
}

impl ComparisonState {
    pub fn set_mode(&mut self, mode: ComparisonMode) {
        if self.mode != mode {
            self.countries.clear();
            self.years.clear();
        }
        self.mode = mode;
    }

    pub fn add_country(&mut self, name: String) {
        if !self.countries.contains(&name) {
            self.countries.push(name);
        }
    }

    pub fn add_year(&mut self, year: Year) {
        if !self.years.contains(&year) {
            self.years.push(year);
        }
    }

    pub fn has_targets(&self) -> bool {
        !self.countries.is_empty() || !self.years.is_empty()
    }
}

/// Summary statistics over one country's valid values.
///
/// Recomputed from the series on every visualization update, never cached.
#[derive(Clone, Debug, PartialEq)]
pub struct DerivedStats {
    pub max: f64,
    /// Year of the first occurrence of the maximum
    pub max_year: Year,
    pub min: f64,
    /// Year of the first occurrence of the minimum
    pub min_year: Year,
    pub sum: f64,
    pub mean: f64,
    /// Most frequent value; ties go to the first value to reach the
    /// winning frequency in series order
    pub mode: f64,
    /// Population variance (denominator = count)
    pub variance: f64,
    pub std_dev: f64,
}

/// Result of a pairwise comparison (country vs country, or year vs year).
#[derive(Clone, Debug, PartialEq)]
pub struct ComparisonSummary {
    pub label_a: String,
    pub label_b: String,
    pub year_a: Year,
    pub year_b: Year,
    pub value_a: f64,
    pub value_b: f64,
    /// `value_b - value_a`
    pub difference: f64,
    /// Difference as a percentage of `value_a`
    pub percent: f64,
}

/// Values of one chart series.
#[derive(Clone, Debug, PartialEq)]
pub enum SeriesValues {
    /// One slot per label; `None` marks a gap (no data, or a non-highlighted
    /// point of a sparse emphasis series)
    Flat(Vec<Option<f64>>),
    /// Explicit (year, value) pairs for scatter charts
    Points(Vec<(Year, f64)>),
}

/// One labeled series handed to the rendering layer.
#[derive(Clone, Debug, PartialEq)]
pub struct ChartSeries {
    pub label: String,
    pub values: SeriesValues,
    /// Render as point markers on top of the base line
    pub emphasis: bool,
}

/// What the rendering layer consumes: axis labels plus labeled series.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<ChartSeries>,
}

/// Which chart the central panel currently shows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ChartKind {
    #[default]
    Trend,
    YearBar,
    Histogram,
    Scatter,
}

impl ChartKind {
    pub fn label(self) -> &'static str {
        match self {
            ChartKind::Trend => "Population Trend",
            ChartKind::YearBar => "Population by Year",
            ChartKind::Histogram => "Distribution",
            ChartKind::Scatter => "Year vs Population",
        }
    }

    pub const ALL: [ChartKind; 4] = [
        ChartKind::Trend,
        ChartKind::YearBar,
        ChartKind::Histogram,
        ChartKind::Scatter,
    ];
}

/// Errors surfaced to the user.
#[derive(Debug, Error)]
pub enum DataError {
    /// The uploaded file was malformed or unreadable; the previous dataset
    /// is left untouched.
    #[error("failed to parse spreadsheet: {0}")]
    Parse(String),
    /// A comparison was requested with a missing field or missing data
    /// value; no state is mutated.
    #[error("{0}")]
    Validation(String),
    /// A statistics or binning operation was handed an empty series.
    #[error("statistics require a non-empty series")]
    EmptySeries,
}
