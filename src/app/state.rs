use eframe::App as EApp;
use egui::TextureHandle;
use std::sync::{Arc, Mutex};

use crate::data::{comparison, query, stats};
use crate::types::{
    ChartKind, ComparisonMode, ComparisonState, ComparisonSummary, DataError, Dataset,
    DerivedStats, Year,
};

/// Main application state
#[derive(Clone)]
pub struct App {
    pub file_path: String,
    pub dataset: Dataset,
    pub selected_country: String,
    pub selected_year: Option<Year>,
    pub search_term: String,
    pub comparison: ComparisonState,
    /// Target picked in the comparison combo but not yet applied
    pub pending_country_target: String,
    pub pending_year_target: Option<Year>,
    pub stats: Option<DerivedStats>,
    pub summary: Option<ComparisonSummary>,
    pub current_chart: ChartKind,
    pub plot_path: String,
    pub plot_texture: Option<TextureHandle>,
    pub update_needed: bool,
    pub is_loading: bool,
    pub error_message: Option<String>,
}

impl App {
    /// Replace the dataset wholesale after a successful load.
    ///
    /// All selections and derived values refer to the old dataset, so they
    /// are cleared rather than carried over.
    pub fn update_with_dataset(&mut self, dataset: Dataset) {
        self.dataset = dataset;
        self.selected_country.clear();
        self.selected_year = None;
        self.search_term.clear();
        self.comparison = ComparisonState::default();
        self.pending_country_target.clear();
        self.pending_year_target = None;
        self.stats = None;
        self.summary = None;
        self.error_message = None;
        self.update_needed = true;
    }

    /// Select a country and recompute its statistics.
    pub fn select_country(&mut self, name: &str) {
        self.selected_country = name.to_string();
        self.summary = None;
        self.refresh_stats();
        self.update_needed = true;
    }

    /// Recompute the stats panel from the selected record's valid values.
    /// A country with no data at all simply shows no stats.
    pub fn refresh_stats(&mut self) {
        self.stats = query::find_by_name(&self.dataset, &self.selected_country)
            .and_then(|record| {
                let years = query::sorted_years(record);
                let values = query::valid_values(record);
                stats::derive_stats(&years, &values).ok()
            });
    }

    /// Change the comparison mode, dropping targets from the previous mode.
    pub fn set_comparison_mode(&mut self, mode: ComparisonMode) {
        self.comparison.set_mode(mode);
        self.pending_country_target.clear();
        self.pending_year_target = None;
        self.summary = None;
        self.update_needed = true;
    }

    /// Apply the pending comparison target.
    ///
    /// The target is validated against a candidate state first; on a
    /// validation failure only the error message changes, the comparison
    /// state stays as it was.
    pub fn apply_comparison(&mut self) {
        let mut candidate = self.comparison.clone();
        match candidate.mode {
            ComparisonMode::ByCountry => {
                if !self.pending_country_target.is_empty() {
                    candidate.add_country(self.pending_country_target.clone());
                }
            }
            ComparisonMode::ByYear => {
                if let Some(year) = self.pending_year_target {
                    candidate.add_year(year);
                }
            }
            ComparisonMode::None => {}
        }

        let result = self
            .selected_year
            .ok_or_else(|| DataError::Validation("select a year before comparing".to_string()))
            .and_then(|year| {
                comparison::compare_summary(
                    &self.dataset,
                    &self.selected_country,
                    year,
                    &candidate,
                )
            });

        match result {
            Ok(summary) => {
                self.comparison = candidate;
                self.summary = Some(summary);
                self.error_message = None;
                self.update_needed = true;
            }
            Err(e) => {
                self.error_message = Some(e.to_string());
            }
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self {
            file_path: String::new(),
            dataset: Dataset::default(),
            selected_country: String::new(),
            selected_year: None,
            search_term: String::new(),
            comparison: ComparisonState::default(),
            pending_country_target: String::new(),
            pending_year_target: None,
            stats: None,
            summary: None,
            current_chart: ChartKind::Trend,
            plot_path: "population_chart.png".to_string(),
            plot_texture: None,
            update_needed: false,
            is_loading: false,
            error_message: None,
        }
    }
}

/// Thread-safe wrapper around App for use with eframe
pub struct AppWrapper {
    pub app: Arc<Mutex<App>>,
}

impl EApp for AppWrapper {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if let Ok(mut app) = self.app.lock() {
            super::ui::draw_ui(&mut app, ctx, Arc::clone(&self.app));
        } else {
            log::error!("failed to acquire app lock in update");
        }
    }
}
