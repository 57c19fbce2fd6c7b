//! # Population Statistics Visualization Library
//!
//! `popviz` is a library for exploring per-country population time series.
//! It loads a spreadsheet export of populations by year, builds a normalized
//! in-memory dataset, and renders charts, summary statistics, and pairwise
//! comparisons in a desktop GUI.
//!
//! ## Features
//!
//! - Load spreadsheet exports of per-country population series (1960-2024)
//! - Summary statistics: extrema with years, sum, mean, mode, variance
//! - Fixed-bucket population histograms
//! - Country-vs-country and year-vs-year comparison overlays
//! - Trend, bar, histogram, and scatter charts
//! - Country name search
//!
//! ## Example
//!
//! ```no_run
//! use popviz::PopVizApp;
//! use std::sync::{Arc, Mutex};
//! use eframe::NativeOptions;
//!
//! // Create a new application instance
//! let app = Arc::new(Mutex::new(PopVizApp::default()));
//! let app_wrapper = popviz::app::AppWrapper { app };
//!
//! // Run the application with eframe
//! eframe::run_native(
//!     "Population Statistics",
//!     NativeOptions::default(),
//!     Box::new(|_cc| Ok(Box::new(app_wrapper))),
//! ).unwrap();
//! ```

pub mod app;
pub mod data;
pub mod plotting;
pub mod types;
pub mod utils;

// Re-export main types for convenience
pub use app::App as PopVizApp;
pub use types::{DataError, Dataset};
