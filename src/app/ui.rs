use egui::{ComboBox, Context};
use image::ImageReader;
use std::sync::{Arc, Mutex};

use super::App;
use crate::data::{self, query};
use crate::types::{ChartKind, ComparisonMode, FIRST_YEAR, LAST_YEAR};
use crate::utils::format_number;

/// Draw the main application UI
pub fn draw_ui(app: &mut App, ctx: &Context, app_arc: Arc<Mutex<App>>) {
    egui::SidePanel::left("side_panel").show(ctx, |ui| {
        ui.heading("Dataset");
        ui.separator();

        ui.label("Spreadsheet path:");
        ui.text_edit_singleline(&mut app.file_path);

        if ui.button("Load").clicked() && !app.is_loading {
            let path = app.file_path.clone();
            let app_clone = app_arc.clone();
            app.is_loading = true;

            tokio::spawn(async move {
                match data::load_dataset_async(path).await {
                    Ok(dataset) => {
                        let mut app = app_clone.lock().unwrap();
                        app.update_with_dataset(dataset);
                    }
                    Err(e) => {
                        log::error!("failed to load dataset: {}", e);
                        let mut app = app_clone.lock().unwrap();
                        app.error_message = Some(e.to_string());
                    }
                }
                let mut app = app_clone.lock().unwrap();
                app.is_loading = false;
            });
        }

        if app.is_loading {
            ui.label("Loading...");
            ui.spinner();
        }

        ui.separator();

        if !app.dataset.is_empty() {
            // Country search with inline results
            ui.label("Search:");
            ui.text_edit_singleline(&mut app.search_term);
            if app.search_term.len() >= 2 {
                let matches: Vec<String> = query::search_by_name(&app.dataset, &app.search_term)
                    .into_iter()
                    .take(10)
                    .map(|record| record.name.clone())
                    .collect();
                for name in matches {
                    if ui.selectable_label(false, &name).clicked() {
                        app.search_term = name.clone();
                        app.select_country(&name);
                    }
                }
            }

            // Country selection
            ui.label("Country:");
            let prev_country = app.selected_country.clone();
            let names: Vec<String> = app
                .dataset
                .records()
                .iter()
                .map(|record| record.name.clone())
                .collect();
            ComboBox::new("country_selector", "")
                .selected_text(&app.selected_country)
                .show_ui(ui, |ui| {
                    for name in &names {
                        ui.selectable_value(&mut app.selected_country, name.clone(), name);
                    }
                });
            if prev_country != app.selected_country {
                let name = app.selected_country.clone();
                app.select_country(&name);
            }

            // Year selection
            ui.label("Year:");
            let prev_year = app.selected_year;
            let year_text = app
                .selected_year
                .map(|year| year.to_string())
                .unwrap_or_else(|| "--".to_string());
            ComboBox::new("year_selector", "")
                .selected_text(year_text)
                .show_ui(ui, |ui| {
                    for year in FIRST_YEAR..=LAST_YEAR {
                        ui.selectable_value(&mut app.selected_year, Some(year), year.to_string());
                    }
                });
            if prev_year != app.selected_year {
                app.update_needed = true;
            }
        }

        ui.separator();

        // Chart selection buttons
        for kind in ChartKind::ALL {
            if ui.button(kind.label()).clicked() {
                app.current_chart = kind;
                app.update_needed = true;
            }
        }

        ui.separator();
        ui.heading("Comparison");

        let prev_mode = app.comparison.mode;
        let mut mode = app.comparison.mode;
        ComboBox::new("comparison_mode", "")
            .selected_text(mode.label())
            .show_ui(ui, |ui| {
                for candidate in [
                    ComparisonMode::None,
                    ComparisonMode::ByYear,
                    ComparisonMode::ByCountry,
                ] {
                    ui.selectable_value(&mut mode, candidate, candidate.label());
                }
            });
        if mode != prev_mode {
            app.set_comparison_mode(mode);
        }

        match app.comparison.mode {
            ComparisonMode::ByCountry => {
                ui.label("Second country:");
                let names: Vec<String> = app
                    .dataset
                    .records()
                    .iter()
                    .map(|record| record.name.clone())
                    .filter(|name| *name != app.selected_country)
                    .collect();
                ComboBox::new("comparison_target", "")
                    .selected_text(&app.pending_country_target)
                    .show_ui(ui, |ui| {
                        for name in &names {
                            ui.selectable_value(
                                &mut app.pending_country_target,
                                name.clone(),
                                name,
                            );
                        }
                    });
            }
            ComparisonMode::ByYear => {
                ui.label("Second year:");
                let target_text = app
                    .pending_year_target
                    .map(|year| year.to_string())
                    .unwrap_or_else(|| "--".to_string());
                ComboBox::new("comparison_target", "")
                    .selected_text(target_text)
                    .show_ui(ui, |ui| {
                        for year in FIRST_YEAR..=LAST_YEAR {
                            if app.selected_year != Some(year) {
                                ui.selectable_value(
                                    &mut app.pending_year_target,
                                    Some(year),
                                    year.to_string(),
                                );
                            }
                        }
                    });
            }
            ComparisonMode::None => {}
        }

        if app.comparison.mode != ComparisonMode::None && ui.button("Compare").clicked() {
            app.apply_comparison();
        }
    });

    egui::CentralPanel::default().show(ctx, |ui| {
        ui.heading("Population Statistics");
        ui.separator();

        if let Some(error) = &app.error_message {
            ui.colored_label(egui::Color32::LIGHT_RED, error);
            ui.separator();
        }

        if let Some(stats) = &app.stats {
            ui.label(format!(
                "Maximum: {} (year {})",
                format_number(stats.max),
                stats.max_year
            ));
            ui.label(format!(
                "Minimum: {} (year {})",
                format_number(stats.min),
                stats.min_year
            ));
            ui.label(format!("Total: {}", format_number(stats.sum)));
            ui.label(format!("Mean: {}", format_number(stats.mean)));
            ui.label(format!("Mode: {}", format_number(stats.mode)));
            ui.label(format!("Variance: {}", format_number(stats.variance)));
            ui.label(format!("Std deviation: {}", format_number(stats.std_dev)));
        }

        if let Some(summary) = &app.summary {
            ui.separator();
            ui.label(format!(
                "{}: {}",
                summary.label_a,
                format_number(summary.value_a)
            ));
            ui.label(format!(
                "{}: {}",
                summary.label_b,
                format_number(summary.value_b)
            ));
            ui.label(format!("Difference: {}", format_number(summary.difference)));
            ui.label(format!("Change: {:.2}%", summary.percent));
        }

        ui.separator();
        egui::ScrollArea::vertical().show(ui, |ui| {
            if let Some(texture) = &app.plot_texture {
                ui.image(texture);
            }

            // Year/value table for the selected country
            if let Some(record) = query::find_by_name(&app.dataset, &app.selected_country) {
                ui.separator();
                egui::Grid::new("population_table").striped(true).show(ui, |ui| {
                    ui.label("Country");
                    ui.label("Year");
                    ui.label("Population");
                    ui.end_row();
                    for (year, value) in &record.series {
                        ui.label(&record.name);
                        ui.label(year.to_string());
                        ui.label(format_number(*value));
                        ui.end_row();
                    }
                });
            }
        });
    });

    // Update plot if needed
    if app.update_needed {
        if let Err(e) = crate::plotting::generate_plot(app) {
            log::error!("plotting error: {}", e);
        } else {
            load_plot_texture(app, ctx);
        }
        app.update_needed = false;
    }
}

fn load_plot_texture(app: &mut App, ctx: &Context) {
    if let Ok(image) = ImageReader::open(&app.plot_path).and_then(|reader| {
        reader
            .decode()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))
    }) {
        let size = [image.width() as usize, image.height() as usize];
        let pixels = image.to_rgba8();
        let pixels = pixels.as_flat_samples();
        let texture = ctx.load_texture(
            "plot_texture",
            egui::ColorImage::from_rgba_unmultiplied(size, pixels.as_slice()),
            egui::TextureOptions::LINEAR,
        );
        app.plot_texture = Some(texture);
    } else {
        log::error!("failed to load plot image");
    }
}
