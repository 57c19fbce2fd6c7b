//! Population Statistics Visualization Tool
//!
//! A GUI application for exploring per-country population time series.

use eframe::egui;
use std::sync::{Arc, Mutex};
use tokio::runtime::Runtime;

use popviz::app::{App, AppWrapper};

fn main() {
    env_logger::init();

    // Initialize the Tokio runtime
    let rt = Runtime::new().unwrap();
    rt.block_on(async {
        let options = eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_inner_size([1200.0, 800.0])
                .with_min_inner_size([800.0, 600.0])
                .with_title("Population Statistics"),
            ..Default::default()
        };

        if let Err(e) = eframe::run_native(
            "Population Statistics",
            options,
            Box::new(|cc| {
                let fonts = egui::FontDefinitions::default();
                cc.egui_ctx.set_fonts(fonts);

                let app: Arc<Mutex<App>> = Arc::new(Mutex::new(App::default()));
                Ok(Box::new(AppWrapper { app }) as Box<dyn eframe::App>)
            }),
        ) {
            log::error!("error running application: {}", e);
        }
    });
}
