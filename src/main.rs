mod app;
mod color;
mod data;
mod format;
mod settings;
mod state;
mod ui;

use std::path::Path;

use app::DashboardApp;
use eframe::egui;
use settings::{SETTINGS_FILE, Settings};

fn main() -> eframe::Result {
    env_logger::init();

    let settings = Settings::load_or_default(Path::new(SETTINGS_FILE));
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(settings.window_size)
            .with_min_inner_size([800.0, 600.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Air Quality Data for World Cities",
        options,
        Box::new(|_cc| Ok(Box::new(DashboardApp::new(settings)))),
    )
}
