use std::path::PathBuf;

use eframe::egui::{self, ScrollArea, Ui};

use crate::data::ranking::full_table;
use crate::settings::Settings;
use crate::state::AppState;
use crate::ui::{panels, plot, tables};

const MAP_HEIGHT: f32 = 420.0;
const CHART_HEIGHT: f32 = 320.0;
const FULL_TABLE_HEIGHT: f32 = 360.0;

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct DashboardApp {
    pub state: AppState,
}

impl DashboardApp {
    /// Build the app and load the configured data file, if present.
    pub fn new(settings: Settings) -> Self {
        let data_path: PathBuf = settings.data_path.clone();
        let mut state = AppState::new(settings);
        if data_path.exists() {
            state.load_path(&data_path);
        } else {
            log::warn!("Data file {} not found; use File → Open…", data_path.display());
        }
        Self { state }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: selection ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: map, charts, tables ----
        egui::CentralPanel::default().show(ctx, |ui| {
            if self.state.table.is_none() {
                ui.centered_and_justified(|ui: &mut Ui| {
                    ui.heading("Open a city data file  (File → Open…)");
                });
                return;
            }
            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| dashboard(ui, &self.state));
        });
    }
}

fn dashboard(ui: &mut Ui, state: &AppState) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.heading("Air Quality and Population for World Cities");
    });
    plot::city_map(ui, state, MAP_HEIGHT);
    ui.separator();

    ui.columns(2, |cols| {
        cols[0].heading("Breakdown by Continent");
        plot::continent_scatter(&mut cols[0], state, CHART_HEIGHT);
        let country = state.config.country.as_deref().unwrap_or("");
        cols[1].heading(format!("Breakdown by Country: {country}"));
        plot::country_series(&mut cols[1], state, CHART_HEIGHT);
    });
    ui.separator();

    ui.columns(3, |cols| {
        let rankings = &state.rankings;
        tables::ranking_table(
            &mut cols[0],
            "highest",
            "Highest PM2.5 Concentration",
            &rankings.highest_pm25,
            false,
        );
        tables::ranking_table(
            &mut cols[1],
            "lowest",
            "Lowest PM2.5 Concentration",
            &rankings.lowest_pm25,
            false,
        );
        tables::ranking_table(&mut cols[2], "populous", "Most Populous", &rankings.most_populous, true);
    });
    ui.separator();

    if let Some(table) = &state.table {
        egui::CollapsingHeader::new("Full Data")
            .default_open(false)
            .show(ui, |ui: &mut Ui| {
                tables::full_table(ui, &full_table(table), FULL_TABLE_HEIGHT);
            });
    }
}
