use eframe::egui::{self, Color32, RichText, Ui};

use crate::color::{SeverityBand, to_color32};
use crate::data::filter::continent_options;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – selection widgets
// ---------------------------------------------------------------------------

/// Render the left panel: continent / country selectors, chart toggles and
/// the severity legend.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let Some(table) = &state.table else {
        ui.label("No data loaded.");
        return;
    };

    // Clone what we need so we can mutate state inside the closures.
    let continents = continent_options(table);
    let countries = state
        .view
        .as_ref()
        .map(|v| v.countries.clone())
        .unwrap_or_default();

    ui.strong("Continent");
    let current_continent = state.config.continent.clone();
    egui::ComboBox::from_id_salt("continent")
        .selected_text(current_continent.to_string())
        .show_ui(ui, |ui: &mut Ui| {
            for option in continents {
                let label = option.to_string();
                if ui
                    .selectable_label(current_continent == option, label)
                    .clicked()
                {
                    state.set_continent(option);
                }
            }
        });

    ui.add_space(4.0);
    ui.strong("Country");
    let current_country = state.config.country.clone().unwrap_or_default();
    egui::ComboBox::from_id_salt("country")
        .selected_text(&current_country)
        .show_ui(ui, |ui: &mut Ui| {
            for country in &countries {
                if ui
                    .selectable_label(current_country == *country, country)
                    .clicked()
                {
                    state.set_country(country.clone());
                }
            }
        });

    ui.add_space(4.0);
    let mut aggregate = state.config.mode.aggregate();
    let mut annual = state.config.mode.annual();
    let changed = ui.checkbox(&mut aggregate, "Aggregate").changed()
        | ui.checkbox(&mut annual, "Annual").changed();
    if changed {
        state.set_toggles(aggregate, annual);
    }

    ui.separator();
    severity_legend(ui);
}

/// Band swatches with their PM2.5 ranges.
pub fn severity_legend(ui: &mut Ui) {
    ui.strong("PM2.5 (µg/m³)");
    for band in SeverityBand::ALL {
        ui.horizontal(|ui: &mut Ui| {
            let (rect, _) = ui.allocate_exact_size(egui::vec2(14.0, 14.0), egui::Sense::hover());
            ui.painter().rect_filled(rect, 2.0, to_color32(band.rgb(), 255));
            ui.label(format!("{}  {}", band.label(), band.range_label()));
        });
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(table) = &state.table {
            let in_selection = state.view.as_ref().map_or(0, |v| v.scatter.len());
            ui.label(format!(
                "{} cities loaded, {} in selection",
                table.len(),
                in_selection
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open city air quality data")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.load_path(&path);
    }
}
