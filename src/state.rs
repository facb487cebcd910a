use std::path::Path;

use crate::color::ColorMap;
use crate::data::filter::ContinentFilter;
use crate::data::map::{MapRow, build_map_rows};
use crate::data::model::CityTable;
use crate::data::ranking::Rankings;
use crate::data::view::{DashboardView, SeriesMode, ViewConfig, build_view};
use crate::settings::Settings;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub settings: Settings,

    /// Loaded table (None until a file loads).
    pub table: Option<CityTable>,

    /// Current dropdown / checkbox selection.
    pub config: ViewConfig,

    /// Selection-dependent charts (rebuilt on every selection change).
    pub view: Option<DashboardView>,

    /// Selection-independent views, built once per table.
    pub map_rows: Vec<MapRow>,
    pub rankings: Rankings,

    /// One colour per continent for the scatter chart.
    pub continent_colors: ColorMap,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        let config = ViewConfig {
            legend_cities: settings.legend_cities,
            ..ViewConfig::default()
        };
        Self {
            settings,
            table: None,
            config,
            view: None,
            map_rows: Vec::new(),
            rankings: Rankings::default(),
            continent_colors: ColorMap::default(),
            status_message: None,
        }
    }

    /// Load a file, replacing the current table. On failure the previous
    /// table stays and the error is shown.
    pub fn load_path(&mut self, path: &Path) {
        match crate::data::loader::load_file(path) {
            Ok(table) if table.is_empty() => {
                log::warn!("{} contains no cities", path.display());
                self.status_message = Some(format!("{} contains no cities", path.display()));
            }
            Ok(table) => self.set_table(table),
            Err(e) => {
                log::error!("Failed to load {}: {e:#}", path.display());
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Ingest a newly loaded table and derive every view from it.
    pub fn set_table(&mut self, table: CityTable) {
        self.map_rows = build_map_rows(&table);
        self.rankings = Rankings::build(&table, self.settings.ranking_len);
        self.continent_colors = ColorMap::new(table.continents.iter().map(String::as_str));
        self.config.continent = ContinentFilter::All;
        self.config.country = None;

        self.table = Some(table);
        self.status_message = None;
        self.refresh_view();
    }

    /// Recompute the selection-dependent view and adopt its resolved country.
    pub fn refresh_view(&mut self) {
        self.view = self
            .table
            .as_ref()
            .map(|table| build_view(table, &self.config));
        if let Some(view) = &self.view {
            self.config.country = view.country.clone();
        }
    }

    pub fn set_continent(&mut self, continent: ContinentFilter) {
        if self.config.continent != continent {
            self.config.continent = continent;
            self.refresh_view();
        }
    }

    pub fn set_country(&mut self, country: String) {
        if self.config.country.as_deref() != Some(country.as_str()) {
            self.config.country = Some(country);
            self.refresh_view();
        }
    }

    pub fn set_toggles(&mut self, aggregate: bool, annual: bool) {
        let mode = SeriesMode::from_toggles(aggregate, annual);
        if self.config.mode != mode {
            self.config.mode = mode;
            self.refresh_view();
        }
    }
}
