use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::ranking::RANKING_LEN;
use crate::data::reshape::LEGEND_CITIES;

/// Optional settings file looked up in the working directory.
pub const SETTINGS_FILE: &str = "aq-dashboard.json";

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// User-tunable settings. Every field has a default, so a partial file is fine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// City table loaded at startup.
    pub data_path: PathBuf,
    /// Most populous cities named in the per-city legend.
    pub legend_cities: usize,
    /// Rows in each ranking table.
    pub ranking_len: usize,
    /// Map marker radius per square root of population, in points.
    pub map_marker_scale: f32,
    /// Initial window size `[width, height]`.
    pub window_size: [f32; 2],
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("final_data.csv"),
            legend_cities: LEGEND_CITIES,
            ranking_len: RANKING_LEN,
            map_marker_scale: 0.003,
            window_size: [1400.0, 900.0],
        }
    }
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading settings from {}", path.display()))?;
        serde_json::from_str(&text).context("parsing settings JSON")
    }

    /// Defaults when the file is absent; defaults plus a warning when it is
    /// unreadable.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            log::debug!("No settings file at {}, using defaults", path.display());
            return Self::default();
        }
        match Self::load(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Ignoring settings file: {e:#}");
                Self::default()
            }
        }
    }
}
