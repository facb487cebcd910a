use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// PM2.5 severity bands
// ---------------------------------------------------------------------------

/// Fixed PM2.5 concentration band, ordered from cleanest to most hazardous.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SeverityBand {
    WhoTarget,
    Good,
    Moderate,
    UnhealthySensitive,
    Unhealthy,
    VeryUnhealthy,
    Hazardous,
}

/// Exclusive upper bound of every band except the last.
const BAND_LIMITS: [(f64, SeverityBand); 6] = [
    (10.0, SeverityBand::WhoTarget),
    (12.0, SeverityBand::Good),
    (35.4, SeverityBand::Moderate),
    (55.4, SeverityBand::UnhealthySensitive),
    (150.4, SeverityBand::Unhealthy),
    (250.4, SeverityBand::VeryUnhealthy),
];

/// Color used for readings that cannot be classified (NaN).
pub const UNKNOWN_RGB: Srgb<u8> = Srgb::new(160, 160, 160);
pub const UNKNOWN_LABEL: &str = "Unknown";

impl SeverityBand {
    pub const ALL: [SeverityBand; 7] = [
        SeverityBand::WhoTarget,
        SeverityBand::Good,
        SeverityBand::Moderate,
        SeverityBand::UnhealthySensitive,
        SeverityBand::Unhealthy,
        SeverityBand::VeryUnhealthy,
        SeverityBand::Hazardous,
    ];

    /// First band whose upper bound exceeds `pm25`. `None` for NaN.
    pub fn from_pm25(pm25: f64) -> Option<Self> {
        if pm25.is_nan() {
            return None;
        }
        let band = BAND_LIMITS
            .iter()
            .find(|(limit, _)| pm25 < *limit)
            .map_or(SeverityBand::Hazardous, |(_, band)| *band);
        Some(band)
    }

    pub fn rgb(self) -> Srgb<u8> {
        match self {
            SeverityBand::WhoTarget => Srgb::new(50, 125, 255),
            SeverityBand::Good => Srgb::new(150, 255, 150),
            SeverityBand::Moderate => Srgb::new(255, 230, 125),
            SeverityBand::UnhealthySensitive => Srgb::new(255, 190, 90),
            SeverityBand::Unhealthy => Srgb::new(255, 130, 120),
            SeverityBand::VeryUnhealthy => Srgb::new(160, 100, 255),
            SeverityBand::Hazardous => Srgb::new(120, 80, 50),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SeverityBand::WhoTarget => "WHO target",
            SeverityBand::Good => "Good",
            SeverityBand::Moderate => "Moderate",
            SeverityBand::UnhealthySensitive => "Unhealthy for sensitive groups",
            SeverityBand::Unhealthy => "Unhealthy",
            SeverityBand::VeryUnhealthy => "Very unhealthy",
            SeverityBand::Hazardous => "Hazardous",
        }
    }

    /// Exclusive upper bound, `None` for the open-ended hazardous band.
    pub fn upper_bound(self) -> Option<f64> {
        BAND_LIMITS
            .iter()
            .find(|(_, band)| *band == self)
            .map(|(limit, _)| *limit)
    }

    /// Inclusive lower bound (0 for the first band).
    pub fn lower_bound(self) -> f64 {
        BAND_LIMITS
            .iter()
            .take_while(|(_, band)| *band != self)
            .last()
            .map_or(0.0, |(limit, _)| *limit)
    }

    /// Human readable range, e.g. `"12 – 35.4"`.
    pub fn range_label(self) -> String {
        match self.upper_bound() {
            Some(upper) if self == SeverityBand::WhoTarget => format!("< {upper}"),
            Some(upper) => format!("{} – {upper}", self.lower_bound()),
            None => format!("≥ {}", self.lower_bound()),
        }
    }
}

/// Map a PM2.5 concentration to its band color. NaN maps to [`UNKNOWN_RGB`].
pub fn classify(pm25: f64) -> Srgb<u8> {
    band_rgb(SeverityBand::from_pm25(pm25))
}

/// Label of a possibly undefined band, as shown in the tables.
pub fn band_label(band: Option<SeverityBand>) -> &'static str {
    band.map_or(UNKNOWN_LABEL, SeverityBand::label)
}

/// Swatch color of a possibly undefined band.
pub fn band_rgb(band: Option<SeverityBand>) -> Srgb<u8> {
    band.map_or(UNKNOWN_RGB, SeverityBand::rgb)
}

/// Convert a band color to an egui color with the given opacity.
pub fn to_color32(rgb: Srgb<u8>, alpha: u8) -> Color32 {
    Color32::from_rgba_unmultiplied(rgb.red, rgb.green, rgb.blue, alpha)
}

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            let rgb: Srgb<u8> = rgb.into_format();
            Color32::from_rgb(rgb.red, rgb.green, rgb.blue)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Categorical color mapping: continent / city name → Color32
// ---------------------------------------------------------------------------

/// Maps category names (continents, cities) to distinct colours.
#[derive(Debug, Clone, Default)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
}

impl ColorMap {
    /// Assign one palette colour per name, in the order given.
    pub fn new<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        let mut unique: Vec<&str> = Vec::new();
        for name in names {
            if !unique.contains(&name) {
                unique.push(name);
            }
        }
        let palette = generate_palette(unique.len());
        let mapping = unique
            .into_iter()
            .zip(palette)
            .map(|(name, c)| (name.to_string(), c))
            .collect();
        ColorMap { mapping }
    }

    /// Look up the colour for a name, gray when unknown.
    pub fn color_for(&self, name: &str) -> Color32 {
        self.mapping.get(name).copied().unwrap_or(Color32::GRAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLUE: Srgb<u8> = Srgb::new(50, 125, 255);
    const GREEN: Srgb<u8> = Srgb::new(150, 255, 150);
    const YELLOW: Srgb<u8> = Srgb::new(255, 230, 125);
    const ORANGE: Srgb<u8> = Srgb::new(255, 190, 90);
    const RED: Srgb<u8> = Srgb::new(255, 130, 120);
    const PURPLE: Srgb<u8> = Srgb::new(160, 100, 255);
    const BROWN: Srgb<u8> = Srgb::new(120, 80, 50);

    #[test]
    fn band_interiors() {
        assert_eq!(classify(0.0), BLUE);
        assert_eq!(classify(11.0), GREEN);
        assert_eq!(classify(20.0), YELLOW);
        assert_eq!(classify(40.0), ORANGE);
        assert_eq!(classify(100.0), RED);
        assert_eq!(classify(200.0), PURPLE);
        assert_eq!(classify(999.0), BROWN);
    }

    #[test]
    fn boundaries_belong_to_the_next_band() {
        assert_eq!(classify(10.0), GREEN);
        assert_eq!(classify(12.0), YELLOW);
        assert_eq!(classify(35.4), ORANGE);
        assert_eq!(classify(55.4), RED);
        assert_eq!(classify(150.4), PURPLE);
        assert_eq!(classify(250.4), BROWN);
        assert_eq!(classify(35.399), YELLOW);
    }

    #[test]
    fn severity_never_decreases_with_concentration() {
        let mut previous = SeverityBand::WhoTarget;
        for step in 0..6000 {
            let band = SeverityBand::from_pm25(step as f64 * 0.05).unwrap();
            assert!(band >= previous, "band dropped at {}", step as f64 * 0.05);
            assert!(SeverityBand::ALL.iter().any(|b| b.rgb() == classify(step as f64 * 0.05)));
            previous = band;
        }
        assert_eq!(previous, SeverityBand::Hazardous);
    }

    #[test]
    fn nan_is_unknown() {
        assert_eq!(SeverityBand::from_pm25(f64::NAN), None);
        assert_eq!(classify(f64::NAN), UNKNOWN_RGB);
        assert!(SeverityBand::ALL.iter().all(|b| b.rgb() != UNKNOWN_RGB));
    }

    #[test]
    fn undefined_band_is_unknown_gray() {
        assert_eq!(band_label(None), "Unknown");
        assert_eq!(band_rgb(None), UNKNOWN_RGB);
        assert_eq!(band_label(Some(SeverityBand::Good)), "Good");
        assert_eq!(band_rgb(Some(SeverityBand::Good)), SeverityBand::Good.rgb());
    }

    #[test]
    fn range_labels() {
        assert_eq!(SeverityBand::WhoTarget.range_label(), "< 10");
        assert_eq!(SeverityBand::Moderate.range_label(), "12 – 35.4");
        assert_eq!(SeverityBand::Hazardous.range_label(), "≥ 250.4");
    }

    #[test]
    fn color_map_assigns_distinct_colors() {
        let cm = ColorMap::new(["Asia", "Europe", "Asia", "Africa"]);
        assert_ne!(cm.color_for("Asia"), cm.color_for("Europe"));
        assert_ne!(cm.color_for("Europe"), cm.color_for("Africa"));
        assert_eq!(cm.color_for("Atlantis"), Color32::GRAY);
    }
}
