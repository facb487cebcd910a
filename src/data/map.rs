use palette::Srgb;

use super::model::CityTable;
use crate::color::{SeverityBand, classify};

/// A city ready for the map layer.
#[derive(Debug, Clone, PartialEq)]
pub struct MapRow {
    pub city: String,
    pub country: String,
    pub lat: f64,
    pub lon: f64,
    pub pop_2020: u64,
    pub pop_label: String,
    pub pm25: f64,
    pub band: SeverityBand,
    pub color: Srgb<u8>,
}

/// Classify and label every city with a defined 2019 average.
pub fn build_map_rows(table: &CityTable) -> Vec<MapRow> {
    table
        .cities
        .iter()
        .filter_map(|c| {
            let pm25 = c.avg_2019.filter(|v| !v.is_nan())?;
            let band = SeverityBand::from_pm25(pm25)?;
            Some(MapRow {
                city: c.city.clone(),
                country: c.country.clone(),
                lat: c.lat,
                lon: c.lon,
                pop_2020: c.pop_2020,
                pop_label: c.pop_label.clone(),
                pm25,
                band,
                color: classify(pm25),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::city;

    #[test]
    fn rows_carry_band_colors_and_labels() {
        let table = CityTable::from_records(vec![
            city("X", "Utopia", "Testlandia", 300, 40.0),
            city("Y", "Utopia", "Testlandia", 100, 8.0),
            city("Z", "Utopia", "Testlandia", 500_000, 60.0),
        ]);
        let rows = build_map_rows(&table);
        let colors: Vec<Srgb<u8>> = rows.iter().map(|r| r.color).collect();
        assert_eq!(
            colors,
            vec![
                SeverityBand::UnhealthySensitive.rgb(),
                SeverityBand::WhoTarget.rgb(),
                SeverityBand::Unhealthy.rgb(),
            ]
        );
        assert_eq!(rows[2].pop_label, "500,000");
        assert_eq!(rows[1].band, SeverityBand::WhoTarget);
    }

    #[test]
    fn undefined_averages_are_left_off_the_map() {
        let mut unknown = city("U", "Utopia", "Testlandia", 10, 0.0);
        unknown.avg_2019 = None;
        let table = CityTable::from_records(vec![unknown, city("A", "Utopia", "Testlandia", 20, 5.0)]);
        let rows = build_map_rows(&table);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].city, "A");
    }
}
