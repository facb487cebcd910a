use eframe::egui::{self, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crate::color::{SeverityBand, band_label, band_rgb, to_color32};
use crate::data::model::CityRecord;
use crate::data::ranking::RankedRow;
use crate::format::{format_pm25, format_population};

const ROW_HEIGHT: f32 = 18.0;

/// Band swatch followed by its label; gray "Unknown" when undefined.
fn band_cell(ui: &mut Ui, band: Option<SeverityBand>) {
    ui.horizontal(|ui: &mut Ui| {
        let (rect, _) = ui.allocate_exact_size(egui::vec2(10.0, 10.0), egui::Sense::hover());
        ui.painter().rect_filled(rect, 2.0, to_color32(band_rgb(band), 255));
        ui.label(band_label(band));
    });
}

// ---------------------------------------------------------------------------
// Ranking tables
// ---------------------------------------------------------------------------

/// A numbered ranking table. `with_population` adds the population column.
pub fn ranking_table(ui: &mut Ui, id: &str, title: &str, rows: &[RankedRow], with_population: bool) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.heading(title);
    });

    let mut headers = vec!["#", "City", "Country"];
    if with_population {
        headers.push("2020 Population");
    }
    headers.push("Avg PM2.5 2019");
    headers.push("Band");

    ui.push_id(id, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .column(Column::auto())
            .columns(Column::auto().resizable(true), headers.len() - 1)
            .header(ROW_HEIGHT + 2.0, |mut header| {
                for h in &headers {
                    header.col(|ui| {
                        ui.strong(*h);
                    });
                }
            })
            .body(|mut body| {
                for row in rows {
                    body.row(ROW_HEIGHT, |mut tr| {
                        tr.col(|ui| {
                            ui.label(row.rank.to_string());
                        });
                        tr.col(|ui| {
                            ui.label(&row.city);
                        });
                        tr.col(|ui| {
                            ui.label(&row.country);
                        });
                        if with_population {
                            tr.col(|ui| {
                                ui.label(&row.pop_label);
                            });
                        }
                        tr.col(|ui| {
                            ui.label(&row.pm25_label);
                        });
                        tr.col(|ui| band_cell(ui, row.band));
                    });
                }
            });
    });
}

// ---------------------------------------------------------------------------
// Full data table
// ---------------------------------------------------------------------------

const FULL_HEADERS: [&str; 24] = [
    "City",
    "Country",
    "iso3",
    "Continent",
    "2020 Population",
    "Avg PM2.5 2019",
    "Band",
    "PM2.5 Jan19",
    "PM2.5 Feb19",
    "PM2.5 Mar19",
    "PM2.5 Apr19",
    "PM2.5 May19",
    "PM2.5 Jun19",
    "PM2.5 Jul19",
    "PM2.5 Aug19",
    "PM2.5 Sep19",
    "PM2.5 Oct19",
    "PM2.5 Nov19",
    "PM2.5 Dec19",
    "Avg PM2.5 2018",
    "Avg PM2.5 2017",
    "City Alt Name",
    "Latitude",
    "Longitude",
];

/// Position of the band column in [`FULL_HEADERS`].
const BAND_COLUMN: usize = 6;

fn full_row_cells(c: &CityRecord) -> Vec<String> {
    let mut cells = vec![
        c.city.clone(),
        c.country.clone(),
        c.iso3.clone(),
        c.continent.clone(),
        format_population(c.pop_2020),
        format_pm25(c.avg_2019),
        band_label(c.band).to_string(),
    ];
    cells.extend(c.monthly.iter().map(|m| format_pm25(*m)));
    cells.extend([
        format_pm25(c.avg_2018),
        format_pm25(c.avg_2017),
        c.city_alt.clone(),
        format!("{:.4}", c.lat),
        format!("{:.4}", c.lon),
    ]);
    cells
}

/// Every column of every city, sorted by city name.
pub fn full_table(ui: &mut Ui, rows: &[&CityRecord], height: f32) {
    ScrollArea::horizontal().show(ui, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .max_scroll_height(height)
            .columns(Column::auto().resizable(true), FULL_HEADERS.len())
            .header(ROW_HEIGHT + 2.0, |mut header| {
                for h in FULL_HEADERS {
                    header.col(|ui| {
                        ui.strong(h);
                    });
                }
            })
            .body(|body| {
                body.rows(ROW_HEIGHT, rows.len(), |mut tr| {
                    let record = rows[tr.index()];
                    for (i, cell) in full_row_cells(record).into_iter().enumerate() {
                        if i == BAND_COLUMN {
                            tr.col(|ui| band_cell(ui, record.band));
                        } else {
                            tr.col(|ui| {
                                ui.label(cell);
                            });
                        }
                    }
                });
            });
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::CityTable;
    use crate::data::model::tests::city;

    #[test]
    fn full_row_matches_headers() {
        let mut c = city("Oslo", "Norway", "Europe", 1_012_225, 6.6);
        c.monthly[0] = None;
        let table = CityTable::from_records(vec![c]);
        let cells = full_row_cells(&table.cities[0]);
        assert_eq!(cells.len(), FULL_HEADERS.len());
        assert_eq!(cells[4], "1,012,225");
        assert_eq!(cells[5], "6.6");
        assert_eq!(FULL_HEADERS[BAND_COLUMN], "Band");
        assert_eq!(cells[BAND_COLUMN], "WHO target");
        assert_eq!(cells[7], "n/a");
    }

    #[test]
    fn undefined_average_shows_unknown_band() {
        let mut c = city("Oslo", "Norway", "Europe", 1_012_225, 6.6);
        c.avg_2019 = None;
        let table = CityTable::from_records(vec![c]);
        let cells = full_row_cells(&table.cities[0]);
        assert_eq!(cells[5], "n/a");
        assert_eq!(cells[BAND_COLUMN], "Unknown");
    }
}
