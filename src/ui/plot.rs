use std::collections::BTreeMap;

use chrono::Month;
use eframe::egui::{Color32, Ui};
use egui_plot::{GridMark, Legend, Line, MarkerShape, Plot, PlotPoint, PlotPoints, Points};
use palette::Srgb;

use crate::color::{ColorMap, SeverityBand, to_color32};
use crate::data::map::MapRow;
use crate::data::reshape::{CitySeries, CountrySeries};
use crate::data::view::{SeriesMode, SeriesView};
use crate::format::format_pm25;
use crate::state::AppState;

/// Marker opacity on the map.
const MAP_ALPHA: u8 = 150;
const MIN_MARKER_RADIUS: f32 = 1.5;

// ---------------------------------------------------------------------------
// City map (population-sized, severity-coloured markers)
// ---------------------------------------------------------------------------

/// Markers sharing a band and a rounded radius, drawn as one series.
#[derive(Debug, Clone, PartialEq)]
struct MarkerGroup {
    band: SeverityBand,
    color: Srgb<u8>,
    radius: f32,
    coords: Vec<[f64; 2]>,
}

/// Radii are rounded to half a point so similar-sized cities share a series.
fn marker_groups(rows: &[MapRow], scale: f32) -> Vec<MarkerGroup> {
    let mut groups: BTreeMap<(SeverityBand, u32), (Srgb<u8>, Vec<[f64; 2]>)> = BTreeMap::new();
    for row in rows {
        let radius = ((row.pop_2020 as f32).sqrt() * scale).max(MIN_MARKER_RADIUS);
        let half_points = (radius * 2.0).round() as u32;
        groups
            .entry((row.band, half_points))
            .or_insert_with(|| (row.color, Vec::new()))
            .1
            .push([row.lon, row.lat]);
    }
    groups
        .into_iter()
        .map(|((band, half_points), (color, coords))| MarkerGroup {
            band,
            color,
            radius: half_points as f32 / 2.0,
            coords,
        })
        .collect()
}

fn map_tooltip(rows: &[MapRow], point: &PlotPoint) -> String {
    rows.iter()
        .find(|r| r.lon == point.x && r.lat == point.y)
        .map(|r| {
            format!(
                "City: {}\nCountry: {}\nPM2.5 Concentration: {}\n2020 Population: {}",
                r.city,
                r.country,
                format_pm25(Some(r.pm25)),
                r.pop_label
            )
        })
        .unwrap_or_default()
}

pub fn city_map(ui: &mut Ui, state: &AppState, height: f32) {
    let rows = &state.map_rows;
    let groups = marker_groups(rows, state.settings.map_marker_scale);

    Plot::new("city_map")
        .height(height)
        .data_aspect(1.0)
        .include_x(-180.0)
        .include_x(180.0)
        .include_y(-60.0)
        .include_y(75.0)
        .x_axis_label("Longitude")
        .y_axis_label("Latitude")
        .label_formatter(|_name, value: &PlotPoint| map_tooltip(rows, value))
        .show(ui, |plot_ui| {
            for group in groups {
                plot_ui.points(
                    Points::new(PlotPoints::from(group.coords))
                        .name(group.band.label())
                        .shape(MarkerShape::Circle)
                        .filled(true)
                        .radius(group.radius)
                        .color(to_color32(group.color, MAP_ALPHA)),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Continent scatter (population vs 2019 average)
// ---------------------------------------------------------------------------

pub fn continent_scatter(ui: &mut Ui, state: &AppState, height: f32) {
    let Some(view) = &state.view else {
        return;
    };
    let colors = &state.continent_colors;

    // The hovered coordinates are the exact data point, so look the city up.
    let lookup = view.scatter.clone();
    Plot::new("continent_scatter")
        .height(height)
        .legend(Legend::default())
        .x_axis_label("2020 Population")
        .y_axis_label("PM2.5 Concentration")
        .label_formatter(move |_name, value: &PlotPoint| {
            lookup
                .iter()
                .find(|p| p.pop_2020 as f64 == value.x && p.pm25 == value.y)
                .map(|p| {
                    format!(
                        "{}, {}\nPM2.5: {}\nPopulation: {}",
                        p.city,
                        p.country,
                        format_pm25(Some(p.pm25)),
                        p.pop_label
                    )
                })
                .unwrap_or_default()
        })
        .show(ui, |plot_ui| {
            let mut continents: Vec<&str> = Vec::new();
            for p in &view.scatter {
                if !continents.contains(&p.continent.as_str()) {
                    continents.push(&p.continent);
                }
            }
            for continent in continents {
                let points: PlotPoints = view
                    .scatter
                    .iter()
                    .filter(|p| p.continent == continent)
                    .map(|p| [p.pop_2020 as f64, p.pm25])
                    .collect();
                plot_ui.points(
                    Points::new(points)
                        .name(continent)
                        .shape(MarkerShape::Circle)
                        .filled(true)
                        .radius(3.5)
                        .color(colors.color_for(continent).gamma_multiply(0.6)),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Country time series (four variants)
// ---------------------------------------------------------------------------

pub fn country_series(ui: &mut Ui, state: &AppState, height: f32) {
    let Some(view) = &state.view else {
        return;
    };
    let mode = view.series.mode();
    if view.series.is_empty() {
        ui.label("No readings for this selection.");
        return;
    }

    let labels = hover_labels(&view.series);
    Plot::new("country_series")
        .height(height)
        .legend(Legend::default())
        .x_axis_label(mode.x_axis_label())
        .y_axis_label(mode.y_axis_label())
        .x_axis_formatter(move |mark: GridMark, _range| period_tick(mode, mark.value))
        .label_formatter(move |_name, value: &PlotPoint| {
            labels
                .iter()
                .find(|(x, y, _)| *x == value.x && *y == value.y)
                .map(|(_, _, label)| label.clone())
                .unwrap_or_default()
        })
        .show(ui, |plot_ui| match &view.series {
            SeriesView::CityMonthly(series) | SeriesView::CityAnnual(series) => {
                for (name, line, points, color) in city_lines(series) {
                    plot_ui.line(line.name(&name).color(color).width(1.5));
                    plot_ui.points(points.color(color).radius(2.5));
                }
            }
            SeriesView::CountryMonthly(series) | SeriesView::CountryAnnual(series) => {
                for (name, line, points) in country_lines(series) {
                    plot_ui.line(line.name(&name).color(Color32::LIGHT_BLUE).width(2.0));
                    plot_ui.points(points.color(Color32::LIGHT_BLUE).radius(3.0));
                }
            }
        });
}

/// Tooltip text keyed by exact plot coordinates.
fn hover_labels(series: &SeriesView) -> Vec<(f64, f64, String)> {
    match series {
        SeriesView::CityMonthly(s) | SeriesView::CityAnnual(s) => s
            .points
            .iter()
            .map(|p| {
                let label = format!(
                    "City: {}\nPopulation: {}\n{}: {}",
                    p.city,
                    p.pop_label,
                    p.period,
                    format_pm25(Some(p.pm25))
                );
                (p.period.axis_value(), p.pm25, label)
            })
            .collect(),
        SeriesView::CountryMonthly(s) | SeriesView::CountryAnnual(s) => s
            .points
            .iter()
            .map(|p| {
                let label = format!(
                    "{}, {}\nMean PM2.5 Concentration: {}",
                    p.country,
                    p.period,
                    format_pm25(Some(p.pm25))
                );
                (p.period.axis_value(), p.pm25, label)
            })
            .collect(),
    }
}

/// One line per city; only legend cities get a name so the legend stays short.
fn city_lines(series: &CitySeries) -> Vec<(String, Line, Points, Color32)> {
    let colors = ColorMap::new(series.cities.iter().map(String::as_str));
    series
        .cities
        .iter()
        .map(|city| {
            let coords: Vec<[f64; 2]> = series
                .points_for(city)
                .map(|p| [p.period.axis_value(), p.pm25])
                .collect();
            let name = if series.legend_cities.contains(city) {
                city.clone()
            } else {
                String::new()
            };
            (
                name,
                Line::new(PlotPoints::from(coords.clone())),
                Points::new(PlotPoints::from(coords)),
                colors.color_for(city),
            )
        })
        .collect()
}

fn country_lines(series: &CountrySeries) -> Vec<(String, Line, Points)> {
    series
        .countries
        .iter()
        .map(|country| {
            let coords: Vec<[f64; 2]> = series
                .points
                .iter()
                .filter(|p| &p.country == country)
                .map(|p| [p.period.axis_value(), p.pm25])
                .collect();
            (
                country.clone(),
                Line::new(PlotPoints::from(coords.clone())),
                Points::new(PlotPoints::from(coords)),
            )
        })
        .collect()
}

/// Axis tick label: month abbreviation or year, blank between periods.
fn period_tick(mode: SeriesMode, value: f64) -> String {
    if value.fract() != 0.0 {
        return String::new();
    }
    if mode.annual() {
        return format!("{value:.0}");
    }
    u8::try_from(value as i64)
        .ok()
        .and_then(|n| Month::try_from(n).ok())
        .map(|m| m.name()[..3].to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_ticks() {
        assert_eq!(period_tick(SeriesMode::CityMonthly, 1.0), "Jan");
        assert_eq!(period_tick(SeriesMode::CountryMonthly, 12.0), "Dec");
        assert_eq!(period_tick(SeriesMode::CityMonthly, 13.0), "");
        assert_eq!(period_tick(SeriesMode::CityMonthly, 1.5), "");
    }

    fn map_row(city: &str, lon: f64, pop_2020: u64, band: SeverityBand) -> MapRow {
        MapRow {
            city: city.to_string(),
            country: "Utopia".to_string(),
            lat: 10.0,
            lon,
            pop_2020,
            pop_label: pop_2020.to_string(),
            pm25: 20.0,
            band,
            color: band.rgb(),
        }
    }

    #[test]
    fn markers_group_by_band_and_size() {
        let rows = vec![
            map_row("A", 1.0, 1_000_000, SeverityBand::Moderate),
            map_row("B", 2.0, 1_000_000, SeverityBand::Moderate),
            map_row("C", 3.0, 1_000_000, SeverityBand::Hazardous),
            map_row("D", 4.0, 9_000_000, SeverityBand::Moderate),
        ];
        // sqrt(1e6) * 0.003 = 3.0, sqrt(9e6) * 0.003 = 9.0
        let groups = marker_groups(&rows, 0.003);
        assert_eq!(groups.len(), 3);
        assert_eq!(groups[0].band, SeverityBand::Moderate);
        assert_eq!(groups[0].radius, 3.0);
        assert_eq!(groups[0].coords, vec![[1.0, 10.0], [2.0, 10.0]]);
        assert_eq!(groups[1].radius, 9.0);
        assert_eq!(groups[2].band, SeverityBand::Hazardous);
        assert_eq!(groups[2].color, SeverityBand::Hazardous.rgb());
    }

    #[test]
    fn small_cities_get_the_minimum_radius() {
        let rows = vec![map_row("A", 1.0, 4, SeverityBand::Good)];
        assert_eq!(marker_groups(&rows, 0.003)[0].radius, MIN_MARKER_RADIUS);
    }

    #[test]
    fn map_tooltip_finds_the_hovered_city() {
        let rows = vec![
            map_row("A", 1.0, 1_000, SeverityBand::Good),
            map_row("B", 2.0, 2_000, SeverityBand::Good),
        ];
        let text = map_tooltip(&rows, &PlotPoint::new(2.0, 10.0));
        assert!(text.starts_with("City: B\n"));
        assert!(text.contains("PM2.5 Concentration: 20.0"));
        assert_eq!(map_tooltip(&rows, &PlotPoint::new(5.0, 5.0)), "");
    }

    #[test]
    fn year_ticks() {
        assert_eq!(period_tick(SeriesMode::CityAnnual, 2018.0), "2018");
        assert_eq!(period_tick(SeriesMode::CountryAnnual, 2018.5), "");
    }
}
