use std::collections::BTreeMap;

use super::model::{CityRecord, Period};

/// Number of most populous cities named in a per-city chart legend.
pub const LEGEND_CITIES: usize = 5;

// ---------------------------------------------------------------------------
// Long-form rows
// ---------------------------------------------------------------------------

/// One (city, period) reading.
#[derive(Debug, Clone, PartialEq)]
pub struct CityPoint {
    pub city: String,
    pub country: String,
    pub continent: String,
    pub pop_label: String,
    pub period: Period,
    pub pm25: f64,
}

/// Per-city long-form series.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CitySeries {
    /// Every city of the subtable, most populous first.
    pub cities: Vec<String>,
    /// The most populous cities, used only to label the legend.
    pub legend_cities: Vec<String>,
    /// Period-major: all cities for the first period, then the next.
    pub points: Vec<CityPoint>,
}

impl CitySeries {
    pub fn points_for<'s>(&'s self, city: &'s str) -> impl Iterator<Item = &'s CityPoint> + 's {
        self.points.iter().filter(move |p| p.city == city)
    }
}

/// One (country, period) mean reading.
#[derive(Debug, Clone, PartialEq)]
pub struct CountryPoint {
    pub country: String,
    pub period: Period,
    pub pm25: f64,
}

/// Country-level long-form series.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CountrySeries {
    /// Sorted country groups.
    pub countries: Vec<String>,
    pub points: Vec<CountryPoint>,
}

// ---------------------------------------------------------------------------
// Per-city melt
// ---------------------------------------------------------------------------

/// Melt the twelve 2019 monthly columns into one row per (city, month).
pub fn reshape_monthly(subtable: &[&CityRecord], top_n: usize) -> CitySeries {
    melt_cities(subtable, top_n, &Period::MONTHLY)
}

/// Melt the 2017-2019 annual averages into one row per (city, year).
pub fn reshape_annual(subtable: &[&CityRecord], top_n: usize) -> CitySeries {
    melt_cities(subtable, top_n, &Period::ANNUAL)
}

fn melt_cities(subtable: &[&CityRecord], top_n: usize, periods: &[Period]) -> CitySeries {
    let mut ranked: Vec<&CityRecord> = subtable.to_vec();
    ranked.sort_by(|a, b| b.pop_2020.cmp(&a.pop_2020));

    let cities: Vec<String> = ranked.iter().map(|c| c.city.clone()).collect();
    let legend_cities = cities.iter().take(top_n).cloned().collect();

    let points = periods
        .iter()
        .flat_map(|&period| {
            ranked.iter().filter_map(move |c| {
                Some(CityPoint {
                    city: c.city.clone(),
                    country: c.country.clone(),
                    continent: c.continent.clone(),
                    pop_label: c.pop_label.clone(),
                    period,
                    pm25: c.pm25_for(period)?,
                })
            })
        })
        .collect();

    CitySeries {
        cities,
        legend_cities,
        points,
    }
}

// ---------------------------------------------------------------------------
// Country aggregation
// ---------------------------------------------------------------------------

/// Mean of every month across the cities of each country.
pub fn aggregate_monthly(subtable: &[&CityRecord]) -> CountrySeries {
    aggregate(subtable, &Period::MONTHLY)
}

/// Mean of every annual average across the cities of each country.
pub fn aggregate_annual(subtable: &[&CityRecord]) -> CountrySeries {
    aggregate(subtable, &Period::ANNUAL)
}

fn aggregate(subtable: &[&CityRecord], periods: &[Period]) -> CountrySeries {
    let mut groups: BTreeMap<&str, Vec<&CityRecord>> = BTreeMap::new();
    for &c in subtable {
        groups.entry(c.country.as_str()).or_default().push(c);
    }

    // Undefined readings are skipped; a period with none defined is dropped.
    let points = periods
        .iter()
        .flat_map(|&period| {
            groups.iter().filter_map(move |(country, cities)| {
                Some(CountryPoint {
                    country: country.to_string(),
                    period,
                    pm25: mean(cities.iter().filter_map(|c| c.pm25_for(period)))?,
                })
            })
        })
        .collect();

    CountrySeries {
        countries: groups.keys().map(|c| c.to_string()).collect(),
        points,
    }
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values.fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}
