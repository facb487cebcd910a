use std::collections::HashSet;
use std::fmt;

use chrono::{Month, NaiveDate};

use crate::color::SeverityBand;
use crate::format::format_population;

// ---------------------------------------------------------------------------
// Schema
// ---------------------------------------------------------------------------

/// Every column the input file must carry, in the order the CSV is written.
pub const REQUIRED_COLUMNS: [&str; 23] = [
    "city", "country", "iso3", "continent", "pop_2020", "jan", "feb", "mar", "apr", "may", "jun",
    "jul", "aug", "sep", "oct", "nov", "dec", "avg_2017", "avg_2018", "avg_2019", "city_alt",
    "lat", "lon",
];

/// Column names of the twelve monthly PM2.5 readings, January first.
pub const MONTH_COLUMNS: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

/// The calendar year the monthly readings belong to.
pub const MONTHLY_YEAR: i32 = 2019;

/// Years covered by the annual averages.
pub const ANNUAL_YEARS: [i32; 3] = [2017, 2018, 2019];

// ---------------------------------------------------------------------------
// Period – one measurement occasion on the time axis
// ---------------------------------------------------------------------------

/// A measurement occasion: a month of 2019 or a whole year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Period {
    Month(Month),
    Year(i32),
}

impl Period {
    pub const MONTHLY: [Period; 12] = [
        Period::Month(Month::January),
        Period::Month(Month::February),
        Period::Month(Month::March),
        Period::Month(Month::April),
        Period::Month(Month::May),
        Period::Month(Month::June),
        Period::Month(Month::July),
        Period::Month(Month::August),
        Period::Month(Month::September),
        Period::Month(Month::October),
        Period::Month(Month::November),
        Period::Month(Month::December),
    ];

    pub const ANNUAL: [Period; 3] = [
        Period::Year(ANNUAL_YEARS[0]),
        Period::Year(ANNUAL_YEARS[1]),
        Period::Year(ANNUAL_YEARS[2]),
    ];

    /// Calendar marker: the first day of the month (in 2019) or January 1st
    /// of the year.
    pub fn marker(self) -> NaiveDate {
        let date = match self {
            Period::Month(m) => NaiveDate::from_ymd_opt(MONTHLY_YEAR, m.number_from_month(), 1),
            Period::Year(y) => NaiveDate::from_ymd_opt(y, 1, 1),
        };
        date.unwrap_or(NaiveDate::MIN)
    }

    /// Position on a numeric plot axis (month number or year).
    pub fn axis_value(self) -> f64 {
        match self {
            Period::Month(m) => f64::from(m.number_from_month()),
            Period::Year(y) => f64::from(y),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Period::Month(_) => write!(f, "{}", self.marker().format("%b %Y")),
            Period::Year(y) => write!(f, "{y}"),
        }
    }
}

// ---------------------------------------------------------------------------
// CityRecord – one row of the input table
// ---------------------------------------------------------------------------

/// A single city (one row of the source table).
///
/// PM2.5 readings are `None` where the source cell was empty or NaN.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CityRecord {
    pub city: String,
    pub country: String,
    pub iso3: String,
    pub continent: String,
    pub city_alt: String,
    pub lat: f64,
    pub lon: f64,
    pub pop_2020: u64,
    /// January..December 2019.
    pub monthly: [Option<f64>; 12],
    pub avg_2017: Option<f64>,
    pub avg_2018: Option<f64>,
    pub avg_2019: Option<f64>,
    /// Display columns filled in once by [`CityTable::from_records`].
    pub pop_label: String,
    pub band: Option<SeverityBand>,
}

impl CityRecord {
    /// The PM2.5 reading for one period, if defined.
    pub fn pm25_for(&self, period: Period) -> Option<f64> {
        let value = match period {
            Period::Month(m) => self.monthly[m.number_from_month() as usize - 1],
            Period::Year(2017) => self.avg_2017,
            Period::Year(2018) => self.avg_2018,
            Period::Year(2019) => self.avg_2019,
            Period::Year(_) => None,
        };
        value.filter(|v| !v.is_nan())
    }
}

// ---------------------------------------------------------------------------
// CityTable – the complete loaded table
// ---------------------------------------------------------------------------

/// The full loaded table. Immutable once built.
#[derive(Debug, Clone, Default)]
pub struct CityTable {
    /// All cities in load order.
    pub cities: Vec<CityRecord>,
    /// Distinct continents in first-appearance order.
    pub continents: Vec<String>,
}

impl CityTable {
    /// Build the table, appending the display columns to every row.
    pub fn from_records(mut cities: Vec<CityRecord>) -> Self {
        let mut seen_cities: HashSet<String> = HashSet::new();
        let mut continents: Vec<String> = Vec::new();

        for city in &mut cities {
            city.pop_label = format_population(city.pop_2020);
            city.band = city.avg_2019.and_then(SeverityBand::from_pm25);

            if !seen_cities.insert(city.city.clone()) {
                log::warn!("Duplicate city '{}' ({})", city.city, city.country);
            }
            if !continents.contains(&city.continent) {
                continents.push(city.continent.clone());
            }
        }

        CityTable { cities, continents }
    }

    /// Number of cities.
    pub fn len(&self) -> usize {
        self.cities.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Row builder shared by the data-layer tests.
    pub(crate) fn city(name: &str, country: &str, continent: &str, pop: u64, avg_2019: f64) -> CityRecord {
        CityRecord {
            city: name.to_string(),
            country: country.to_string(),
            iso3: country.chars().take(3).collect::<String>().to_uppercase(),
            continent: continent.to_string(),
            pop_2020: pop,
            monthly: [Some(avg_2019); 12],
            avg_2017: Some(avg_2019),
            avg_2018: Some(avg_2019),
            avg_2019: Some(avg_2019),
            ..Default::default()
        }
    }

    #[test]
    fn month_markers_fall_on_first_day_of_2019() {
        let markers: Vec<NaiveDate> = Period::MONTHLY.iter().map(|p| p.marker()).collect();
        assert_eq!(markers[0], NaiveDate::from_ymd_opt(2019, 1, 1).unwrap());
        assert_eq!(markers[11], NaiveDate::from_ymd_opt(2019, 12, 1).unwrap());
        let unique: HashSet<NaiveDate> = markers.into_iter().collect();
        assert_eq!(unique.len(), 12);
    }

    #[test]
    fn year_markers_and_labels() {
        assert_eq!(
            Period::Year(2017).marker(),
            NaiveDate::from_ymd_opt(2017, 1, 1).unwrap()
        );
        assert_eq!(Period::Year(2018).to_string(), "2018");
        assert_eq!(Period::Month(Month::March).to_string(), "Mar 2019");
    }

    #[test]
    fn pm25_for_reads_the_matching_column() {
        let mut c = city("X", "Utopia", "Testlandia", 10, 40.0);
        c.monthly[2] = Some(7.5);
        c.avg_2017 = None;
        assert_eq!(c.pm25_for(Period::Month(Month::March)), Some(7.5));
        assert_eq!(c.pm25_for(Period::Year(2017)), None);
        assert_eq!(c.pm25_for(Period::Year(2019)), Some(40.0));
        assert_eq!(c.pm25_for(Period::Year(2020)), None);
    }

    #[test]
    fn nan_readings_are_undefined() {
        let mut c = city("X", "Utopia", "Testlandia", 10, 40.0);
        c.monthly[0] = Some(f64::NAN);
        assert_eq!(c.pm25_for(Period::Month(Month::January)), None);
    }

    #[test]
    fn from_records_appends_display_columns() {
        let table = CityTable::from_records(vec![
            city("X", "Utopia", "Testlandia", 1_234_567, 40.0),
            city("Y", "Erewhon", "Nowhere", 100, 8.0),
            city("Z", "Utopia", "Testlandia", 500, 60.0),
        ]);
        assert_eq!(table.cities[0].pop_label, "1,234,567");
        assert_eq!(table.cities[1].band, Some(SeverityBand::WhoTarget));
        assert_eq!(table.continents, vec!["Testlandia", "Nowhere"]);
        assert_eq!(table.len(), 3);
    }
}
