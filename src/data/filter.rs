use std::collections::BTreeSet;
use std::fmt;

use super::model::{CityRecord, CityTable};

/// Label of the "no continent filter" choice.
pub const ALL_LABEL: &str = "All";

/// Index into the sorted country list selected by default when no continent
/// filter is applied.
pub const ALL_CONTINENTS_DEFAULT_INDEX: usize = 5;

// ---------------------------------------------------------------------------
// Continent filter
// ---------------------------------------------------------------------------

/// The continent dropdown value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ContinentFilter {
    #[default]
    All,
    Only(String),
}

impl ContinentFilter {
    pub fn matches(&self, continent: &str) -> bool {
        match self {
            ContinentFilter::All => true,
            ContinentFilter::Only(c) => c == continent,
        }
    }
}

impl fmt::Display for ContinentFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContinentFilter::All => write!(f, "{ALL_LABEL}"),
            ContinentFilter::Only(c) => write!(f, "{c}"),
        }
    }
}

/// `All` followed by every continent in first-appearance order.
pub fn continent_options(table: &CityTable) -> Vec<ContinentFilter> {
    std::iter::once(ContinentFilter::All)
        .chain(table.continents.iter().cloned().map(ContinentFilter::Only))
        .collect()
}

/// Rows of the table belonging to the selected continent.
pub fn filter_by_continent<'a>(table: &'a CityTable, filter: &ContinentFilter) -> Vec<&'a CityRecord> {
    table
        .cities
        .iter()
        .filter(|c| filter.matches(&c.continent))
        .collect()
}

// ---------------------------------------------------------------------------
// Country cascade
// ---------------------------------------------------------------------------

/// Sorted distinct countries of an (already continent-filtered) subtable.
pub fn country_options(subtable: &[&CityRecord]) -> Vec<String> {
    subtable
        .iter()
        .map(|c| c.country.as_str())
        .collect::<BTreeSet<&str>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Rows of the subtable belonging to one country.
pub fn filter_by_country<'a>(subtable: &[&'a CityRecord], country: &str) -> Vec<&'a CityRecord> {
    subtable
        .iter()
        .copied()
        .filter(|c| c.country == country)
        .collect()
}

/// Default country for a continent selection.
///
/// With no continent filter the sixth country of the sorted list is chosen;
/// otherwise the first.
///
/// A list shorter than six under "All" falls back to its first country rather
/// than leaving the selection empty.
pub fn default_country<'o>(filter: &ContinentFilter, options: &'o [String]) -> Option<&'o str> {
    let preferred = match filter {
        ContinentFilter::All => options.get(ALL_CONTINENTS_DEFAULT_INDEX),
        ContinentFilter::Only(_) => None,
    };
    preferred.or_else(|| options.first()).map(String::as_str)
}

/// Keep the current country when it is still offered, else fall back to the
/// default.
pub fn resolve_country(filter: &ContinentFilter, options: &[String], selected: Option<&str>) -> Option<String> {
    match selected {
        Some(country) if options.iter().any(|o| o == country) => Some(country.to_string()),
        _ => default_country(filter, options).map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::city;

    fn world() -> CityTable {
        CityTable::from_records(vec![
            city("Kabul", "Afghanistan", "Asia", 4_000_000, 50.0),
            city("Sydney", "Australia", "Oceania", 5_000_000, 8.0),
            city("Dhaka", "Bangladesh", "Asia", 21_000_000, 83.0),
            city("Cairo", "Egypt", "Africa", 21_000_000, 70.0),
            city("Paris", "France", "Europe", 11_000_000, 14.0),
            city("Berlin", "Germany", "Europe", 3_500_000, 11.0),
            city("Accra", "Ghana", "Africa", 2_500_000, 34.0),
            city("Melbourne", "Australia", "Oceania", 5_000_000, 7.0),
            city("Chittagong", "Bangladesh", "Asia", 5_000_000, 60.0),
        ])
    }

    #[test]
    fn continent_options_start_with_all() {
        let table = world();
        let labels: Vec<String> = continent_options(&table).iter().map(|c| c.to_string()).collect();
        assert_eq!(labels, vec!["All", "Asia", "Oceania", "Africa", "Europe"]);
    }

    #[test]
    fn countries_follow_the_continent_filter() {
        let table = world();
        let all = filter_by_continent(&table, &ContinentFilter::All);
        assert_eq!(all.len(), table.len());
        assert_eq!(
            country_options(&all),
            vec!["Afghanistan", "Australia", "Bangladesh", "Egypt", "France", "Germany", "Ghana"]
        );

        for option in continent_options(&table) {
            let subtable = filter_by_continent(&table, &option);
            let expected: BTreeSet<String> = table
                .cities
                .iter()
                .filter(|c| option.matches(&c.continent))
                .map(|c| c.country.clone())
                .collect();
            let actual: BTreeSet<String> = country_options(&subtable).into_iter().collect();
            assert_eq!(actual, expected, "continent {option}");
        }
    }

    #[test]
    fn country_filter_stays_inside_the_continent() {
        let table = world();
        let asia = filter_by_continent(&table, &ContinentFilter::Only("Asia".into()));
        let bangladesh = filter_by_country(&asia, "Bangladesh");
        let names: Vec<&str> = bangladesh.iter().map(|c| c.city.as_str()).collect();
        assert_eq!(names, vec!["Dhaka", "Chittagong"]);
        assert!(filter_by_country(&asia, "France").is_empty());
    }

    #[test]
    fn default_country_with_all_is_the_sixth() {
        let options: Vec<String> = ["A", "B", "C", "D", "E", "F", "G"].map(String::from).to_vec();
        assert_eq!(default_country(&ContinentFilter::All, &options), Some("F"));
        assert_eq!(
            default_country(&ContinentFilter::Only("X".into()), &options),
            Some("A")
        );
    }

    #[test]
    fn default_country_edge_cases() {
        let short: Vec<String> = ["B", "C"].map(String::from).to_vec();
        assert_eq!(default_country(&ContinentFilter::All, &short), Some("B"));
        assert_eq!(default_country(&ContinentFilter::All, &[]), None);
    }

    #[test]
    fn stale_selection_falls_back_to_default() {
        let table = world();
        let europe_filter = ContinentFilter::Only("Europe".into());
        let europe = filter_by_continent(&table, &europe_filter);
        let options = country_options(&europe);
        assert_eq!(
            resolve_country(&europe_filter, &options, Some("Germany")),
            Some("Germany".to_string())
        );
        assert_eq!(
            resolve_country(&europe_filter, &options, Some("Ghana")),
            Some("France".to_string())
        );
        assert_eq!(
            resolve_country(&europe_filter, &options, None),
            Some("France".to_string())
        );
    }
}
