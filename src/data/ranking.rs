use std::cmp::Ordering;

use super::model::{CityRecord, CityTable};
use crate::color::SeverityBand;
use crate::format::format_pm25;

/// Default length of the ranking tables.
pub const RANKING_LEN: usize = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankColumn {
    Avg2019,
    Population,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// One line of a ranking table.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedRow {
    /// 1-based display rank.
    pub rank: usize,
    pub city: String,
    pub country: String,
    pub pop_2020: u64,
    pub pop_label: String,
    pub avg_2019: Option<f64>,
    /// `avg_2019` as shown in the table, a placeholder when undefined.
    pub pm25_label: String,
    /// Severity band of `avg_2019`, `None` when undefined.
    pub band: Option<SeverityBand>,
}

/// First `n` cities ordered by `column`.
///
/// The sort is stable, so equal keys keep load order. Undefined readings sort
/// last in either direction.
pub fn top_n_by(table: &CityTable, column: RankColumn, n: usize, order: SortOrder) -> Vec<RankedRow> {
    let mut ranked: Vec<&CityRecord> = table.cities.iter().collect();
    ranked.sort_by(|a, b| compare(a, b, column, order));

    ranked
        .into_iter()
        .take(n)
        .enumerate()
        .map(|(i, c)| RankedRow {
            rank: i + 1,
            city: c.city.clone(),
            country: c.country.clone(),
            pop_2020: c.pop_2020,
            pop_label: c.pop_label.clone(),
            avg_2019: c.avg_2019,
            pm25_label: format_pm25(c.avg_2019),
            band: c.band,
        })
        .collect()
}

fn compare(a: &CityRecord, b: &CityRecord, column: RankColumn, order: SortOrder) -> Ordering {
    let directed = |ord: Ordering| match order {
        SortOrder::Ascending => ord,
        SortOrder::Descending => ord.reverse(),
    };
    match column {
        RankColumn::Population => directed(a.pop_2020.cmp(&b.pop_2020)),
        RankColumn::Avg2019 => match (a.avg_2019, b.avg_2019) {
            (Some(x), Some(y)) => directed(x.total_cmp(&y)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        },
    }
}

pub fn highest_pm25(table: &CityTable, n: usize) -> Vec<RankedRow> {
    top_n_by(table, RankColumn::Avg2019, n, SortOrder::Descending)
}

pub fn lowest_pm25(table: &CityTable, n: usize) -> Vec<RankedRow> {
    top_n_by(table, RankColumn::Avg2019, n, SortOrder::Ascending)
}

pub fn most_populous(table: &CityTable, n: usize) -> Vec<RankedRow> {
    top_n_by(table, RankColumn::Population, n, SortOrder::Descending)
}

/// The three ranking tables shown under the charts.
#[derive(Debug, Clone, Default)]
pub struct Rankings {
    pub highest_pm25: Vec<RankedRow>,
    pub lowest_pm25: Vec<RankedRow>,
    pub most_populous: Vec<RankedRow>,
}

impl Rankings {
    pub fn build(table: &CityTable, n: usize) -> Self {
        Rankings {
            highest_pm25: highest_pm25(table, n),
            lowest_pm25: lowest_pm25(table, n),
            most_populous: most_populous(table, n),
        }
    }
}

/// Every city sorted by name, for the full data table.
pub fn full_table(table: &CityTable) -> Vec<&CityRecord> {
    let mut rows: Vec<&CityRecord> = table.cities.iter().collect();
    rows.sort_by(|a, b| a.city.cmp(&b.city));
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::city;

    fn names(rows: &[RankedRow]) -> Vec<&str> {
        rows.iter().map(|r| r.city.as_str()).collect()
    }

    fn twenty_cities() -> CityTable {
        CityTable::from_records(
            (0..20)
                .map(|i| {
                    let pm25 = ((i * 7) % 20) as f64 * 3.5 + 1.0;
                    city(&format!("C{i:02}"), "Utopia", "Testlandia", 1000 + i, pm25)
                })
                .collect(),
        )
    }

    #[test]
    fn highest_fifteen_of_twenty() {
        let rows = highest_pm25(&twenty_cities(), RANKING_LEN);
        assert_eq!(rows.len(), 15);
        assert_eq!(rows.iter().map(|r| r.rank).collect::<Vec<_>>(), (1..=15).collect::<Vec<_>>());
        for pair in rows.windows(2) {
            assert!(pair[0].avg_2019.unwrap() > pair[1].avg_2019.unwrap());
        }
    }

    #[test]
    fn short_table_returns_everything() {
        let rows = lowest_pm25(&twenty_cities(), 50);
        assert_eq!(rows.len(), 20);
        assert_eq!(rows[0].avg_2019, Some(1.0));
    }

    #[test]
    fn three_city_scenario() {
        let table = CityTable::from_records(vec![
            city("X", "Utopia", "Testlandia", 300, 40.0),
            city("Y", "Utopia", "Testlandia", 100, 8.0),
            city("Z", "Utopia", "Testlandia", 500, 60.0),
        ]);
        assert_eq!(names(&most_populous(&table, 15)), vec!["Z", "X", "Y"]);
        assert_eq!(names(&highest_pm25(&table, 15)), vec!["Z", "X", "Y"]);
        assert_eq!(names(&lowest_pm25(&table, 15)), vec!["Y", "X", "Z"]);
    }

    #[test]
    fn ties_keep_load_order() {
        let table = CityTable::from_records(vec![
            city("A", "Utopia", "Testlandia", 10, 20.0),
            city("B", "Utopia", "Testlandia", 10, 20.0),
            city("C", "Utopia", "Testlandia", 10, 20.0),
        ]);
        assert_eq!(names(&highest_pm25(&table, 3)), vec!["A", "B", "C"]);
        assert_eq!(names(&lowest_pm25(&table, 3)), vec!["A", "B", "C"]);
        assert_eq!(names(&most_populous(&table, 3)), vec!["A", "B", "C"]);
    }

    #[test]
    fn undefined_readings_sort_last_with_placeholder() {
        let mut unknown = city("U", "Utopia", "Testlandia", 10, 0.0);
        unknown.avg_2019 = None;
        let table = CityTable::from_records(vec![
            unknown,
            city("A", "Utopia", "Testlandia", 20, 5.0),
            city("B", "Utopia", "Testlandia", 30, 50.0),
        ]);
        let high = highest_pm25(&table, 3);
        assert_eq!(names(&high), vec!["B", "A", "U"]);
        assert_eq!(high[2].pm25_label, "n/a");
        assert_eq!(high[2].band, None);
        assert_eq!(high[0].band, Some(SeverityBand::UnhealthySensitive));
        assert_eq!(names(&lowest_pm25(&table, 3)), vec!["A", "B", "U"]);
    }

    #[test]
    fn full_table_is_sorted_by_city() {
        let table = CityTable::from_records(vec![
            city("Lima", "Peru", "South America", 1, 1.0),
            city("Accra", "Ghana", "Africa", 1, 1.0),
            city("Delhi", "India", "Asia", 1, 1.0),
        ]);
        let rows: Vec<&str> = full_table(&table).iter().map(|c| c.city.as_str()).collect();
        assert_eq!(rows, vec!["Accra", "Delhi", "Lima"]);
    }
}
