use super::filter::{ContinentFilter, country_options, filter_by_continent, filter_by_country, resolve_country};
use super::model::{CityRecord, CityTable};
use super::reshape::{
    CitySeries, CountrySeries, LEGEND_CITIES, aggregate_annual, aggregate_monthly, reshape_annual,
    reshape_monthly,
};

// ---------------------------------------------------------------------------
// Series mode: the Aggregate / Annual checkbox pair
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeriesMode {
    /// Every city, 2019 months.
    #[default]
    CityMonthly,
    /// Country mean, 2019 months.
    CountryMonthly,
    /// Every city, 2017-2019 averages.
    CityAnnual,
    /// Country mean, 2017-2019 averages.
    CountryAnnual,
}

impl SeriesMode {
    pub fn from_toggles(aggregate: bool, annual: bool) -> Self {
        match (aggregate, annual) {
            (false, false) => SeriesMode::CityMonthly,
            (true, false) => SeriesMode::CountryMonthly,
            (false, true) => SeriesMode::CityAnnual,
            (true, true) => SeriesMode::CountryAnnual,
        }
    }

    pub fn aggregate(self) -> bool {
        matches!(self, SeriesMode::CountryMonthly | SeriesMode::CountryAnnual)
    }

    pub fn annual(self) -> bool {
        matches!(self, SeriesMode::CityAnnual | SeriesMode::CountryAnnual)
    }

    pub fn x_axis_label(self) -> &'static str {
        if self.annual() { "Year" } else { "Month (2019)" }
    }

    pub fn y_axis_label(self) -> &'static str {
        if self.aggregate() {
            "Mean PM2.5 Concentration"
        } else {
            "PM2.5 Concentration"
        }
    }
}

// ---------------------------------------------------------------------------
// View configuration and result
// ---------------------------------------------------------------------------

/// Everything the user selected that shapes the charts.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewConfig {
    pub continent: ContinentFilter,
    /// `None` or a stale value selects the default country.
    pub country: Option<String>,
    pub mode: SeriesMode,
    pub legend_cities: usize,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            continent: ContinentFilter::All,
            country: None,
            mode: SeriesMode::default(),
            legend_cities: LEGEND_CITIES,
        }
    }
}

/// The time series for the selected country, one variant per mode.
#[derive(Debug, Clone, PartialEq)]
pub enum SeriesView {
    CityMonthly(CitySeries),
    CountryMonthly(CountrySeries),
    CityAnnual(CitySeries),
    CountryAnnual(CountrySeries),
}

impl SeriesView {
    pub fn mode(&self) -> SeriesMode {
        match self {
            SeriesView::CityMonthly(_) => SeriesMode::CityMonthly,
            SeriesView::CountryMonthly(_) => SeriesMode::CountryMonthly,
            SeriesView::CityAnnual(_) => SeriesMode::CityAnnual,
            SeriesView::CountryAnnual(_) => SeriesMode::CountryAnnual,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            SeriesView::CityMonthly(s) | SeriesView::CityAnnual(s) => s.points.is_empty(),
            SeriesView::CountryMonthly(s) | SeriesView::CountryAnnual(s) => s.points.is_empty(),
        }
    }
}

/// One city on the continent scatter chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterPoint {
    pub city: String,
    pub country: String,
    pub continent: String,
    pub pop_2020: u64,
    pub pop_label: String,
    pub pm25: f64,
}

/// Population against 2019 average for every city with a defined average.
pub fn continent_scatter(subtable: &[&CityRecord]) -> Vec<ScatterPoint> {
    subtable
        .iter()
        .filter_map(|c| {
            Some(ScatterPoint {
                city: c.city.clone(),
                country: c.country.clone(),
                continent: c.continent.clone(),
                pop_2020: c.pop_2020,
                pop_label: c.pop_label.clone(),
                pm25: c.avg_2019.filter(|v| !v.is_nan())?,
            })
        })
        .collect()
}

/// Selection-dependent part of the dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub scatter: Vec<ScatterPoint>,
    /// Countries offered for the current continent, sorted.
    pub countries: Vec<String>,
    /// The resolved country selection.
    pub country: Option<String>,
    pub series: SeriesView,
}

/// Run the cascade and exactly one reshaper for the configured mode.
pub fn build_view(table: &CityTable, config: &ViewConfig) -> DashboardView {
    let continent_rows = filter_by_continent(table, &config.continent);
    let countries = country_options(&continent_rows);
    let country = resolve_country(&config.continent, &countries, config.country.as_deref());
    let country_rows = country
        .as_deref()
        .map(|c| filter_by_country(&continent_rows, c))
        .unwrap_or_default();

    let series = match config.mode {
        SeriesMode::CityMonthly => {
            SeriesView::CityMonthly(reshape_monthly(&country_rows, config.legend_cities))
        }
        SeriesMode::CountryMonthly => SeriesView::CountryMonthly(aggregate_monthly(&country_rows)),
        SeriesMode::CityAnnual => {
            SeriesView::CityAnnual(reshape_annual(&country_rows, config.legend_cities))
        }
        SeriesMode::CountryAnnual => SeriesView::CountryAnnual(aggregate_annual(&country_rows)),
    };

    log::debug!(
        "Built view for {} / {:?} ({:?}): {} countries, {} cities",
        config.continent,
        country,
        config.mode,
        countries.len(),
        country_rows.len()
    );

    DashboardView {
        scatter: continent_scatter(&continent_rows),
        countries,
        country,
        series,
    }
}
