use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, StringArray, UInt64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

const MONTHS: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

/// (city, country, iso3, continent, lat, lon, population, base PM2.5)
type CityRow = (&'static str, &'static str, &'static str, &'static str, f64, f64, u64, f64);

const CITIES: &[CityRow] = &[
    ("Kabul", "Afghanistan", "AFG", "Asia", 34.53, 69.17, 4_221_532, 58.8),
    ("Buenos Aires", "Argentina", "ARG", "South America", -34.61, -58.38, 15_153_729, 14.2),
    ("Sydney", "Australia", "AUS", "Oceania", -33.87, 151.21, 4_925_987, 9.1),
    ("Melbourne", "Australia", "AUS", "Oceania", -37.81, 144.96, 4_967_733, 7.6),
    ("Brisbane", "Australia", "AUS", "Oceania", -27.47, 153.03, 2_406_182, 6.8),
    ("Perth", "Australia", "AUS", "Oceania", -31.95, 115.86, 2_042_000, 7.9),
    ("Adelaide", "Australia", "AUS", "Oceania", -34.93, 138.60, 1_336_000, 6.2),
    ("Vienna", "Austria", "AUT", "Europe", 48.21, 16.37, 1_914_939, 13.5),
    ("Dhaka", "Bangladesh", "BGD", "Asia", 23.81, 90.41, 21_005_860, 83.3),
    ("Chittagong", "Bangladesh", "BGD", "Asia", 22.36, 91.78, 5_019_639, 61.4),
    ("Sao Paulo", "Brazil", "BRA", "South America", -23.55, -46.63, 22_043_028, 17.2),
    ("Toronto", "Canada", "CAN", "North America", 43.65, -79.38, 6_196_731, 7.4),
    ("Beijing", "China", "CHN", "Asia", 39.90, 116.41, 20_462_610, 42.1),
    ("Cairo", "Egypt", "EGY", "Africa", 30.04, 31.24, 20_900_604, 70.1),
    ("Paris", "France", "FRA", "Europe", 48.86, 2.35, 11_017_230, 14.7),
    ("Berlin", "Germany", "DEU", "Europe", 52.52, 13.40, 3_562_166, 11.8),
    ("Accra", "Ghana", "GHA", "Africa", 5.60, -0.19, 2_514_005, 34.2),
    ("Delhi", "India", "IND", "Asia", 28.66, 77.23, 30_290_936, 98.6),
    ("Lima", "Peru", "PER", "South America", -12.05, -77.04, 10_719_188, 23.7),
    ("Lagos", "Nigeria", "NGA", "Africa", 6.52, 3.38, 14_368_332, 44.9),
    ("Oslo", "Norway", "NOR", "Europe", 59.91, 10.75, 1_041_377, 6.6),
    ("Mexico City", "Mexico", "MEX", "North America", 19.43, -99.13, 21_782_378, 20.5),
];

/// Minimal deterministic PRNG (splitmix64).
struct SplitMix {
    state: u64,
}

impl SplitMix {
    fn new(seed: u64) -> Self {
        SplitMix { state: seed }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Uniform in `[0, 1)`.
    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }
}

/// One synthetic row: 12 monthly readings (with the odd gap) and the three
/// annual averages.
struct Readings {
    monthly: [Option<f64>; 12],
    annual: [Option<f64>; 3],
}

fn readings(base: f64, lat: f64, rng: &mut SplitMix) -> Readings {
    // Winter peak: January in the north, July in the south.
    let peak_month = if lat >= 0.0 { 0.0 } else { 6.0 };
    let mut monthly = [None; 12];
    for (m, slot) in monthly.iter_mut().enumerate() {
        if rng.next_f64() < 0.04 {
            continue;
        }
        let phase = (m as f64 - peak_month) / 12.0 * std::f64::consts::TAU;
        let seasonal = 1.0 + 0.35 * phase.cos();
        let noise = 0.9 + 0.2 * rng.next_f64();
        *slot = Some(round1(base * seasonal * noise));
    }
    let annual = [1.12, 1.05, 1.0].map(|trend| {
        if rng.next_f64() < 0.05 {
            None
        } else {
            Some(round1(base * trend * (0.95 + 0.1 * rng.next_f64())))
        }
    });
    Readings { monthly, annual }
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

fn cell(v: Option<f64>) -> String {
    v.map(|x| x.to_string()).unwrap_or_default()
}

fn text_column(f: impl Fn(&CityRow) -> &'static str) -> ArrayRef {
    Arc::new(StringArray::from(CITIES.iter().map(f).collect::<Vec<_>>()))
}

fn main() -> anyhow::Result<()> {
    let mut rng = SplitMix::new(42);
    let rows: Vec<Readings> = CITIES
        .iter()
        .map(|&(_, _, _, _, lat, _, _, base)| readings(base, lat, &mut rng))
        .collect();

    // ---- CSV ----
    let csv_path = "final_data.csv";
    let mut writer = csv::Writer::from_path(csv_path)?;
    let mut header = vec!["city", "country", "iso3", "continent", "pop_2020"];
    header.extend(MONTHS);
    header.extend(["avg_2017", "avg_2018", "avg_2019", "city_alt", "lat", "lon"]);
    writer.write_record(&header)?;

    for (&(city, country, iso3, continent, lat, lon, pop, _), r) in CITIES.iter().zip(&rows) {
        let mut record = vec![
            city.to_string(),
            country.to_string(),
            iso3.to_string(),
            continent.to_string(),
            pop.to_string(),
        ];
        record.extend(r.monthly.iter().map(|m| cell(*m)));
        record.extend(r.annual.iter().map(|a| cell(*a)));
        record.extend([String::new(), lat.to_string(), lon.to_string()]);
        writer.write_record(&record)?;
    }
    writer.flush()?;

    // ---- Parquet ----
    let mut fields = vec![
        Field::new("city", DataType::Utf8, false),
        Field::new("country", DataType::Utf8, false),
        Field::new("iso3", DataType::Utf8, false),
        Field::new("continent", DataType::Utf8, false),
        Field::new("pop_2020", DataType::UInt64, false),
    ];
    let mut columns: Vec<ArrayRef> = vec![
        text_column(|c| c.0),
        text_column(|c| c.1),
        text_column(|c| c.2),
        text_column(|c| c.3),
        Arc::new(UInt64Array::from(CITIES.iter().map(|c| c.6).collect::<Vec<_>>())) as ArrayRef,
    ];
    for (m, name) in MONTHS.iter().enumerate() {
        fields.push(Field::new(*name, DataType::Float64, true));
        columns.push(Arc::new(Float64Array::from(
            rows.iter().map(|r| r.monthly[m]).collect::<Vec<_>>(),
        )));
    }
    for (y, name) in ["avg_2017", "avg_2018", "avg_2019"].iter().enumerate() {
        fields.push(Field::new(*name, DataType::Float64, true));
        columns.push(Arc::new(Float64Array::from(
            rows.iter().map(|r| r.annual[y]).collect::<Vec<_>>(),
        )));
    }
    fields.push(Field::new("city_alt", DataType::Utf8, true));
    columns.push(Arc::new(StringArray::from(vec![None::<&str>; CITIES.len()])));
    fields.push(Field::new("lat", DataType::Float64, false));
    columns.push(Arc::new(Float64Array::from(CITIES.iter().map(|c| c.4).collect::<Vec<_>>())));
    fields.push(Field::new("lon", DataType::Float64, false));
    columns.push(Arc::new(Float64Array::from(CITIES.iter().map(|c| c.5).collect::<Vec<_>>())));

    let schema = Arc::new(Schema::new(fields));
    let batch = RecordBatch::try_new(schema.clone(), columns)?;

    let parquet_path = "sample_cities.parquet";
    let file = std::fs::File::create(parquet_path)?;
    let mut parquet_writer = ArrowWriter::try_new(file, schema, None)?;
    parquet_writer.write(&batch)?;
    parquet_writer.close()?;

    println!(
        "Wrote {} cities to {csv_path} and {parquet_path}",
        CITIES.len()
    );
    Ok(())
}
