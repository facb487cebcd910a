use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, bail};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{DataType, Float32Type, Float64Type, Int32Type, Int64Type, UInt32Type, UInt64Type};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::error::DataError;
use super::model::{CityRecord, CityTable, MONTH_COLUMNS, REQUIRED_COLUMNS};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a city table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with every column in [`REQUIRED_COLUMNS`]
/// * `.json`    – `[{ "city": "...", "pop_2020": 123, ... }, ...]`
/// * `.parquet` – one column per field, nulls for missing readings
pub fn load_file(path: &Path) -> Result<CityTable> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "csv" => {
            let file = std::fs::File::open(path).context("opening CSV")?;
            read_csv(file)?
        }
        "json" => {
            let text = std::fs::read_to_string(path).context("reading JSON file")?;
            parse_json(&text)?
        }
        "parquet" | "pq" => load_parquet(path)?,
        other => bail!("Unsupported file extension: .{other}"),
    };

    log::info!(
        "Loaded {} cities across {} continents from {}",
        table.len(),
        table.continents.len(),
        path.display()
    );
    Ok(table)
}

// ---------------------------------------------------------------------------
// Cell values and row assembly (shared by every format)
// ---------------------------------------------------------------------------

/// A raw cell as it comes out of a source file.
#[derive(Debug, Clone, PartialEq)]
enum CellValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Null,
}

impl CellValue {
    fn raw(&self) -> String {
        match self {
            CellValue::Text(s) => s.clone(),
            CellValue::Integer(i) => i.to_string(),
            CellValue::Float(v) => v.to_string(),
            CellValue::Null => String::new(),
        }
    }
}

fn text(cell: CellValue) -> String {
    match cell {
        CellValue::Text(s) => s.trim().to_string(),
        other => other.raw(),
    }
}

/// Empty, null and NaN cells are undefined readings.
fn optional_f64(row: usize, column: &str, cell: CellValue) -> Result<Option<f64>, DataError> {
    let value = match cell {
        CellValue::Null => None,
        CellValue::Integer(i) => Some(i as f64),
        CellValue::Float(v) => Some(v),
        CellValue::Text(s) => {
            let t = s.trim();
            if t.is_empty() || t.eq_ignore_ascii_case("nan") {
                None
            } else {
                Some(
                    t.parse::<f64>()
                        .map_err(|_| DataError::invalid(row, column, t))?,
                )
            }
        }
    };
    Ok(value.filter(|v| !v.is_nan()))
}

fn required_f64(row: usize, column: &str, cell: CellValue) -> Result<f64, DataError> {
    let raw = cell.raw();
    optional_f64(row, column, cell)?.ok_or_else(|| DataError::invalid(row, column, raw))
}

fn population(row: usize, column: &str, cell: CellValue) -> Result<u64, DataError> {
    let raw = cell.raw();
    match cell {
        CellValue::Integer(i) => u64::try_from(i).map_err(|_| DataError::invalid(row, column, raw)),
        CellValue::Text(ref s) if s.trim().parse::<u64>().is_ok() => {
            Ok(s.trim().parse::<u64>().unwrap_or_default())
        }
        // Whole-number floats such as `"300000.0"` are accepted.
        other => match optional_f64(row, column, other)? {
            Some(v) if v >= 0.0 && v.fract() == 0.0 => Ok(v as u64),
            _ => Err(DataError::invalid(row, column, raw.trim())),
        },
    }
}

/// Assemble one [`CityRecord`] from a cell lookup by column name.
fn build_record(row: usize, mut cell: impl FnMut(&str) -> CellValue) -> Result<CityRecord, DataError> {
    let mut monthly = [None; 12];
    for (slot, column) in monthly.iter_mut().zip(MONTH_COLUMNS) {
        *slot = optional_f64(row, column, cell(column))?;
    }

    Ok(CityRecord {
        city: text(cell("city")),
        country: text(cell("country")),
        iso3: text(cell("iso3")),
        continent: text(cell("continent")),
        city_alt: text(cell("city_alt")),
        lat: required_f64(row, "lat", cell("lat"))?,
        lon: required_f64(row, "lon", cell("lon"))?,
        pop_2020: population(row, "pop_2020", cell("pop_2020"))?,
        monthly,
        avg_2017: optional_f64(row, "avg_2017", cell("avg_2017"))?,
        avg_2018: optional_f64(row, "avg_2018", cell("avg_2018"))?,
        avg_2019: optional_f64(row, "avg_2019", cell("avg_2019"))?,
        ..Default::default()
    })
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Read a CSV city table. Column order is free; every required column must
/// be present in the header row.
pub fn read_csv<R: Read>(source: R) -> Result<CityTable> {
    let mut reader = csv::Reader::from_reader(source);
    let headers = reader.headers().context("reading CSV headers")?.clone();

    let positions: HashMap<&str, usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| (h.trim(), i))
        .collect();
    if let Some(missing) = REQUIRED_COLUMNS.iter().find(|c| !positions.contains_key(*c)) {
        return Err(DataError::missing(missing).into());
    }

    let mut cities = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        let city = build_record(row_no, |column| {
            positions
                .get(column)
                .and_then(|&i| record.get(i))
                .map_or(CellValue::Null, |s| CellValue::Text(s.to_string()))
        })?;
        cities.push(city);
    }

    Ok(CityTable::from_records(cities))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "city": "Delhi", "country": "India", "pop_2020": 30290936, "jan": 226.8, ... },
///   ...
/// ]
/// ```
pub fn parse_json(text: &str) -> Result<CityTable> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;
    let records = root.as_array().context("Expected top-level JSON array")?;
    // An empty array carries no columns at all.
    if records.is_empty() {
        return Err(DataError::missing(REQUIRED_COLUMNS[0]).into());
    }

    let mut cities = Vec::with_capacity(records.len());
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;

        if let Some(missing) = REQUIRED_COLUMNS.iter().find(|c| !obj.contains_key(**c)) {
            return Err(DataError::missing(missing).into());
        }

        let city = build_record(i, |column| obj.get(column).map_or(CellValue::Null, json_to_cell))?;
        cities.push(city);
    }

    Ok(CityTable::from_records(cities))
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => CellValue::Text(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::Text(n.to_string())
            }
        }
        JsonValue::Null => CellValue::Null,
        other => CellValue::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one column per field.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`): string columns may be Utf8 or
/// LargeUtf8, numeric columns any int or float width.
fn load_parquet(path: &Path) -> Result<CityTable> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    let schema = builder.schema().clone();
    if let Some(missing) = REQUIRED_COLUMNS.iter().find(|c| schema.index_of(c).is_err()) {
        return Err(DataError::missing(missing).into());
    }
    let reader = builder.build().context("building parquet reader")?;

    let mut cities = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        let mut columns: HashMap<&str, &ArrayRef> = HashMap::new();
        for name in REQUIRED_COLUMNS {
            let idx = schema
                .index_of(name)
                .map_err(|_| DataError::missing(name))?;
            columns.insert(name, batch.column(idx));
        }

        for row in 0..batch.num_rows() {
            let row_no = cities.len();
            let city = build_record(row_no, |column| {
                columns
                    .get(column)
                    .map_or(CellValue::Null, |col| extract_cell(col, row))
            })?;
            cities.push(city);
        }
    }

    Ok(CityTable::from_records(cities))
}

/// Extract a single cell from an Arrow column at a given row.
fn extract_cell(col: &ArrayRef, row: usize) -> CellValue {
    if col.is_null(row) {
        return CellValue::Null;
    }
    let cell = match col.data_type() {
        DataType::Utf8 => col
            .as_string_opt::<i32>()
            .map(|a| CellValue::Text(a.value(row).to_string())),
        DataType::LargeUtf8 => col
            .as_string_opt::<i64>()
            .map(|a| CellValue::Text(a.value(row).to_string())),
        DataType::Int32 => col
            .as_primitive_opt::<Int32Type>()
            .map(|a| CellValue::Integer(i64::from(a.value(row)))),
        DataType::Int64 => col
            .as_primitive_opt::<Int64Type>()
            .map(|a| CellValue::Integer(a.value(row))),
        DataType::UInt32 => col
            .as_primitive_opt::<UInt32Type>()
            .map(|a| CellValue::Integer(i64::from(a.value(row)))),
        DataType::UInt64 => col
            .as_primitive_opt::<UInt64Type>()
            .map(|a| match i64::try_from(a.value(row)) {
                Ok(i) => CellValue::Integer(i),
                Err(_) => CellValue::Text(a.value(row).to_string()),
            }),
        DataType::Float32 => col
            .as_primitive_opt::<Float32Type>()
            .map(|a| CellValue::Float(f64::from(a.value(row)))),
        DataType::Float64 => col
            .as_primitive_opt::<Float64Type>()
            .map(|a| CellValue::Float(a.value(row))),
        other => Some(CellValue::Text(format!("{other:?}"))),
    };
    cell.unwrap_or(CellValue::Null)
}
