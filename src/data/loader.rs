use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{Array, AsArray};
use arrow::datatypes::{
    DataType, Float32Type, Float64Type, Int8Type, Int16Type, Int32Type, Int64Type, TimeUnit,
    TimestampMicrosecondType, TimestampMillisecondType, TimestampNanosecondType,
    TimestampSecondType, UInt8Type, UInt16Type, UInt32Type, UInt64Type,
};
use arrow::util::display::array_value_to_string;
use chrono::{DateTime, FixedOffset};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::error::DatasetError;
use super::model::{CellValue, Row, SensorDataset};
use super::time::{parse_timestamp, to_dashboard};

/// Name of the timestamp column every input must carry.
pub const TIME_COLUMN: &str = "time";

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a sensor log from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row, one reading per line (the gateway export)
/// * `.json`    – `[{ "time": "...", "point_key=443_First": 1, ... }, ...]`
/// * `.parquet` – flat table; `time` may be a timestamp or a string column
///
/// The result has already passed [`DatasetError`] validation: it has a
/// parsable `time` column and at least one feature column.
pub fn load_file(path: &Path) -> Result<SensorDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => bail!("Unsupported file extension: .{other}"),
    }?;

    log::info!(
        "Loaded {} rows from {} ({} feature columns, {} rows without a valid time)",
        dataset.len(),
        path.display(),
        dataset.feature_columns.len(),
        dataset.missing_time_count()
    );
    Ok(dataset)
}

/// The domain error behind a load failure, if there is one.
pub fn dataset_error(err: &anyhow::Error) -> Option<&DatasetError> {
    err.downcast_ref::<DatasetError>()
}

// ---------------------------------------------------------------------------
// Shared row accumulator
// ---------------------------------------------------------------------------

/// Collects rows from any loader and validates the result.
struct DatasetBuilder {
    column_names: Vec<String>,
    rows: Vec<Row>,
    /// Rows whose `time` cell was non-empty.
    time_cells: usize,
    /// Rows whose `time` cell parsed.
    parsed_times: usize,
}

impl DatasetBuilder {
    /// `columns` is the full header; fails when `time` is absent.
    fn new<'a>(columns: impl IntoIterator<Item = &'a str>) -> Result<Self> {
        let mut has_time = false;
        let mut column_names = Vec::new();
        for col in columns {
            if col == TIME_COLUMN {
                has_time = true;
            } else {
                column_names.push(col.to_string());
            }
        }
        if !has_time {
            bail!(DatasetError::MissingTimeColumn);
        }
        Ok(DatasetBuilder {
            column_names,
            rows: Vec::new(),
            time_cells: 0,
            parsed_times: 0,
        })
    }

    fn push(
        &mut self,
        time: Option<DateTime<FixedOffset>>,
        had_time_cell: bool,
        values: BTreeMap<String, CellValue>,
    ) {
        if had_time_cell {
            self.time_cells += 1;
        }
        if time.is_some() {
            self.parsed_times += 1;
        }
        self.rows.push(Row { time, values });
    }

    fn finish(self) -> Result<SensorDataset> {
        if self.time_cells > 0 && self.parsed_times == 0 {
            bail!(DatasetError::UnparsableTimeColumn);
        }
        let dataset = SensorDataset::new(self.column_names, self.rows);
        if dataset.feature_columns.is_empty() {
            bail!(DatasetError::NoFeatureColumns);
        }
        Ok(dataset)
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<SensorDataset> {
    let file = std::fs::File::open(path).context("opening CSV")?;
    read_csv(file)
}

/// CSV layout: header row with column names, one of which is `time`.
/// Every other column is typed by guessing from its text.
pub fn read_csv<R: Read>(input: R) -> Result<SensorDataset> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(input);
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut builder = DatasetBuilder::new(headers.iter().map(String::as_str))?;

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;

        let mut time_text = "";
        let mut values = BTreeMap::new();
        for (col_idx, col_name) in headers.iter().enumerate() {
            let cell = record.get(col_idx).unwrap_or("");
            if col_name == TIME_COLUMN {
                time_text = cell;
            } else {
                values.insert(col_name.clone(), CellValue::from_text(cell));
            }
        }

        let had_time = !time_text.trim().is_empty();
        builder.push(parse_timestamp(time_text), had_time, values);
    }

    builder.finish()
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

fn load_json(path: &Path) -> Result<SensorDataset> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    read_json(&text)
}

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "time": "2024-05-01T03:00:00Z", "point_key=443_First": 0 },
///   { "time": 1714532700000,          "point_key=443_First": 1 }
/// ]
/// ```
///
/// Numeric `time` values are epoch milliseconds. Columns are ordered by
/// first appearance.
pub fn read_json(text: &str) -> Result<SensorDataset> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;
    let records = root
        .as_array()
        .context("Expected top-level JSON array")?;

    let mut header: Vec<&str> = Vec::new();
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;
        for key in obj.keys() {
            if !header.contains(&key.as_str()) {
                header.push(key);
            }
        }
    }

    let mut builder = DatasetBuilder::new(header.iter().copied())?;
    let columns: Vec<String> = builder.column_names.clone();

    for rec in records {
        let Some(obj) = rec.as_object() else {
            continue;
        };
        let time_val = obj.get(TIME_COLUMN).unwrap_or(&JsonValue::Null);
        let values = columns
            .iter()
            .map(|col| {
                let cell = obj.get(col).map(json_to_cell).unwrap_or(CellValue::Null);
                (col.clone(), cell)
            })
            .collect();
        builder.push(json_to_time(time_val), !time_val.is_null(), values);
    }

    builder.finish()
}

fn json_to_time(val: &JsonValue) -> Option<DateTime<FixedOffset>> {
    match val {
        JsonValue::String(s) => parse_timestamp(s),
        JsonValue::Number(n) => n
            .as_i64()
            .and_then(DateTime::from_timestamp_millis)
            .map(|dt| to_dashboard(&dt)),
        _ => None,
    }
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => CellValue::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Null,
        other => CellValue::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file holding a flat sensor table.
///
/// `time` may be any Arrow timestamp (values are UTC instants whatever the
/// declared zone), a string column, or Int64 epoch milliseconds. Other
/// columns are read as strings, ints, floats or bools; anything else is kept
/// as its display text.
fn load_parquet(path: &Path) -> Result<SensorDataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    let schema = builder.schema().clone();
    let reader = builder.build().context("building parquet reader")?;

    let mut dataset = DatasetBuilder::new(schema.fields().iter().map(|f| f.name().as_str()))?;

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let time_idx = batch
            .schema()
            .index_of(TIME_COLUMN)
            .map_err(|_| DatasetError::MissingTimeColumn)?;
        let time_col = batch.column(time_idx);

        let value_cols: Vec<(&Arc<dyn Array>, String)> = batch
            .schema()
            .fields()
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != time_idx)
            .map(|(i, f)| (batch.column(i), f.name().clone()))
            .collect();

        for row in 0..batch.num_rows() {
            let values = value_cols
                .iter()
                .map(|(col, name)| (name.clone(), extract_cell_value(col, row)))
                .collect();
            dataset.push(
                extract_time(time_col, row),
                !time_col.is_null(row),
                values,
            );
        }
    }

    dataset.finish()
}

// -- Parquet / Arrow helpers --

fn extract_time(col: &Arc<dyn Array>, row: usize) -> Option<DateTime<FixedOffset>> {
    if col.is_null(row) {
        return None;
    }
    let utc = match col.data_type() {
        DataType::Timestamp(TimeUnit::Second, _) => {
            DateTime::from_timestamp(col.as_primitive::<TimestampSecondType>().value(row), 0)
        }
        DataType::Timestamp(TimeUnit::Millisecond, _) => DateTime::from_timestamp_millis(
            col.as_primitive::<TimestampMillisecondType>().value(row),
        ),
        DataType::Timestamp(TimeUnit::Microsecond, _) => DateTime::from_timestamp_micros(
            col.as_primitive::<TimestampMicrosecondType>().value(row),
        ),
        DataType::Timestamp(TimeUnit::Nanosecond, _) => Some(DateTime::from_timestamp_nanos(
            col.as_primitive::<TimestampNanosecondType>().value(row),
        )),
        DataType::Int64 => {
            DateTime::from_timestamp_millis(col.as_primitive::<Int64Type>().value(row))
        }
        DataType::Utf8 => return parse_timestamp(col.as_string::<i32>().value(row)),
        DataType::LargeUtf8 => return parse_timestamp(col.as_string::<i64>().value(row)),
        other => {
            log::debug!("Unsupported time column type {other:?}");
            None
        }
    };
    utc.map(|dt| to_dashboard(&dt))
}

/// Extract a single cell from an Arrow column at a given row.
fn extract_cell_value(col: &Arc<dyn Array>, row: usize) -> CellValue {
    if col.is_null(row) {
        return CellValue::Null;
    }
    match col.data_type() {
        DataType::Utf8 => CellValue::String(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => CellValue::String(col.as_string::<i64>().value(row).to_string()),
        DataType::Int8 => CellValue::Integer(col.as_primitive::<Int8Type>().value(row).into()),
        DataType::Int16 => CellValue::Integer(col.as_primitive::<Int16Type>().value(row).into()),
        DataType::Int32 => CellValue::Integer(col.as_primitive::<Int32Type>().value(row).into()),
        DataType::Int64 => CellValue::Integer(col.as_primitive::<Int64Type>().value(row)),
        DataType::UInt8 => CellValue::Integer(col.as_primitive::<UInt8Type>().value(row).into()),
        DataType::UInt16 => CellValue::Integer(col.as_primitive::<UInt16Type>().value(row).into()),
        DataType::UInt32 => CellValue::Integer(col.as_primitive::<UInt32Type>().value(row).into()),
        DataType::UInt64 => {
            let v = col.as_primitive::<UInt64Type>().value(row);
            i64::try_from(v)
                .map(CellValue::Integer)
                .unwrap_or(CellValue::Float(v as f64))
        }
        DataType::Float32 => {
            CellValue::Float(col.as_primitive::<Float32Type>().value(row).into())
        }
        DataType::Float64 => CellValue::Float(col.as_primitive::<Float64Type>().value(row)),
        DataType::Boolean => CellValue::Bool(col.as_boolean().value(row)),
        _ => match array_value_to_string(col, row) {
            Ok(text) => CellValue::String(text),
            Err(e) => {
                log::debug!("Cannot display {:?} cell: {e}", col.data_type());
                CellValue::Null
            }
        },
    }
}
