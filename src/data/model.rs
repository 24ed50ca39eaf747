use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDate};

use super::titles::is_feature_column;

// ---------------------------------------------------------------------------
// CellValue – a single cell of a reading column
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value mirroring common dataframe dtypes.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

impl CellValue {
    /// Try to interpret the value as an `f64` for plotting.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) if v.is_finite() => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            CellValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            _ => None,
        }
    }

    /// Guess the type of a text cell (CSV input).
    pub fn from_text(s: &str) -> Self {
        if s.is_empty() {
            return CellValue::Null;
        }
        if let Ok(i) = s.parse::<i64>() {
            return CellValue::Integer(i);
        }
        if let Ok(f) = s.parse::<f64>() {
            return CellValue::Float(f);
        }
        if s == "true" || s == "false" {
            return CellValue::Bool(s == "true");
        }
        CellValue::String(s.to_string())
    }
}

// ---------------------------------------------------------------------------
// Row – one reading of the source table
// ---------------------------------------------------------------------------

/// A single row of the source table.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    /// Parsed `time` cell in the dashboard zone; `None` when it failed to parse.
    pub time: Option<DateTime<FixedOffset>>,
    /// Every other column: column_name → value.
    pub values: BTreeMap<String, CellValue>,
}

impl Row {
    pub fn new(time: Option<DateTime<FixedOffset>>) -> Self {
        Row {
            time,
            values: BTreeMap::new(),
        }
    }

    pub fn with_value(mut self, column: &str, value: CellValue) -> Self {
        self.values.insert(column.to_string(), value);
        self
    }

    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.values.get(column)
    }
}

// ---------------------------------------------------------------------------
// SensorDataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full parsed table with its column index.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorDataset {
    /// All rows, in file order.
    pub rows: Vec<Row>,
    /// Column names in file order, excluding `time`.
    pub column_names: Vec<String>,
    /// The subset of `column_names` eligible for plotting.
    pub feature_columns: Vec<String>,
}

impl SensorDataset {
    /// Build the column index for a set of rows.
    pub fn new(column_names: Vec<String>, rows: Vec<Row>) -> Self {
        let feature_columns = column_names
            .iter()
            .filter(|c| is_feature_column(c))
            .cloned()
            .collect();
        SensorDataset {
            rows,
            column_names,
            feature_columns,
        }
    }

    /// Copy of the rows at `indices`, in the order given.
    pub fn subset(&self, indices: &[usize]) -> Self {
        SensorDataset {
            rows: indices
                .iter()
                .filter_map(|&i| self.rows.get(i).cloned())
                .collect(),
            column_names: self.column_names.clone(),
            feature_columns: self.feature_columns.clone(),
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the dataset has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Earliest and latest valid timestamps.
    pub fn time_bounds(&self) -> Option<(DateTime<FixedOffset>, DateTime<FixedOffset>)> {
        let mut times = self.rows.iter().filter_map(|r| r.time);
        let first = times.next()?;
        Some(times.fold((first, first), |(lo, hi), t| (lo.min(t), hi.max(t))))
    }

    /// Calendar date (dashboard zone) of the earliest timestamp.
    pub fn first_date(&self) -> Option<NaiveDate> {
        self.time_bounds().map(|(lo, _)| lo.date_naive())
    }

    /// Number of rows whose `time` cell failed to parse.
    pub fn missing_time_count(&self) -> usize {
        self.rows.iter().filter(|r| r.time.is_none()).count()
    }

    /// `(time, value)` pairs of a column, skipping rows without a valid
    /// timestamp or a numeric value.
    pub fn numeric_series(&self, column: &str) -> Vec<(DateTime<FixedOffset>, f64)> {
        self.rows
            .iter()
            .filter_map(|r| {
                let t = r.time?;
                let v = r.get(column)?.as_f64()?;
                Some((t, v))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::time::at_dashboard_time;

    fn ts(h: u32, m: u32) -> Option<DateTime<FixedOffset>> {
        at_dashboard_time(2024, 5, 1, h, m, 0)
    }

    #[test]
    fn guesses_cell_types_from_text() {
        assert_eq!(CellValue::from_text(""), CellValue::Null);
        assert_eq!(CellValue::from_text("42"), CellValue::Integer(42));
        assert_eq!(CellValue::from_text("4.5"), CellValue::Float(4.5));
        assert_eq!(CellValue::from_text("true"), CellValue::Bool(true));
        assert_eq!(
            CellValue::from_text("ALARM"),
            CellValue::String("ALARM".into())
        );
    }

    #[test]
    fn feature_columns_keep_file_order() {
        let ds = SensorDataset::new(
            vec![
                "point_key=597_First".into(),
                "device".into(),
                "point_key=443_First".into(),
            ],
            Vec::new(),
        );
        assert_eq!(
            ds.feature_columns,
            vec!["point_key=597_First", "point_key=443_First"]
        );
    }

    #[test]
    fn time_bounds_ignore_missing_timestamps() {
        let ds = SensorDataset::new(
            vec![],
            vec![Row::new(ts(10, 5)), Row::new(None), Row::new(ts(9, 0))],
        );
        let (lo, hi) = ds.time_bounds().unwrap();
        assert_eq!(Some(lo), ts(9, 0));
        assert_eq!(Some(hi), ts(10, 5));
        assert_eq!(ds.missing_time_count(), 1);
    }

    #[test]
    fn numeric_series_skips_text_and_missing_time() {
        let col = "point_key=443_First";
        let ds = SensorDataset::new(
            vec![col.into()],
            vec![
                Row::new(ts(10, 0)).with_value(col, CellValue::Integer(1)),
                Row::new(None).with_value(col, CellValue::Integer(2)),
                Row::new(ts(10, 10)).with_value(col, CellValue::String("n/a".into())),
                Row::new(ts(10, 15)).with_value(col, CellValue::Float(0.5)),
            ],
        );
        let series = ds.numeric_series(col);
        assert_eq!(series.len(), 2);
        assert_eq!(series[1].1, 0.5);
    }
}
