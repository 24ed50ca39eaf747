/// Data layer: core types, loading, time windows and titles.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → SensorDataset (time normalized to UTC+7)
///   └──────────┘
///        │
///        ▼
///   ┌───────────────┐
///   │ SensorDataset │  Vec<Row>, column index, feature columns
///   └───────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  [anchor - minutes, anchor] → filtered rows
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  titles   │  point_key=<n> → chart title
///   └──────────┘
/// ```

pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
pub mod time;
pub mod titles;
