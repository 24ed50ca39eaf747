use std::path::PathBuf;
use std::sync::Arc;

use arrow::array::{ArrayRef, Int64Array, StringArray, TimestampMillisecondArray};
use arrow::datatypes::{DataType, Field, Schema, TimeUnit};
use arrow::record_batch::RecordBatch;
use modbus_dashboard::data::error::DatasetError;
use modbus_dashboard::data::loader::{dataset_error, load_file};
use modbus_dashboard::data::model::CellValue;
use modbus_dashboard::data::time::{at_dashboard_time, format_timestamp};
use parquet::arrow::ArrowWriter;

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("modbus_dashboard_{}_{name}", std::process::id()))
}

fn write_temp(name: &str, contents: &str) -> PathBuf {
    let path = temp_path(name);
    std::fs::write(&path, contents).unwrap();
    path
}

#[test]
fn loads_csv_and_normalizes_to_utc_plus_7() {
    let path = write_temp(
        "basic.csv",
        "time,point_key=443_First,point_key=999_First,site\n\
         2024-05-01 03:00:00,0,5,A\n\
         2024-05-01T03:05:00+00:00,1,6,A\n",
    );
    let ds = load_file(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(ds.len(), 2);
    assert_eq!(
        ds.feature_columns,
        vec!["point_key=443_First", "point_key=999_First"]
    );
    assert_eq!(
        format_timestamp(&ds.rows[1].time.unwrap()),
        "2024-05-01 10:05:00"
    );
    assert_eq!(ds.rows[1].get("site"), Some(&CellValue::String("A".into())));
}

#[test]
fn csv_extension_is_case_insensitive() {
    let path = write_temp("upper.CSV", "time,x_First\n2024-05-01 03:00:00,1\n");
    let ds = load_file(&path).unwrap();
    std::fs::remove_file(&path).ok();
    assert_eq!(ds.len(), 1);
}

#[test]
fn missing_time_column_is_a_dataset_error() {
    let path = write_temp("no_time.csv", "timestamp,x_First\n2024-05-01 03:00:00,1\n");
    let err = load_file(&path).unwrap_err();
    std::fs::remove_file(&path).ok();
    assert_eq!(dataset_error(&err), Some(&DatasetError::MissingTimeColumn));
}

#[test]
fn missing_file_is_not_a_dataset_error() {
    let err = load_file(&temp_path("does_not_exist.csv")).unwrap_err();
    assert!(dataset_error(&err).is_none());
}

#[test]
fn loads_json_records() {
    let path = write_temp(
        "records.json",
        r#"[{"time": "2024-05-01 03:00:00", "point_key=597_First": 2}]"#,
    );
    let ds = load_file(&path).unwrap();
    std::fs::remove_file(&path).ok();
    assert_eq!(ds.rows[0].get("point_key=597_First"), Some(&CellValue::Integer(2)));
    assert_eq!(ds.rows[0].time, at_dashboard_time(2024, 5, 1, 10, 0, 0));
}

#[test]
fn loads_parquet_with_timestamp_column() {
    let schema = Arc::new(Schema::new(vec![
        Field::new(
            "time",
            DataType::Timestamp(TimeUnit::Millisecond, Some("UTC".into())),
            true,
        ),
        Field::new("point_key=443_First", DataType::Int64, false),
        Field::new("device", DataType::Utf8, false),
    ]));
    let t0 = at_dashboard_time(2024, 5, 1, 10, 0, 0).unwrap().timestamp_millis();
    let columns: Vec<ArrayRef> = vec![
        Arc::new(TimestampMillisecondArray::from(vec![Some(t0), None]).with_timezone("UTC")),
        Arc::new(Int64Array::from(vec![1, 0])),
        Arc::new(StringArray::from(vec!["chiller-1", "chiller-2"])),
    ];
    let batch = RecordBatch::try_new(schema.clone(), columns).unwrap();

    let path = temp_path("readings.parquet");
    let file = std::fs::File::create(&path).unwrap();
    let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
    writer.write(&batch).unwrap();
    writer.close().unwrap();

    let ds = load_file(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(ds.len(), 2);
    assert_eq!(ds.column_names, vec!["point_key=443_First", "device"]);
    assert_eq!(ds.rows[0].time, at_dashboard_time(2024, 5, 1, 10, 0, 0));
    assert_eq!(ds.rows[1].time, None);
    assert_eq!(ds.rows[0].get("point_key=443_First"), Some(&CellValue::Integer(1)));
}
