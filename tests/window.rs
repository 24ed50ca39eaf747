use chrono::NaiveDate;
use modbus_dashboard::chart::build_series;
use modbus_dashboard::data::filter::{filter_window, UNBOUNDED_MINUTES};
use modbus_dashboard::data::loader::read_csv;
use modbus_dashboard::data::time::{anchor_from, format_timestamp};
use modbus_dashboard::data::titles::resolve_title;

const LOG: &str = "time,point_key=443_First,point_key=abc_First,temperature_First\n\
                   2024-05-01T10:00:00+07:00,0,1,7.1\n\
                   2024-05-01T10:05:00+07:00,1,1,7.3\n\
                   broken,1,1,7.4\n\
                   2024-05-01T10:10:00+07:00,1,0,7.2\n";

fn anchor(text: &str) -> Option<chrono::DateTime<chrono::FixedOffset>> {
    anchor_from(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(), text).unwrap()
}

#[test]
fn five_minutes_back_from_ten_past_ten() {
    let ds = read_csv(LOG.as_bytes()).unwrap();
    let out = filter_window(&ds, anchor("10:10:00"), 5);
    let times: Vec<String> = out
        .rows
        .iter()
        .map(|r| format_timestamp(&r.time.unwrap()))
        .collect();
    assert_eq!(times, vec!["2024-05-01 10:05:00", "2024-05-01 10:10:00"]);
}

#[test]
fn unbounded_window_keeps_broken_rows() {
    let ds = read_csv(LOG.as_bytes()).unwrap();
    assert_eq!(filter_window(&ds, anchor("00:00:00"), UNBOUNDED_MINUTES), ds);
}

#[test]
fn blank_time_text_means_no_rows() {
    let ds = read_csv(LOG.as_bytes()).unwrap();
    assert!(filter_window(&ds, anchor(""), 60).is_empty());
}

#[test]
fn charts_get_resolved_titles() {
    let ds = read_csv(LOG.as_bytes()).unwrap();
    let series = build_series(&ds, &ds.feature_columns);
    let titles: Vec<String> = series.iter().map(|s| s.title_text()).collect();
    assert_eq!(
        titles,
        vec![
            "point_key=443_First - Air Compressor Alarm Status",
            "point_key=abc_First",
            "temperature_First",
        ]
    );
    // The broken row has no timestamp and is not plotted.
    assert!(series.iter().all(|s| s.points.len() == 3));
    assert_eq!(resolve_title("point_key=999_First"), "point_key=999_First");
}
