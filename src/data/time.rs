//! Timestamps in the dashboard zone.
//!
//! Readings are normalized to Asia/Ho_Chi_Minh. The zone has had no
//! daylight-saving transitions since 1975, so a fixed UTC+7 offset is exact
//! for any log this dashboard will see.

use chrono::{
    DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone, Utc,
};

use super::error::DatasetError;

/// IANA name of the dashboard zone, for display.
pub const DASHBOARD_TIMEZONE: &str = "Asia/Ho_Chi_Minh";

/// UTC offset of the dashboard zone in seconds.
pub const DASHBOARD_UTC_OFFSET_SECS: i32 = 7 * 3600;

/// Format used for hover text and the preview table.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Format expected in the time-of-day text box.
pub const TIME_OF_DAY_FORMAT: &str = "%H:%M:%S";

/// Offset-aware layouts, tried after RFC 3339.
const ZONED_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%.f%z"];

/// Naive layouts; interpreted as UTC.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

pub fn dashboard_offset() -> FixedOffset {
    FixedOffset::east_opt(DASHBOARD_UTC_OFFSET_SECS).unwrap_or_else(|| Utc.fix())
}

/// Convert any instant into the dashboard zone.
pub fn to_dashboard<Tz: TimeZone>(dt: &DateTime<Tz>) -> DateTime<FixedOffset> {
    dt.with_timezone(&dashboard_offset())
}

/// Parse a `time` cell.
///
/// Strings carrying an offset are converted; naive strings are taken to be
/// UTC. Returns `None` for anything unparsable, which marks the row's
/// timestamp as missing.
pub fn parse_timestamp(text: &str) -> Option<DateTime<FixedOffset>> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(to_dashboard(&dt));
    }
    for fmt in ZONED_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(text, fmt) {
            return Some(to_dashboard(&dt));
        }
    }

    let naive_text = text.strip_suffix('Z').unwrap_or(text);
    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(naive_text, fmt) {
            return Some(to_dashboard(&naive.and_utc()));
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(naive_text, "%Y-%m-%d") {
        return Some(to_dashboard(&date.and_time(NaiveTime::MIN).and_utc()));
    }
    None
}

/// Parse the `HH:MM:SS` text entered by the user.
pub fn parse_time_of_day(text: &str) -> Result<NaiveTime, DatasetError> {
    NaiveTime::parse_from_str(text.trim(), TIME_OF_DAY_FORMAT)
        .map_err(|_| DatasetError::InvalidTimeOfDay(text.to_string()))
}

/// Build the window anchor from the picked date and the time-of-day text.
///
/// Blank text means no anchor yet and is not an error.
pub fn anchor_from(
    date: NaiveDate,
    time_text: &str,
) -> Result<Option<DateTime<FixedOffset>>, DatasetError> {
    if time_text.trim().is_empty() {
        return Ok(None);
    }
    let time = parse_time_of_day(time_text)?;
    Ok(dashboard_offset()
        .from_local_datetime(&date.and_time(time))
        .single())
}

/// Wall-clock instant in the dashboard zone.
pub fn at_dashboard_time(
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    min: u32,
    sec: u32,
) -> Option<DateTime<FixedOffset>> {
    dashboard_offset()
        .with_ymd_and_hms(year, month, day, hour, min, sec)
        .single()
}

pub fn format_timestamp(dt: &DateTime<FixedOffset>) -> String {
    dt.format(TIMESTAMP_FORMAT).to_string()
}

/// Seconds since the UNIX epoch, the x coordinate used by the plots.
pub fn to_plot_x(dt: &DateTime<FixedOffset>) -> f64 {
    dt.timestamp() as f64 + f64::from(dt.timestamp_subsec_nanos()) * 1e-9
}

/// Inverse of [`to_plot_x`]. Non-finite or out-of-range values fall back to
/// the UNIX epoch.
pub fn from_plot_x(secs: f64) -> DateTime<FixedOffset> {
    let utc = if secs.is_finite() {
        let s = secs.floor() as i64;
        let ns = (((secs - s as f64) * 1e9).round() as u32).min(999_999_999);
        DateTime::from_timestamp(s, ns).unwrap_or_default()
    } else {
        DateTime::<Utc>::default()
    };
    to_dashboard(&utc)
}
