//! Chart titles for reading columns.
//!
//! Columns exported from the Modbus gateway embed the register key in their
//! name (`point_key=443_First`). When the key is a known point, the chart
//! title gets the point's description appended.

use std::collections::HashMap;
use std::fmt;

use once_cell::sync::Lazy;

/// Substring that marks a column as plottable.
pub const FEATURE_MARKER: &str = "First";

/// Substring that precedes the Modbus key in a column name.
pub const POINT_KEY_MARKER: &str = "point_key=";

/// Known Modbus points and their descriptions.
pub static POINT_TITLES: Lazy<HashMap<u32, &'static str>> = Lazy::new(|| {
    HashMap::from([
        (443, "Air Compressor Alarm Status"),
        (444, "Air Compressor Warning Status"),
        (454, "Warning Code"),
        (310, "Fault Type"),
        (318, "Water Pump Alarm"),
        (131, "Fault Type"),
        (139, "Water Pump Alarm"),
        (7, "Fault Type"),
        (15, "Water Pump Alarm"),
        (596, "Chiller Alarm 1"),
        (597, "Chiller Alarm 2"),
        (598, "Chiller Alarm 3"),
    ])
});

pub fn is_feature_column(column: &str) -> bool {
    column.contains(FEATURE_MARKER)
}

/// The Modbus key embedded in a column name: the digits between the first
/// `point_key=` and the next `_`.
pub fn modbus_key(column: &str) -> Option<u32> {
    let (_, rest) = column.split_once(POINT_KEY_MARKER)?;
    let raw = rest.split('_').next().unwrap_or(rest);
    raw.trim().parse().ok()
}

/// Outcome of title resolution. Resolution is total: a column that cannot be
/// resolved keeps its own name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedTitle {
    Labelled {
        column: String,
        key: u32,
        label: &'static str,
    },
    Raw(String),
}

impl ResolvedTitle {
    pub fn column(&self) -> &str {
        match self {
            ResolvedTitle::Labelled { column, .. } | ResolvedTitle::Raw(column) => column,
        }
    }

    pub fn label(&self) -> Option<&'static str> {
        match self {
            ResolvedTitle::Labelled { label, .. } => Some(label),
            ResolvedTitle::Raw(_) => None,
        }
    }
}

impl fmt::Display for ResolvedTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolvedTitle::Labelled { column, label, .. } => write!(f, "{column} - {label}"),
            ResolvedTitle::Raw(column) => write!(f, "{column}"),
        }
    }
}

pub fn resolve(column: &str) -> ResolvedTitle {
    match modbus_key(column).and_then(|key| POINT_TITLES.get(&key).map(|label| (key, *label))) {
        Some((key, label)) => ResolvedTitle::Labelled {
            column: column.to_string(),
            key,
            label,
        },
        None => ResolvedTitle::Raw(column.to_string()),
    }
}

/// Display title for a column's chart.
pub fn resolve_title(column: &str) -> String {
    resolve(column).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_key_gets_label() {
        assert_eq!(
            resolve_title("point_key=443_First"),
            "point_key=443_First - Air Compressor Alarm Status"
        );
        assert_eq!(
            resolve("point_key=7_First").label(),
            Some("Fault Type")
        );
    }

    #[test]
    fn unknown_key_is_unchanged() {
        assert_eq!(resolve_title("point_key=999_First"), "point_key=999_First");
    }

    #[test]
    fn no_marker_is_unchanged() {
        assert_eq!(resolve_title("temperature_First"), "temperature_First");
        assert_eq!(resolve("temperature_First"), ResolvedTitle::Raw("temperature_First".into()));
    }

    #[test]
    fn malformed_key_is_unchanged() {
        assert_eq!(resolve_title("point_key=abc_First"), "point_key=abc_First");
        assert_eq!(resolve_title("point_key=_First"), "point_key=_First");
        assert_eq!(resolve_title("point_key=-443_First"), "point_key=-443_First");
        assert_eq!(modbus_key("point_key="), None);
    }

    #[test]
    fn key_runs_to_end_without_underscore() {
        assert_eq!(modbus_key("First point_key=598"), Some(598));
        assert_eq!(
            resolve_title("First point_key=598"),
            "First point_key=598 - Chiller Alarm 3"
        );
    }

    #[test]
    fn first_marker_wins() {
        assert_eq!(modbus_key("point_key=444_point_key=443_First"), Some(444));
    }

    #[test]
    fn table_has_twelve_points() {
        assert_eq!(POINT_TITLES.len(), 12);
    }

    #[test]
    fn feature_marker_is_case_sensitive() {
        assert!(is_feature_column("point_key=443_First"));
        assert!(!is_feature_column("point_key=443_first"));
    }
}
