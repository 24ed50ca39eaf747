//! Line-chart inputs: one `(time, value)` series per selected feature column.

use chrono::{DateTime, FixedOffset};

use crate::data::model::SensorDataset;
use crate::data::time::{format_timestamp, to_plot_x};
use crate::data::titles::{ResolvedTitle, resolve};

/// Title of the x axis of every chart.
pub const X_AXIS_TITLE: &str = "Time";

/// Hover text for one point: `Time=<YYYY-MM-DD HH:MM:SS>` then `Value=<v>`.
pub fn hover_text(time: &DateTime<FixedOffset>, value: f64) -> String {
    format!("Time={}\nValue={value}", format_timestamp(time))
}

/// A column ready for the line-chart renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub title: ResolvedTitle,
    pub points: Vec<(DateTime<FixedOffset>, f64)>,
}

impl ChartSeries {
    pub fn from_dataset(dataset: &SensorDataset, column: &str) -> Self {
        ChartSeries {
            title: resolve(column),
            points: dataset.numeric_series(column),
        }
    }

    pub fn column(&self) -> &str {
        self.title.column()
    }

    /// Chart title; also used as the y-axis title.
    pub fn title_text(&self) -> String {
        self.title.to_string()
    }

    /// Points as `[seconds since epoch, value]`.
    pub fn plot_points(&self) -> Vec<[f64; 2]> {
        self.points
            .iter()
            .map(|(t, v)| [to_plot_x(t), *v])
            .collect()
    }

    /// Hover text of the point closest in time to `x` (seconds since epoch).
    pub fn hover_at(&self, x: f64) -> Option<String> {
        self.points
            .iter()
            .min_by(|(a, _), (b, _)| {
                (to_plot_x(a) - x).abs().total_cmp(&(to_plot_x(b) - x).abs())
            })
            .map(|(t, v)| hover_text(t, *v))
    }
}

/// One series per column, in selection order.
pub fn build_series(dataset: &SensorDataset, columns: &[String]) -> Vec<ChartSeries> {
    columns
        .iter()
        .map(|col| ChartSeries::from_dataset(dataset, col))
        .collect()
}

// ---------------------------------------------------------------------------
// Feature selection: one centre column plus any number of extras
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureSelection {
    pub center: Option<String>,
    pub additional: Vec<String>,
}

impl FeatureSelection {
    /// Default selection for a new dataset: the first feature column.
    pub fn for_features(features: &[String]) -> Self {
        FeatureSelection {
            center: features.first().cloned(),
            additional: Vec::new(),
        }
    }

    /// Columns offered as extras: every feature except the centre.
    pub fn additional_options<'a>(&self, features: &'a [String]) -> Vec<&'a String> {
        features
            .iter()
            .filter(|f| self.center.as_ref() != Some(*f))
            .collect()
    }

    /// The centre can never also be an extra.
    pub fn set_center(&mut self, column: String) {
        self.additional.retain(|c| *c != column);
        self.center = Some(column);
    }

    pub fn toggle_additional(&mut self, column: &str) {
        if self.center.as_deref() == Some(column) {
            return;
        }
        if let Some(pos) = self.additional.iter().position(|c| c == column) {
            self.additional.remove(pos);
        } else {
            self.additional.push(column.to_string());
        }
    }

    /// Centre first, then extras in the order they were picked.
    pub fn selected(&self) -> Vec<String> {
        self.center
            .iter()
            .chain(self.additional.iter())
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{CellValue, Row};
    use crate::data::time::at_dashboard_time;

    #[test]
    fn hover_uses_second_precision() {
        let t = at_dashboard_time(2024, 5, 1, 10, 5, 7).unwrap();
        assert_eq!(hover_text(&t, 1.5), "Time=2024-05-01 10:05:07\nValue=1.5");
        assert_eq!(hover_text(&t, 3.0), "Time=2024-05-01 10:05:07\nValue=3");
    }

    #[test]
    fn series_carry_resolved_titles() {
        let cols = vec!["point_key=443_First".to_string(), "flow_First".to_string()];
        let t = at_dashboard_time(2024, 5, 1, 10, 0, 0);
        let ds = SensorDataset::new(
            cols.clone(),
            vec![Row::new(t)
                .with_value(&cols[0], CellValue::Integer(1))
                .with_value(&cols[1], CellValue::Float(2.5))],
        );
        let series = build_series(&ds, &cols);
        assert_eq!(
            series[0].title_text(),
            "point_key=443_First - Air Compressor Alarm Status"
        );
        assert_eq!(series[1].title_text(), "flow_First");
        assert_eq!(series[1].column(), "flow_First");
        assert_eq!(series[1].plot_points()[0][1], 2.5);
    }

    #[test]
    fn hover_picks_nearest_point() {
        let a = at_dashboard_time(2024, 5, 1, 10, 0, 0).unwrap();
        let b = at_dashboard_time(2024, 5, 1, 10, 10, 0).unwrap();
        let series = ChartSeries {
            title: resolve("x_First"),
            points: vec![(a, 1.0), (b, 2.0)],
        };
        let hover = series.hover_at(to_plot_x(&b) - 60.0).unwrap();
        assert!(hover.ends_with("Value=2"));
    }

    #[test]
    fn centre_is_excluded_from_extras() {
        let features: Vec<String> = ["a_First", "b_First", "c_First"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let mut sel = FeatureSelection::for_features(&features);
        assert_eq!(sel.additional_options(&features), vec!["b_First", "c_First"]);

        sel.toggle_additional("c_First");
        sel.toggle_additional("a_First");
        assert_eq!(sel.selected(), vec!["a_First", "c_First"]);

        sel.set_center("c_First".into());
        assert_eq!(sel.selected(), vec!["c_First"]);
        sel.toggle_additional("b_First");
        sel.toggle_additional("b_First");
        assert!(sel.additional.is_empty());
    }
}
