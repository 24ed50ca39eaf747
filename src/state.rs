use chrono::{DateTime, FixedOffset, NaiveDate};

use crate::chart::{ChartSeries, FeatureSelection, build_series};
use crate::color::SeriesColors;
use crate::config::DashboardConfig;
use crate::data::error::DatasetError;
use crate::data::filter::{SelectionMode, clamp_minutes, select_rows};
use crate::data::loader::dataset_error;
use crate::data::model::{Row, SensorDataset};
use crate::data::time::anchor_from;

/// Why the last load failed.
#[derive(Debug, Clone, PartialEq)]
pub enum StatusMessage {
    /// The file was read but rejected.
    Dataset(DatasetError),
    /// The file could not be read at all.
    Io(String),
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
///
/// Every setter re-runs [`AppState::recompute`], so the outputs
/// (`anchor`, `filtered`, `series`) always reflect the current inputs.
pub struct AppState {
    pub config: DashboardConfig,

    /// Loaded dataset (None until the user loads a valid file).
    pub dataset: Option<SensorDataset>,

    /// File name of the loaded dataset, for the top bar.
    pub source_name: Option<String>,

    /// Show every row in the table preview instead of the first few.
    pub show_full: bool,

    // -- window inputs --
    pub mode: SelectionMode,
    pub date: NaiveDate,
    pub time_text: String,
    pub minutes: i32,

    /// Centre and additional feature columns.
    pub selection: FeatureSelection,

    /// Stable colour per feature column.
    pub colors: SeriesColors,

    // -- outputs --
    /// Anchor built from `date` and `time_text`, when valid.
    pub anchor: Option<DateTime<FixedOffset>>,

    /// Rows selected by the current mode and window.
    pub filtered: Option<SensorDataset>,

    /// One series per selected feature column.
    pub series: Vec<ChartSeries>,

    /// Error from the last load attempt, shown in the top bar.
    pub status_message: Option<StatusMessage>,

    /// Error in the window inputs (bad time text).
    pub input_error: Option<DatasetError>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(DashboardConfig::default())
    }
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        let minutes = config.default_minutes;
        Self {
            config,
            dataset: None,
            source_name: None,
            show_full: false,
            mode: SelectionMode::All,
            date: NaiveDate::default(),
            time_text: String::new(),
            minutes,
            selection: FeatureSelection::default(),
            colors: SeriesColors::default(),
            anchor: None,
            filtered: None,
            series: Vec::new(),
            status_message: None,
            input_error: None,
        }
    }

    /// Ingest a newly loaded dataset, reset selections and recompute.
    pub fn set_dataset(&mut self, dataset: SensorDataset, source_name: Option<String>) {
        self.selection = FeatureSelection::for_features(&dataset.feature_columns);
        self.colors = SeriesColors::new(&dataset.feature_columns);
        if let Some(date) = dataset.first_date() {
            self.date = date;
        }

        self.dataset = Some(dataset);
        self.source_name = source_name;
        self.status_message = None;
        self.recompute();
    }

    /// Record a failed load. The previous dataset is dropped so nothing stale
    /// is charted.
    pub fn set_load_error(&mut self, err: &anyhow::Error) {
        self.status_message = Some(match dataset_error(err) {
            Some(domain) => StatusMessage::Dataset(domain.clone()),
            None => StatusMessage::Io(format!("{err:#}")),
        });
        self.dataset = None;
        self.source_name = None;
        self.selection = FeatureSelection::default();
        self.recompute();
    }

    pub fn set_mode(&mut self, mode: SelectionMode) {
        self.mode = mode;
        self.recompute();
    }

    pub fn set_date(&mut self, date: NaiveDate) {
        self.date = date;
        self.recompute();
    }

    pub fn set_time_text(&mut self, text: impl Into<String>) {
        self.time_text = text.into();
        self.recompute();
    }

    /// Accepts any integer; it is clamped to the window range.
    pub fn set_minutes(&mut self, minutes: i64) {
        self.minutes = clamp_minutes(minutes);
        self.recompute();
    }

    pub fn set_center(&mut self, column: String) {
        self.selection.set_center(column);
        self.recompute();
    }

    pub fn toggle_additional(&mut self, column: &str) {
        self.selection.toggle_additional(column);
        self.recompute();
    }

    /// Re-derive anchor, filtered rows and chart series from the inputs.
    pub fn recompute(&mut self) {
        self.input_error = None;
        self.anchor = None;

        let Some(dataset) = &self.dataset else {
            self.filtered = None;
            self.series.clear();
            return;
        };

        if self.mode == SelectionMode::TimeRange {
            match anchor_from(self.date, &self.time_text) {
                Ok(anchor) => self.anchor = anchor,
                Err(e) => {
                    log::debug!("{e}");
                    self.input_error = Some(e);
                }
            }
        }

        let filtered = select_rows(dataset, self.mode, self.anchor, self.minutes);
        self.series = if filtered.is_empty() {
            Vec::new()
        } else {
            build_series(&filtered, &self.selection.selected())
        };
        log::debug!(
            "Window {:?} anchor={:?} minutes={} → {} rows",
            self.mode,
            self.anchor,
            self.minutes,
            filtered.len()
        );
        self.filtered = Some(filtered);
    }

    /// Warning to show instead of charts, if any.
    pub fn notice(&self) -> Option<DatasetError> {
        match &self.filtered {
            Some(f) if f.is_empty() => Some(DatasetError::EmptyWindow),
            _ => None,
        }
    }

    /// Rows for the table preview.
    pub fn preview_rows(&self) -> &[Row] {
        let Some(ds) = &self.dataset else {
            return &[];
        };
        if self.show_full {
            &ds.rows
        } else {
            &ds.rows[..ds.rows.len().min(self.config.preview_rows)]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::read_csv;

    const CSV: &str = "time,point_key=443_First,point_key=597_First,device\n\
                       2024-05-01 03:00:00,0,10,chiller\n\
                       2024-05-01 03:05:00,1,11,chiller\n\
                       2024-05-01 03:10:00,1,12,chiller\n";

    fn loaded() -> AppState {
        let mut state = AppState::default();
        state.set_dataset(read_csv(CSV.as_bytes()).unwrap(), Some("log.csv".into()));
        state
    }

    #[test]
    fn new_dataset_defaults_to_all_rows_and_first_feature() {
        let state = loaded();
        assert_eq!(state.date, NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
        assert_eq!(state.filtered.as_ref().map(|f| f.len()), Some(3));
        assert_eq!(state.series.len(), 1);
        assert_eq!(state.series[0].column(), "point_key=443_First");
    }

    #[test]
    fn time_range_without_time_text_shows_nothing() {
        let mut state = loaded();
        state.set_mode(SelectionMode::TimeRange);
        assert!(state.input_error.is_none());
        assert_eq!(state.notice(), Some(DatasetError::EmptyWindow));
        assert!(state.series.is_empty());
    }

    #[test]
    fn window_follows_time_text_and_minutes() {
        let mut state = loaded();
        state.set_mode(SelectionMode::TimeRange);
        state.set_minutes(5);
        state.set_time_text("10:10:00");
        assert_eq!(state.filtered.as_ref().map(|f| f.len()), Some(2));

        state.set_minutes(-7);
        assert_eq!(state.minutes, -1);
        assert_eq!(state.filtered.as_ref().map(|f| f.len()), Some(3));
    }

    #[test]
    fn bad_time_text_disables_window() {
        let mut state = loaded();
        state.set_mode(SelectionMode::TimeRange);
        state.set_time_text("10-10");
        assert_eq!(
            state.input_error,
            Some(DatasetError::InvalidTimeOfDay("10-10".into()))
        );
        assert_eq!(state.anchor, None);
        assert!(state.series.is_empty());

        state.set_mode(SelectionMode::All);
        assert!(state.input_error.is_none());
        assert_eq!(state.series.len(), 1);
    }

    #[test]
    fn extras_add_series_in_order() {
        let mut state = loaded();
        state.toggle_additional("point_key=597_First");
        let titles: Vec<String> = state.series.iter().map(|s| s.title_text()).collect();
        assert_eq!(
            titles,
            vec![
                "point_key=443_First - Air Compressor Alarm Status",
                "point_key=597_First - Chiller Alarm 2",
            ]
        );
    }

    #[test]
    fn load_error_clears_dataset() {
        let mut state = loaded();
        let err = read_csv("a,b\n1,2\n".as_bytes()).unwrap_err();
        state.set_load_error(&err);
        assert!(state.dataset.is_none());
        assert!(state.filtered.is_none());
        assert_eq!(
            state.status_message,
            Some(StatusMessage::Dataset(DatasetError::MissingTimeColumn))
        );
    }

    #[test]
    fn preview_is_capped_unless_show_full() {
        let mut state = loaded();
        state.config.preview_rows = 2;
        assert_eq!(state.preview_rows().len(), 2);
        state.show_full = true;
        assert_eq!(state.preview_rows().len(), 3);
    }
}
