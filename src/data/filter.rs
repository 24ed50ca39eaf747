use chrono::{DateTime, Duration, FixedOffset};

use super::model::SensorDataset;

// ---------------------------------------------------------------------------
// Time window: which rows fall within [anchor - minutes, anchor]
// ---------------------------------------------------------------------------

/// `minutes` value meaning "no window, keep everything".
pub const UNBOUNDED_MINUTES: i32 = -1;

/// Largest window the UI accepts.
pub const MAX_MINUTES: i32 = 10_000;

/// How the dashboard picks rows for charting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionMode {
    /// Every row of the file.
    #[default]
    All,
    /// A backward window ending at the anchor.
    TimeRange,
}

/// Clamp user input to `[UNBOUNDED_MINUTES, MAX_MINUTES]`.
pub fn clamp_minutes(minutes: i64) -> i32 {
    minutes.clamp(i64::from(UNBOUNDED_MINUTES), i64::from(MAX_MINUTES)) as i32
}

/// Return indices of rows inside the window.
///
/// * No anchor → no rows.
/// * `minutes == -1` → every row, including those with a missing timestamp.
/// * Otherwise rows with `anchor - minutes <= time <= anchor`; rows with a
///   missing timestamp never match.
///
/// `minutes` must already be clamped with [`clamp_minutes`].
pub fn window_indices(
    dataset: &SensorDataset,
    anchor: Option<DateTime<FixedOffset>>,
    minutes: i32,
) -> Vec<usize> {
    let Some(anchor) = anchor else {
        return Vec::new();
    };
    if minutes == UNBOUNDED_MINUTES {
        return (0..dataset.len()).collect();
    }

    let start = anchor - Duration::minutes(i64::from(minutes));
    dataset
        .rows
        .iter()
        .enumerate()
        .filter(|(_, row)| row.time.is_some_and(|t| start <= t && t <= anchor))
        .map(|(i, _)| i)
        .collect()
}

/// The rows of `dataset` inside the window, in source order.
pub fn filter_window(
    dataset: &SensorDataset,
    anchor: Option<DateTime<FixedOffset>>,
    minutes: i32,
) -> SensorDataset {
    if anchor.is_some() && minutes == UNBOUNDED_MINUTES {
        return dataset.clone();
    }
    dataset.subset(&window_indices(dataset, anchor, minutes))
}

/// Apply the selection mode: `All` ignores the window entirely.
pub fn select_rows(
    dataset: &SensorDataset,
    mode: SelectionMode,
    anchor: Option<DateTime<FixedOffset>>,
    minutes: i32,
) -> SensorDataset {
    match mode {
        SelectionMode::All => dataset.clone(),
        SelectionMode::TimeRange => filter_window(dataset, anchor, minutes),
    }
}
