use eframe::egui::{Color32, RichText, Ui};
use egui_plot::{Line, Plot, PlotPoints, Points};

use modbus_dashboard::chart::{ChartSeries, X_AXIS_TITLE};
use modbus_dashboard::data::time::{TIMESTAMP_FORMAT, from_plot_x};
use modbus_dashboard::state::AppState;

use super::text::UiText;

const CHART_HEIGHT: f32 = 280.0;

// ---------------------------------------------------------------------------
// Series charts (central panel)
// ---------------------------------------------------------------------------

/// Render one line chart per selected feature column, or the empty-window
/// warning when the current window has no rows.
pub fn series_charts(ui: &mut Ui, state: &AppState, text: &UiText) {
    if state.dataset.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading(text.no_dataset);
        });
        return;
    }

    if let Some(notice) = state.notice() {
        ui.label(RichText::new(text.dataset_error(&notice)).color(Color32::YELLOW));
        return;
    }

    ui.heading(text.visualization_heading);
    for series in &state.series {
        series_chart(ui, series, state.colors.color_for(series.column()), text);
        ui.add_space(12.0);
    }
}

/// A single chart: lines plus markers, time on x, hover shows the nearest
/// reading.
fn series_chart(ui: &mut Ui, series: &ChartSeries, color: Color32, text: &UiText) {
    let title = series.title_text();
    ui.strong(&title);

    let points = series.plot_points();
    let hover_series = series.clone();

    Plot::new(("series_chart", series.column()))
        .height(CHART_HEIGHT)
        .x_axis_label(X_AXIS_TITLE)
        .y_axis_label(title.clone())
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .x_axis_formatter(|mark, _range| from_plot_x(mark.value).format("%H:%M:%S").to_string())
        .label_formatter(move |_name, value| hover_series.hover_at(value.x).unwrap_or_default())
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(PlotPoints::from(points.clone()))
                    .name(text.value_axis)
                    .color(color)
                    .width(1.5),
            );
            plot_ui.points(
                Points::new(PlotPoints::from(points))
                    .color(color)
                    .radius(2.5),
            );
        });

    if let Some(((first, _), (last, _))) = series.points.first().zip(series.points.last()) {
        ui.small(format!(
            "{} → {}",
            first.format(TIMESTAMP_FORMAT),
            last.format(TIMESTAMP_FORMAT)
        ));
    }
}
