use eframe::egui::Ui;
use egui_extras::{Column, TableBuilder};

use modbus_dashboard::data::loader::TIME_COLUMN;
use modbus_dashboard::data::time::format_timestamp;
use modbus_dashboard::state::AppState;

use super::text::UiText;

/// Preview of the loaded rows: the first `preview_rows` unless "show all"
/// is ticked.
pub fn preview_table(ui: &mut Ui, state: &mut AppState, text: &UiText) {
    let Some(dataset) = &state.dataset else {
        return;
    };
    let columns = dataset.column_names.clone();

    ui.checkbox(&mut state.show_full, text.show_all);
    let rows = state.preview_rows();

    ui.push_id("preview_table", |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .max_scroll_height(240.0)
            .column(Column::auto().at_least(150.0))
            .columns(Column::auto().at_least(60.0).clip(true), columns.len())
            .header(20.0, |mut header| {
                header.col(|ui| {
                    ui.strong(TIME_COLUMN);
                });
                for col in &columns {
                    header.col(|ui| {
                        ui.strong(col);
                    });
                }
            })
            .body(|body| {
                body.rows(18.0, rows.len(), |mut row| {
                    let r = &rows[row.index()];
                    row.col(|ui| {
                        let time = r.time.as_ref().map(format_timestamp);
                        ui.label(time.unwrap_or_else(|| "NaT".into()));
                    });
                    for col in &columns {
                        row.col(|ui| {
                            ui.label(r.get(col).map(|v| v.to_string()).unwrap_or_default());
                        });
                    }
                });
            });
    });
}
