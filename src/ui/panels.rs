use eframe::egui::{self, Color32, DragValue, RichText, ScrollArea, Ui};
use egui_extras::DatePickerButton;

use modbus_dashboard::data::filter::{MAX_MINUTES, SelectionMode, UNBOUNDED_MINUTES};
use modbus_dashboard::data::time::DASHBOARD_TIMEZONE;
use modbus_dashboard::state::AppState;

use super::text::UiText;

// ---------------------------------------------------------------------------
// Left side panel – window and parameter widgets
// ---------------------------------------------------------------------------

/// Render the left control panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState, text: &UiText) {
    ui.heading(text.title);
    ui.separator();

    let Some(dataset) = &state.dataset else {
        ui.label(text.no_dataset);
        return;
    };
    let features = dataset.feature_columns.clone();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            time_range_controls(ui, state, text);
            ui.separator();
            parameter_controls(ui, state, text, &features);
        });
}

fn time_range_controls(ui: &mut Ui, state: &mut AppState, text: &UiText) {
    ui.strong(text.time_range_heading);
    ui.label(text.mode_label);

    let mut mode = state.mode;
    ui.radio_value(&mut mode, SelectionMode::All, text.mode_all);
    ui.radio_value(&mut mode, SelectionMode::TimeRange, text.mode_range);
    if mode != state.mode {
        state.set_mode(mode);
    }

    if state.mode != SelectionMode::TimeRange {
        return;
    }

    ui.add_space(4.0);
    ui.label(text.select_date);
    let mut date = state.date;
    if ui
        .add(DatePickerButton::new(&mut date).id_salt("anchor_date"))
        .changed()
    {
        state.set_date(date);
    }

    ui.label(text.enter_time);
    let mut time_text = state.time_text.clone();
    let response = ui.add(
        egui::TextEdit::singleline(&mut time_text)
            .hint_text("HH:MM:SS")
            .desired_width(100.0),
    );
    response.on_hover_text(DASHBOARD_TIMEZONE);
    if time_text != state.time_text {
        state.set_time_text(time_text);
    }

    if let Some(err) = &state.input_error {
        ui.colored_label(Color32::RED, text.dataset_error(err));
    }

    ui.label(text.enter_minutes);
    let step = state.config.minutes_step;
    let mut minutes = state.minutes;
    ui.horizontal(|ui: &mut Ui| {
        if ui.small_button("−").clicked() {
            minutes = minutes.saturating_sub(step);
        }
        ui.add(DragValue::new(&mut minutes).range(UNBOUNDED_MINUTES..=MAX_MINUTES));
        if ui.small_button("+").clicked() {
            minutes = minutes.saturating_add(step);
        }
    });
    if minutes != state.minutes {
        state.set_minutes(minutes.into());
    }
}

fn parameter_controls(ui: &mut Ui, state: &mut AppState, text: &UiText, features: &[String]) {
    ui.strong(text.parameters_heading);

    ui.label(text.center_parameter);
    let current = state.selection.center.clone().unwrap_or_default();
    egui::ComboBox::from_id_salt("center_parameter")
        .selected_text(&current)
        .width(ui.available_width())
        .show_ui(ui, |ui: &mut Ui| {
            for col in features {
                if ui.selectable_label(current == *col, col).clicked() && current != *col {
                    state.set_center(col.clone());
                }
            }
        });

    ui.add_space(4.0);
    ui.label(text.additional_parameters);
    let options: Vec<String> = state
        .selection
        .additional_options(features)
        .into_iter()
        .cloned()
        .collect();
    for col in &options {
        let mut checked = state.selection.additional.contains(col);
        let label = RichText::new(col).color(state.colors.color_for(col));
        if ui.checkbox(&mut checked, label).changed() {
            state.toggle_additional(col);
        }
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState, text: &UiText) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button(text.menu_file, |ui: &mut Ui| {
            if ui.button(text.menu_open).clicked() {
                open_file_dialog(state, text);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            let selected = state.filtered.as_ref().map_or(0, |f| f.len());
            ui.label(format!(
                "{}: {} {}, {} {}",
                state.source_name.as_deref().unwrap_or("-"),
                ds.len(),
                text.rows_loaded,
                selected,
                text.rows_selected
            ));
            ui.separator();
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(text.status(msg)).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState, text: &UiText) {
    let file = rfd::FileDialog::new()
        .set_title(text.dialog_title)
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        match modbus_dashboard::data::loader::load_file(&path) {
            Ok(dataset) => {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned());
                state.set_dataset(dataset, name);
            }
            Err(e) => {
                log::error!("Failed to load {}: {e:#}", path.display());
                state.set_load_error(&e);
            }
        }
    }
}
