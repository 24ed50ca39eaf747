use eframe::egui;

use modbus_dashboard::config::DashboardConfig;
use modbus_dashboard::state::AppState;

use crate::ui::text::UiText;
use crate::ui::{panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct DashboardApp {
    pub state: AppState,
    text: &'static UiText,
}

impl DashboardApp {
    pub fn new(config: DashboardConfig) -> Self {
        let text = UiText::for_language(config.language);
        Self {
            state: AppState::new(config),
            text,
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state, self.text);
        });

        // ---- Left side panel: window and parameters ----
        egui::SidePanel::left("control_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state, self.text);
            });

        // ---- Central panel: table preview and charts ----
        egui::CentralPanel::default().show(ctx, |ui| {
            table::preview_table(ui, &mut self.state, self.text);
            ui.separator();
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    plot::series_charts(ui, &self.state, self.text);
                });
        });
    }
}
