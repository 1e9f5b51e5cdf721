use eframe::egui;

use crate::state::AppState;
use crate::ui::{panels, plot, tables};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct FootStatsApp {
    pub state: AppState,
}

impl Default for FootStatsApp {
    fn default() -> Self {
        let mut state = AppState::default();
        let source = state.settings.source.clone();
        state.load(&source);
        Self { state }
    }
}

impl eframe::App for FootStatsApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar + headline counts ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: axes and filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: charts and tables ----
        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some(err) = &self.state.load_error {
                ui.centered_and_justified(|ui| {
                    ui.heading(
                        egui::RichText::new(format!(
                            "Could not load the data: {err}\nCheck that the CSV file is present (File → Open…)."
                        ))
                        .color(egui::Color32::RED),
                    );
                });
                return;
            }

            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    plot::scatter_plot(ui, &self.state);
                    ui.add_space(8.0);
                    plot::histograms(ui, &self.state);
                    ui.add_space(8.0);
                    tables::leaderboards(ui, &self.state);
                    tables::summaries(ui, &self.state);
                });
        });
    }
}
