use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use footstats::data::schema::{LEAGUE, POSITION};
use footstats::settings::LABEL_RANGE;

use crate::state::AppState;

/// Selection edits that need `&mut AppState` once the widgets are done with it.
enum Action {
    Toggle(&'static str, String),
    All(&'static str),
    Clear(&'static str),
}

// ---------------------------------------------------------------------------
// Left side panel – axes and filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Settings");
    ui.separator();

    let Some(criteria) = state.criteria.as_mut() else {
        ui.label("No dataset loaded.");
        return;
    };

    let mut changed = false;
    let mut action = None;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Axis selectors ----
            ui.strong("Statistics to compare");
            changed |= stat_combo(ui, "stat_x", "X axis", &mut criteria.stat_x, &state.stats);
            changed |= stat_combo(ui, "stat_y", "Y axis", &mut criteria.stat_y, &state.stats);
            ui.separator();

            // ---- Filters ----
            ui.strong("Filters");
            let bound = state.minutes_bound.max(criteria.min_minutes);
            changed |= ui
                .add(
                    egui::Slider::new(&mut criteria.min_minutes, 0.0..=bound)
                        .step_by(10.0)
                        .text("Minimum minutes"),
                )
                .changed();

            let n_leagues = criteria.leagues.len();
            egui::CollapsingHeader::new(
                RichText::new(format!("Leagues  ({n_leagues}/{})", state.leagues.len())).strong(),
            )
            .id_salt("leagues")
            .default_open(true)
            .show(ui, |ui: &mut Ui| {
                all_none_buttons(ui, LEAGUE, &mut action);
                for league in &state.leagues {
                    let text = RichText::new(league).color(state.color_map.color_for(league));
                    let mut checked = criteria.leagues.contains(league);
                    if ui.checkbox(&mut checked, text).changed() {
                        action = Some(Action::Toggle(LEAGUE, league.clone()));
                    }
                }
            });

            if let Some(selected) = &criteria.positions {
                let n_positions = selected.len();
                egui::CollapsingHeader::new(
                    RichText::new(format!("Positions  ({n_positions}/{})", state.positions.len()))
                        .strong(),
                )
                .id_salt("positions")
                .default_open(false)
                .show(ui, |ui: &mut Ui| {
                    all_none_buttons(ui, POSITION, &mut action);
                    for position in &state.positions {
                        let mut checked = selected.contains(position);
                        if ui.checkbox(&mut checked, position).changed() {
                            action = Some(Action::Toggle(POSITION, position.clone()));
                        }
                    }
                });
            }
            ui.separator();

            // ---- Display ----
            ui.strong("Display");
            let cap = state.player_cap.clone();
            changed |= ui
                .add(egui::Slider::new(&mut criteria.max_players, cap).text("Players"))
                .changed();
            changed |= ui
                .add(egui::Slider::new(&mut criteria.num_labels, LABEL_RANGE).text("Name labels"))
                .changed();
            changed |= ui
                .checkbox(&mut state.show_trendline, "Trend line")
                .changed();
        });

    match action {
        Some(Action::Toggle(column, value)) => state.toggle(column, &value),
        Some(Action::All(column)) => state.select_all(column),
        Some(Action::Clear(column)) => state.select_none(column),
        None if changed => state.refresh(),
        None => {}
    }
}

fn all_none_buttons(ui: &mut Ui, column: &'static str, action: &mut Option<Action>) {
    ui.horizontal(|ui: &mut Ui| {
        if ui.small_button("All").clicked() {
            *action = Some(Action::All(column));
        }
        if ui.small_button("None").clicked() {
            *action = Some(Action::Clear(column));
        }
    });
}

/// A combo box over the available statistics; `true` when the pick changed.
fn stat_combo(ui: &mut Ui, id: &str, label: &str, current: &mut String, stats: &[String]) -> bool {
    let mut changed = false;
    ui.horizontal(|ui: &mut Ui| {
        ui.label(label);
        egui::ComboBox::from_id_salt(id)
            .selected_text(current.as_str())
            .show_ui(ui, |ui: &mut Ui| {
                for stat in stats {
                    if ui.selectable_label(current == stat, stat).clicked() && current != stat {
                        *current = stat.clone();
                        changed = true;
                    }
                }
            });
    });
    changed
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(o) = &state.overview {
            let optional = |v: Option<usize>| v.map_or_else(|| "N/A".to_string(), |n| n.to_string());
            ui.label(format!(
                "{} players · {} leagues · {} teams · {} positions",
                o.players,
                o.leagues,
                optional(o.teams),
                optional(o.positions),
            ));
            ui.separator();
            ui.label(format!(
                "{} matching, {} charted",
                state.dashboard.matched,
                state.dashboard.points.len()
            ));
            ui.separator();

            if ui.button("Copy summary as JSON").clicked() {
                copy_summary(ui, state);
            }
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::from_rgb(230, 160, 30)));
        }
    });
}

fn copy_summary(ui: &Ui, state: &AppState) {
    let Some(criteria) = &state.criteria else {
        return;
    };
    let d = &state.dashboard;
    let value = serde_json::json!({
        "stat_x": criteria.stat_x,
        "stat_y": criteria.stat_y,
        "players": d.points.len(),
        "summary_x": d.summary_x,
        "summary_y": d.summary_y,
        "correlation": d.correlation.as_ref().and_then(|r| r.as_ref().ok()),
        "trend": d.trend.map(|t| t.fit),
    });
    match serde_json::to_string_pretty(&value) {
        Ok(text) => ui.ctx().copy_text(text),
        Err(e) => log::error!("Failed to serialize summary: {e}"),
    }
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open player statistics")
        .add_filter("Supported files", &["csv", "tsv", "json"])
        .add_filter("CSV", &["csv"])
        .add_filter("TSV", &["tsv"])
        .add_filter("JSON", &["json"])
        .pick_file();

    if let Some(path) = file {
        state.load(&path);
        if let Some(ds) = &state.dataset {
            log::info!(
                "Exploring {} players with statistics {:?}",
                ds.len(),
                state.stats
            );
        }
    }
}
