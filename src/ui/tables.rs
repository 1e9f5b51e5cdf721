use eframe::egui::{self, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use footstats::data::rank::LEADERBOARD_SIZE;
use footstats::data::schema::{LEAGUE, PLAYER, TEAM};
use footstats::data::stats::Summary;

use crate::state::{AppState, ChartPoint};

// ---------------------------------------------------------------------------
// Leaderboards
// ---------------------------------------------------------------------------

/// Top players for each selected statistic, side by side.
pub fn leaderboards(ui: &mut Ui, state: &AppState) {
    let (Some(criteria), false) = (&state.criteria, state.dashboard.is_empty()) else {
        return;
    };
    ui.heading("Rankings");
    let boards = [
        (&criteria.stat_x, &state.dashboard.top_x, true),
        (&criteria.stat_y, &state.dashboard.top_y, false),
    ];
    ui.columns(2, |cols| {
        for (col, (stat, rows, is_x)) in cols.iter_mut().zip(boards) {
            col.strong(format!("Top {LEADERBOARD_SIZE} – {stat}"));
            col.push_id((stat.as_str(), is_x), |ui: &mut Ui| leaderboard_table(ui, stat, rows, is_x));
        }
    });
}

fn leaderboard_table(ui: &mut Ui, stat: &str, rows: &[ChartPoint], is_x: bool) {
    TableBuilder::new(ui)
        .striped(true)
        .vscroll(false)
        .column(Column::initial(140.0).resizable(true).clip(true))
        .column(Column::initial(110.0).resizable(true).clip(true))
        .column(Column::initial(90.0).resizable(true).clip(true))
        .column(Column::remainder().at_least(50.0))
        .header(22.0, |mut header| {
            for title in [PLAYER, TEAM, LEAGUE, stat] {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|mut body| {
            for row in rows {
                let value = if is_x { row.x } else { row.y };
                body.row(20.0, |mut r| {
                    r.col(|ui| {
                        ui.label(&row.player);
                    });
                    r.col(|ui| {
                        ui.label(&row.team);
                    });
                    r.col(|ui| {
                        ui.label(&row.league);
                    });
                    r.col(|ui| {
                        ui.label(format!("{value:.1}"));
                    });
                });
            }
        });
}

// ---------------------------------------------------------------------------
// Descriptive statistics
// ---------------------------------------------------------------------------

pub fn summaries(ui: &mut Ui, state: &AppState) {
    let (Some(criteria), false) = (&state.criteria, state.dashboard.is_empty()) else {
        return;
    };
    egui::CollapsingHeader::new(RichText::new("Descriptive statistics").strong())
        .id_salt("summaries")
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            let blocks = [
                (&criteria.stat_x, state.dashboard.summary_x),
                (&criteria.stat_y, state.dashboard.summary_y),
            ];
            ui.columns(2, |cols| {
                for (col, (stat, summary)) in cols.iter_mut().zip(blocks) {
                    col.strong(stat.as_str());
                    match summary {
                        Some(s) => summary_lines(col, &s),
                        None => {
                            col.label("Not computable");
                        }
                    }
                }
            });
        });
}

fn summary_lines(ui: &mut Ui, s: &Summary) {
    ui.label(format!("• Mean: {:.2}", s.mean));
    ui.label(format!("• Median: {:.2}", s.median));
    match s.stddev {
        Some(sd) => ui.label(format!("• Std. dev.: {sd:.2}")),
        None => ui.label("• Std. dev.: n/a"),
    };
    ui.label(format!("• Maximum: {:.2}", s.max));
}
