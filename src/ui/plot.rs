use eframe::egui::{Align2, Color32, RichText, Ui};
use egui_plot::{Bar, BarChart, Legend, Line, LineStyle, Plot, PlotPoint, PlotPoints, Points, Text};

use footstats::data::stats::Histogram;

use crate::state::{AppState, ChartPoint};

/// Marker radius range; the player with the most minutes gets the largest.
const MIN_RADIUS: f32 = 2.5;
const MAX_RADIUS: f32 = 8.0;

// ---------------------------------------------------------------------------
// Scatter plot (central panel)
// ---------------------------------------------------------------------------

/// Render `stat_y` against `stat_x` for the charted players, coloured by league
/// and sized by minutes played.
pub fn scatter_plot(ui: &mut Ui, state: &AppState) {
    let Some(criteria) = &state.criteria else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a file to explore players  (File → Open…)");
        });
        return;
    };
    let dashboard = &state.dashboard;

    ui.heading(format!("{} vs {}", criteria.stat_y, criteria.stat_x));
    if let Some(msg) = &state.status_message {
        ui.label(RichText::new(msg).color(Color32::from_rgb(230, 160, 30)));
    }
    if dashboard.is_empty() {
        return;
    }

    let max_minutes = dashboard.points.iter().map(|p| p.minutes).fold(0.0, f64::max);
    let hover_points = dashboard.points.clone();
    let (stat_x, stat_y) = (criteria.stat_x.clone(), criteria.stat_y.clone());

    Plot::new("scatter_plot")
        .height(460.0)
        .legend(Legend::default())
        .x_axis_label(criteria.stat_x.as_str())
        .y_axis_label(criteria.stat_y.as_str())
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .label_formatter(move |name, value| hover_text(&hover_points, name, value, &stat_x, &stat_y))
        .show(ui, |plot_ui| {
            // One item per player so markers can be sized by minutes; items
            // sharing a league name share a legend entry.
            for p in &dashboard.points {
                plot_ui.points(
                    Points::new(vec![[p.x, p.y]])
                        .name(&p.league)
                        .color(state.color_map.color_for(&p.league))
                        .radius(marker_radius(p.minutes, max_minutes))
                        .filled(true),
                );
            }

            if let Some(trend) = &dashboard.trend {
                let points: PlotPoints = vec![trend.start, trend.end].into_iter().collect();
                plot_ui.line(
                    Line::new(points)
                        .name("Trend")
                        .color(Color32::RED)
                        .style(LineStyle::dashed_loose())
                        .width(2.0),
                );
            }

            for label in &dashboard.labels {
                let leader: PlotPoints = vec![label.anchor, label.at].into_iter().collect();
                plot_ui.line(Line::new(leader).color(Color32::from_gray(140)).width(1.0));
                plot_ui.text(
                    Text::new(
                        PlotPoint::new(label.at[0], label.at[1]),
                        RichText::new(&label.player).strong(),
                    )
                    .anchor(Align2::LEFT_BOTTOM),
                );
            }
        });

    match &dashboard.correlation {
        Some(Ok(r)) => {
            ui.label(format!("Correlation coefficient: {r:.3}"));
        }
        Some(Err(reason)) => {
            ui.label(RichText::new(format!("Correlation: {reason}")).weak());
        }
        None => {}
    }
}

fn marker_radius(minutes: f64, max_minutes: f64) -> f32 {
    if max_minutes <= 0.0 {
        return MIN_RADIUS;
    }
    let share = (minutes / max_minutes).clamp(0.0, 1.0) as f32;
    MIN_RADIUS + (MAX_RADIUS - MIN_RADIUS) * share
}

/// Tooltip for the marker under the pointer, coordinates elsewhere.
fn hover_text(points: &[ChartPoint], league: &str, at: &PlotPoint, stat_x: &str, stat_y: &str) -> String {
    let hit = points
        .iter()
        .find(|p| p.league == league && p.x == at.x && p.y == at.y);
    match hit {
        Some(p) => format!(
            "{} ({})\n{} · {} · {:.0} min\n{stat_x}: {:.1}\n{stat_y}: {:.1}",
            p.player, p.team, p.league, p.position, p.minutes, p.x, p.y
        ),
        None => format!("{stat_x}: {:.1}\n{stat_y}: {:.1}", at.x, at.y),
    }
}

// ---------------------------------------------------------------------------
// Histograms
// ---------------------------------------------------------------------------

/// Side-by-side distributions of both selected statistics.
pub fn histograms(ui: &mut Ui, state: &AppState) {
    let (Some(criteria), false) = (&state.criteria, state.dashboard.is_empty()) else {
        return;
    };
    let charts = [
        ("x", &criteria.stat_x, &state.dashboard.hist_x),
        ("y", &criteria.stat_y, &state.dashboard.hist_y),
    ];
    ui.columns(2, |cols| {
        for (col, (axis, stat, hist)) in cols.iter_mut().zip(charts) {
            col.strong(format!("Distribution – {stat}"));
            if let Some(hist) = hist {
                histogram_plot(col, axis, stat, hist, state);
            }
        }
    });
}

fn histogram_plot(ui: &mut Ui, axis: &str, stat: &str, hist: &Histogram, state: &AppState) {
    let width = hist.bin_width * 0.95;
    Plot::new(("histogram", axis))
        .height(240.0)
        .x_axis_label(stat)
        .y_axis_label("Players")
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            // Stack one bar series per league on top of the previous ones.
            let mut charts: Vec<BarChart> = Vec::new();
            for (league, counts) in &hist.by_group {
                let bars: Vec<Bar> = counts
                    .iter()
                    .enumerate()
                    .map(|(i, &n)| Bar::new(hist.bin_center(i), n as f64).width(width))
                    .collect();
                let below: Vec<&BarChart> = charts.iter().collect();
                let chart = BarChart::new(bars)
                    .name(league)
                    .color(state.color_map.color_for(league))
                    .stack_on(&below);
                charts.push(chart);
            }
            for chart in charts {
                plot_ui.bar_chart(chart);
            }
        });
    ui.add_space(4.0);
}
