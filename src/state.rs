use std::collections::BTreeSet;
use std::ops::RangeInclusive;
use std::path::Path;
use std::sync::Arc;

use footstats::data::filter::{self, FilterCriteria};
use footstats::data::model::{Dataset, PlayerRecord};
use footstats::data::rank::{self, Label};
use footstats::data::schema::{self, LEAGUE, POSITION};
use footstats::data::stats::{self, Histogram, Overview, Summary};
use footstats::data::trend::{self, TrendLine};
use footstats::data::{EngineError, Result};
use footstats::settings::{self, Settings, PLAYER_CAP_RANGE};

use crate::color::ColorMap;

// ---------------------------------------------------------------------------
// Render-ready outputs
// ---------------------------------------------------------------------------

/// One charted player, copied out of the dataset so the UI owns it.
#[derive(Debug, Clone)]
pub struct ChartPoint {
    pub player: String,
    pub team: String,
    pub league: String,
    pub position: String,
    pub minutes: f64,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone)]
pub struct ChartLabel {
    pub player: String,
    /// Marker position.
    pub anchor: [f64; 2],
    /// Where the text goes.
    pub at: [f64; 2],
}

/// Everything the central panel draws for the current criteria.
#[derive(Debug, Clone, Default)]
pub struct Dashboard {
    /// Players left after cleaning and filtering, before the player cap.
    pub matched: usize,
    pub points: Vec<ChartPoint>,
    pub labels: Vec<ChartLabel>,
    pub trend: Option<TrendLine>,
    /// Correlation, or why it could not be computed.
    pub correlation: Option<std::result::Result<f64, String>>,
    pub hist_x: Option<Histogram>,
    pub hist_y: Option<Histogram>,
    pub top_x: Vec<ChartPoint>,
    pub top_y: Vec<ChartPoint>,
    pub summary_x: Option<Summary>,
    pub summary_y: Option<Summary>,
}

fn chart_point(rec: &PlayerRecord, key_x: &str, key_y: &str) -> ChartPoint {
    ChartPoint {
        player: rec.player().unwrap_or_default().to_string(),
        team: rec.team().unwrap_or_default().to_string(),
        league: rec.league().unwrap_or_default().to_string(),
        position: rec.position().unwrap_or_default().to_string(),
        minutes: rec.minutes().unwrap_or_default(),
        x: rec.stat(key_x).unwrap_or_default(),
        y: rec.stat(key_y).unwrap_or_default(),
    }
}

fn chart_label(label: &Label, key_x: &str, key_y: &str) -> ChartLabel {
    let p = chart_point(label.record, key_x, key_y);
    ChartLabel {
        player: p.player,
        anchor: [p.x, p.y],
        at: [p.x + label.offset[0], p.y + label.offset[1]],
    }
}

impl Dashboard {
    /// Run the whole engine pipeline for one set of criteria.
    ///
    /// Errors only when the view is non-empty but a ranking still fails;
    /// an empty view yields an empty dashboard.
    pub fn build(dataset: &Dataset, criteria: &FilterCriteria, bins: usize, with_trend: bool) -> Result<Self> {
        let (kx, ky) = (criteria.stat_x.as_str(), criteria.stat_y.as_str());

        let view = filter::select(dataset, criteria);
        if view.is_empty() {
            return Ok(Dashboard::default());
        }

        // Scores come from the whole view; the capped selection is what every
        // chart and table below shows.
        let ranked = rank::top_n_combined(&view, kx, ky, criteria.max_players)?;
        let labels = rank::labels(&ranked, kx, ky, criteria.label_count())
            .iter()
            .map(|l| chart_label(l, kx, ky))
            .collect();
        let charted: Vec<&PlayerRecord> = ranked.iter().map(|r| r.record).collect();

        let trend = if with_trend {
            trend::trend_line(&charted, kx, ky)
                .map_err(|e| log::info!("Trend line skipped: {e}"))
                .ok()
        } else {
            None
        };

        let to_points = |recs: Vec<&PlayerRecord>| {
            recs.into_iter().map(|r| chart_point(r, kx, ky)).collect::<Vec<_>>()
        };

        Ok(Dashboard {
            matched: view.len(),
            points: to_points(charted.clone()),
            labels,
            trend,
            correlation: Some(stats::correlation(&charted, kx, ky).map_err(|e| e.to_string())),
            hist_x: stats::histogram(&charted, kx, bins).ok(),
            hist_y: stats::histogram(&charted, ky, bins).ok(),
            top_x: to_points(rank::leaderboard(&charted, kx)),
            top_y: to_points(rank::leaderboard(&charted, ky)),
            summary_x: stats::summarize(&charted, kx).ok(),
            summary_y: stats::summarize(&charted, ky).ok(),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub settings: Settings,

    /// Loaded dataset (None until a file loads).
    pub dataset: Option<Arc<Dataset>>,
    pub overview: Option<Overview>,

    /// Current user selection.
    pub criteria: Option<FilterCriteria>,

    /// Axis choices.
    pub stats: Vec<String>,
    /// League / position choices present after cleaning.
    pub leagues: Vec<String>,
    pub positions: Vec<String>,
    /// Slider bound for minimum minutes.
    pub minutes_bound: f64,
    /// Player-cap slider bounds, shrunk to the cleaned player count.
    pub player_cap: RangeInclusive<usize>,

    pub show_trendline: bool,
    pub dashboard: Dashboard,
    pub color_map: ColorMap,

    /// Blocking error: nothing renders until another file is loaded.
    pub load_error: Option<String>,
    /// Non-blocking warning shown above the charts.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        let settings = Settings::default();
        Self {
            show_trendline: settings.show_trendline,
            settings,
            dataset: None,
            overview: None,
            criteria: None,
            stats: Vec::new(),
            leagues: Vec::new(),
            positions: Vec::new(),
            minutes_bound: 0.0,
            player_cap: PLAYER_CAP_RANGE,
            dashboard: Dashboard::default(),
            color_map: ColorMap::default(),
            load_error: None,
            status_message: None,
        }
    }
}

impl AppState {
    /// Load `path` through the process-wide cache and reset the selection.
    pub fn load(&mut self, path: &Path) {
        match footstats::data::loader::load_cached(path) {
            Ok(dataset) => self.set_dataset(dataset),
            Err(e) => {
                log::error!("Failed to load {}: {e}", path.display());
                self.load_error = Some(e.to_string());
                self.dataset = None;
                self.criteria = None;
                self.dashboard = Dashboard::default();
            }
        }
    }

    /// Ingest a newly loaded dataset, initialise criteria and colours.
    pub fn set_dataset(&mut self, dataset: Arc<Dataset>) {
        self.stats = schema::available_stats(&dataset.schema, &schema::default_excluded());
        self.criteria = self.settings.initial_criteria(&dataset);
        self.overview = Some(stats::overview(&dataset));
        self.color_map = dataset
            .categories
            .get(LEAGUE)
            .map(ColorMap::new)
            .unwrap_or_default();
        self.load_error = None;
        if self.criteria.is_none() {
            self.status_message = Some("The file has no numeric statistic to plot.".into());
        }
        self.dataset = Some(dataset);
        self.refresh();
    }

    /// Recompute choices and the dashboard after any input change.
    pub fn refresh(&mut self) {
        let (Some(ds), Some(criteria)) = (&self.dataset, self.criteria.as_mut()) else {
            return;
        };

        let cleaned = filter::clean(&ds.records, &criteria.required_fields());
        self.leagues = filter::distinct(&cleaned, LEAGUE).into_iter().collect();
        self.positions = filter::distinct(&cleaned, POSITION).into_iter().collect();
        self.minutes_bound = filter::max_minutes(&cleaned).unwrap_or(0.0);
        self.player_cap = settings::player_cap_range(cleaned.len());
        criteria.max_players = criteria
            .max_players
            .clamp(*self.player_cap.start(), *self.player_cap.end());

        if criteria.leagues.is_empty() || criteria.positions.as_ref().is_some_and(|p| p.is_empty()) {
            self.dashboard = Dashboard::default();
            self.status_message = Some("Select at least one league and one position.".into());
            return;
        }

        if let Err(e) = criteria.validate(&ds.schema) {
            self.dashboard = Dashboard::default();
            self.status_message = Some(e.to_string());
            return;
        }

        match Dashboard::build(ds, criteria, self.settings.histogram_bins, self.show_trendline) {
            Ok(dashboard) => {
                self.status_message = dashboard
                    .is_empty()
                    .then(|| "No player matches the selected filters.".to_string());
                self.dashboard = dashboard;
            }
            Err(e @ (EngineError::EmptyInput(_) | EngineError::InsufficientData(_))) => {
                self.dashboard = Dashboard::default();
                self.status_message = Some(e.to_string());
            }
            Err(e) => {
                log::error!("Dashboard computation failed: {e}");
                self.dashboard = Dashboard::default();
                self.status_message = Some(e.to_string());
            }
        }
    }

    /// Toggle one value of a league / position selection.
    pub fn toggle(&mut self, column: &str, value: &str) {
        let Some(set) = self.selection_mut(column) else {
            return;
        };
        if !set.remove(value) {
            set.insert(value.to_string());
        }
        self.refresh();
    }

    pub fn select_all(&mut self, column: &str) {
        let all: Vec<String> = if column == LEAGUE {
            self.leagues.clone()
        } else {
            self.positions.clone()
        };
        if let Some(set) = self.selection_mut(column) {
            set.extend(all);
            self.refresh();
        }
    }

    pub fn select_none(&mut self, column: &str) {
        if let Some(set) = self.selection_mut(column) {
            set.clear();
            self.refresh();
        }
    }

    fn selection_mut(&mut self, column: &str) -> Option<&mut BTreeSet<String>> {
        let criteria = self.criteria.as_mut()?;
        match column {
            LEAGUE => Some(&mut criteria.leagues),
            POSITION => criteria.positions.as_mut(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use footstats::data::schema::{Schema, MINUTES, PLAYER, TEAM};

    use super::*;

    fn player(row: usize, goals: f64, assists: f64) -> PlayerRecord {
        PlayerRecord::new(row)
            .with_text(PLAYER, &format!("P{row}"))
            .with_text(TEAM, "PSG")
            .with_text(LEAGUE, "Ligue 1")
            .with_text(POSITION, "FW")
            .with_stat(MINUTES, 900.0 + row as f64)
            .with_stat("Buts", goals)
            .with_stat("Passes decisives", assists)
    }

    fn criteria(max_players: usize, num_labels: usize) -> FilterCriteria {
        FilterCriteria {
            stat_x: "Buts".into(),
            stat_y: "Passes decisives".into(),
            min_minutes: 0.0,
            leagues: BTreeSet::from(["Ligue 1".to_string()]),
            positions: None,
            max_players,
            num_labels,
        }
    }

    #[test]
    fn capped_dashboard_labels_the_best_ranked_player() {
        // P0 holds the goals maximum but is cut by the cap.
        let records = vec![
            player(0, 100.0, 0.0),
            player(1, 60.0, 10.0),
            player(2, 90.0, 6.9),
            player(3, 50.0, 9.5),
        ];
        let ds = Dataset::from_records(PathBuf::from("season.csv"), Schema::default(), records);
        let dashboard = Dashboard::build(&ds, &criteria(3, 1), 10, false).unwrap();

        assert_eq!(dashboard.matched, 4);
        let charted: Vec<&str> = dashboard.points.iter().map(|p| p.player.as_str()).collect();
        assert_eq!(charted, vec!["P1", "P2", "P3"]);

        assert_eq!(dashboard.labels.len(), 1);
        let label = &dashboard.labels[0];
        assert_eq!(label.player, "P1");
        assert_eq!(label.anchor, [60.0, 10.0]);
        assert!((label.at[1] - 10.3).abs() < 1e-9);
    }

    #[test]
    fn chart_points_carry_position_and_minutes() {
        let ds = Dataset::from_records(
            PathBuf::from("season.csv"),
            Schema::default(),
            vec![player(0, 3.0, 1.0), player(1, 1.0, 2.0)],
        );
        let dashboard = Dashboard::build(&ds, &criteria(10, 0), 10, true).unwrap();

        assert!(dashboard.labels.is_empty());
        assert!(dashboard.trend.is_some());
        let first = &dashboard.points[0];
        assert_eq!(first.position, "FW");
        assert_eq!(first.minutes, 900.0);
        assert_eq!(first.team, "PSG");
    }
}
