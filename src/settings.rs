use std::collections::BTreeSet;
use std::ops::RangeInclusive;
use std::path::PathBuf;

use crate::data::filter::{self, FilterCriteria};
use crate::data::model::{Dataset, PlayerRecord};
use crate::data::schema::{self, LEAGUE, POSITION};
use crate::data::stats::DEFAULT_BINS;

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

/// File read at startup, relative to the working directory.
pub const DEFAULT_SOURCE: &str = "df_Big2025.csv";

pub const DEFAULT_MIN_MINUTES: f64 = 500.0;

pub const PLAYER_CAP_RANGE: RangeInclusive<usize> = 10..=200;
pub const DEFAULT_PLAYER_CAP: usize = 50;

/// Leagues ticked when a file opens, in order of appearance.
pub const DEFAULT_LEAGUE_COUNT: usize = 3;

pub const LABEL_RANGE: RangeInclusive<usize> = 0..=20;
pub const DEFAULT_LABELS: usize = 10;

/// Dashboard-wide settings.  Nothing is read from disk; these are the
/// values every session starts from.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub source: PathBuf,
    pub min_minutes: f64,
    pub max_players: usize,
    pub num_labels: usize,
    pub league_count: usize,
    pub histogram_bins: usize,
    /// Apply the position filter when the file has a position column.
    pub filter_positions: bool,
    pub show_trendline: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            source: PathBuf::from(DEFAULT_SOURCE),
            min_minutes: DEFAULT_MIN_MINUTES,
            max_players: DEFAULT_PLAYER_CAP,
            num_labels: DEFAULT_LABELS,
            league_count: DEFAULT_LEAGUE_COUNT,
            histogram_bins: DEFAULT_BINS,
            filter_positions: true,
            show_trendline: false,
        }
    }
}

impl Settings {
    /// Starting criteria for a freshly loaded dataset: default axes, the first
    /// `league_count` leagues of the cleaned records and every position.
    /// `None` when the file has fewer than one statistic to plot.
    pub fn initial_criteria(&self, dataset: &Dataset) -> Option<FilterCriteria> {
        let stats = schema::available_stats(&dataset.schema, &schema::default_excluded());
        let (stat_x, stat_y) = schema::default_axes(&stats)?;

        let positions = (self.filter_positions && dataset.schema.has_position())
            .then(|| dataset.categories.get(POSITION).cloned().unwrap_or_default());

        let mut criteria = FilterCriteria {
            stat_x,
            stat_y,
            min_minutes: self.min_minutes,
            leagues: BTreeSet::new(),
            positions,
            max_players: self.max_players,
            num_labels: self.num_labels,
        };
        let cleaned = filter::clean(&dataset.records, &criteria.required_fields());
        criteria.leagues = first_seen(&cleaned, LEAGUE, self.league_count);
        let cap = player_cap_range(cleaned.len());
        criteria.max_players = criteria.max_players.clamp(*cap.start(), *cap.end());
        Some(criteria)
    }
}

/// Player-cap slider bounds when `players` records survive cleaning.
pub fn player_cap_range(players: usize) -> RangeInclusive<usize> {
    let (lo, hi) = (*PLAYER_CAP_RANGE.start(), *PLAYER_CAP_RANGE.end());
    lo..=players.clamp(lo, hi)
}

fn first_seen(view: &[&PlayerRecord], column: &str, n: usize) -> BTreeSet<String> {
    let mut seen: Vec<&str> = Vec::new();
    for value in view.iter().filter_map(|rec| rec.text_value(column)) {
        if seen.len() == n {
            break;
        }
        if !seen.contains(&value) {
            seen.push(value);
        }
    }
    seen.into_iter().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::schema::{Schema, MINUTES, PLAYER, TEAM};

    fn player(row: usize, league: &str, position: &str) -> PlayerRecord {
        PlayerRecord::new(row)
            .with_text(PLAYER, &format!("P{row}"))
            .with_text(LEAGUE, league)
            .with_text(POSITION, position)
            .with_stat(MINUTES, 900.0)
            .with_stat("Buts", 1.0)
            .with_stat("Passes decisives", 1.0)
    }

    fn dataset(with_position: bool, records: Vec<PlayerRecord>) -> Dataset {
        let mut columns = vec![PLAYER.to_string(), TEAM.into(), LEAGUE.into()];
        if with_position {
            columns.push(POSITION.into());
        }
        columns.extend([MINUTES.to_string(), "Buts".into(), "Passes decisives".into()]);
        let schema = Schema {
            numeric: vec![MINUTES.into(), "Buts".into(), "Passes decisives".into()],
            columns,
            ..Default::default()
        };
        Dataset::from_records(PathBuf::from(DEFAULT_SOURCE), schema, records)
    }

    #[test]
    fn initial_criteria_selects_axes_and_every_position() {
        let ds = dataset(true, vec![player(0, "Ligue 1", "FW"), player(1, "Serie A", "DF")]);
        let crit = Settings::default().initial_criteria(&ds).unwrap();
        assert_eq!(crit.stat_x, "Buts");
        assert_eq!(crit.stat_y, "Passes decisives");
        assert_eq!(crit.leagues.len(), 2);
        assert_eq!(crit.positions.map(|p| p.len()), Some(2));
        assert_eq!(crit.min_minutes, DEFAULT_MIN_MINUTES);
    }

    #[test]
    fn initial_leagues_are_the_first_three_seen() {
        let mut records = vec![
            player(0, "Serie A", "FW"),
            // missing a stat, so its league is not offered first
            PlayerRecord::new(1)
                .with_text(PLAYER, "P1")
                .with_text(LEAGUE, "Eredivisie")
                .with_text(POSITION, "FW")
                .with_stat(MINUTES, 900.0),
            player(2, "Ligue 1", "MF"),
            player(3, "Serie A", "DF"),
            player(4, "Bundesliga", "FW"),
            player(5, "La Liga", "FW"),
        ];
        records.push(player(6, "Eredivisie", "GK"));
        let crit = Settings::default().initial_criteria(&dataset(true, records)).unwrap();

        let expected: BTreeSet<String> = ["Serie A", "Ligue 1", "Bundesliga"]
            .iter()
            .map(|l| l.to_string())
            .collect();
        assert_eq!(crit.leagues, expected);
    }

    #[test]
    fn player_cap_shrinks_to_the_cleaned_players() {
        assert_eq!(player_cap_range(0), 10..=10);
        assert_eq!(player_cap_range(37), 10..=37);
        assert_eq!(player_cap_range(5000), PLAYER_CAP_RANGE);

        let ds = dataset(true, (0..30).map(|i| player(i, "Ligue 1", "FW")).collect());
        assert_eq!(Settings::default().initial_criteria(&ds).unwrap().max_players, 30);
    }

    #[test]
    fn position_clause_is_off_without_a_position_column() {
        let ds = dataset(false, vec![player(0, "Ligue 1", "FW")]);
        let crit = Settings::default().initial_criteria(&ds).unwrap();
        assert_eq!(crit.positions, None);
    }
}
