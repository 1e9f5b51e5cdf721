use std::collections::BTreeSet;

use super::error::{EngineError, Result};
use super::model::{Dataset, PlayerRecord};
use super::schema::{Schema, LEAGUE, MINUTES, PLAYER, POSITION};

/// Records that survived cleaning and filtering, borrowed from the dataset in
/// file order.
pub type FilteredView<'a> = Vec<&'a PlayerRecord>;

// ---------------------------------------------------------------------------
// Filter criteria: what the user picked for this render
// ---------------------------------------------------------------------------

/// User-chosen constraints for one render cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCriteria {
    pub stat_x: String,
    pub stat_y: String,
    /// Inclusive lower bound on minutes played.
    pub min_minutes: f64,
    pub leagues: BTreeSet<String>,
    /// `None` when the position clause is not applied at all.
    pub positions: Option<BTreeSet<String>>,
    /// Cap on the number of players on the main chart.
    pub max_players: usize,
    /// How many of the charted players get a name label.
    pub num_labels: usize,
}

impl FilterCriteria {
    /// Columns a record must have to take part in this view.
    pub fn required_fields(&self) -> Vec<&str> {
        let mut fields = vec![
            self.stat_x.as_str(),
            self.stat_y.as_str(),
            MINUTES,
            LEAGUE,
            PLAYER,
        ];
        if self.positions.is_some() {
            fields.push(POSITION);
        }
        fields
    }

    /// Labels never outnumber the charted players.
    pub fn label_count(&self) -> usize {
        self.num_labels.min(self.max_players)
    }

    pub fn validate(&self, schema: &Schema) -> Result<()> {
        for key in [&self.stat_x, &self.stat_y] {
            if !schema.is_numeric(key) {
                return Err(EngineError::UnknownStat(key.clone()));
            }
        }
        if !(self.min_minutes >= 0.0) {
            return Err(EngineError::InvalidCriteria(format!(
                "minimum minutes must be a non-negative number, got {}",
                self.min_minutes
            )));
        }
        if self.max_players == 0 {
            return Err(EngineError::InvalidCriteria(
                "player cap must be at least 1".into(),
            ));
        }
        if self.positions.is_some() && !schema.has_position() {
            return Err(EngineError::InvalidCriteria(format!(
                "position filter requested but the file has no '{POSITION}' column"
            )));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Cleaner
// ---------------------------------------------------------------------------

/// Drop every record missing a value in any of `required`, keeping order.
pub fn clean<'a, I>(records: I, required: &[&str]) -> FilteredView<'a>
where
    I: IntoIterator<Item = &'a PlayerRecord>,
{
    records
        .into_iter()
        .filter(|rec| required.iter().all(|col| rec.has_value(col)))
        .collect()
}

// ---------------------------------------------------------------------------
// Filter engine
// ---------------------------------------------------------------------------

/// Return the records that pass all predicates.
///
/// A record passes when:
/// * its minutes played are at least `min_minutes`
/// * its league is in `leagues` (an empty set selects nothing)
/// * when a position set is given, its position is in it (empty → nothing)
pub fn filter<'a>(view: &[&'a PlayerRecord], criteria: &FilterCriteria) -> FilteredView<'a> {
    if criteria.leagues.is_empty() {
        return Vec::new();
    }
    if matches!(&criteria.positions, Some(p) if p.is_empty()) {
        return Vec::new();
    }

    view.iter()
        .copied()
        .filter(|rec| {
            let Some(minutes) = rec.minutes() else {
                return false;
            };
            if minutes < criteria.min_minutes {
                return false;
            }
            match rec.league() {
                Some(league) if criteria.leagues.contains(league) => {}
                _ => return false,
            }
            match &criteria.positions {
                None => true,
                Some(selected) => rec.position().is_some_and(|p| selected.contains(p)),
            }
        })
        .collect()
}

/// Clean then filter: the records the current view is built from.
pub fn select<'a>(dataset: &'a Dataset, criteria: &FilterCriteria) -> FilteredView<'a> {
    let cleaned = clean(&dataset.records, &criteria.required_fields());
    let view = filter(&cleaned, criteria);
    log::debug!(
        "{} of {} players kept ({} after cleaning)",
        view.len(),
        dataset.len(),
        cleaned.len()
    );
    view
}

/// Upper bound for the minutes slider.
pub fn max_minutes(view: &[&PlayerRecord]) -> Option<f64> {
    view.iter()
        .filter_map(|rec| rec.minutes())
        .fold(None, |acc, m| Some(acc.map_or(m, |a: f64| a.max(m))))
}

/// Distinct values of a text column within `view`, sorted.
pub fn distinct(view: &[&PlayerRecord], column: &str) -> BTreeSet<String> {
    view.iter()
        .filter_map(|rec| rec.text_value(column))
        .map(str::to_string)
        .collect()
}
