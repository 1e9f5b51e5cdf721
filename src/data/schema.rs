use std::collections::{BTreeSet, HashSet};

use serde::Serialize;

use super::error::{EngineError, Result};
use super::model::CellValue;

// ---------------------------------------------------------------------------
// Column names of the source layout
// ---------------------------------------------------------------------------

pub const PLAYER: &str = "Joueur";
pub const TEAM: &str = "Equipe";
pub const LEAGUE: &str = "Ligue";
pub const POSITION: &str = "Position";
pub const MINUTES: &str = "Minutes jouees";

/// Number of leading identity columns before the statistics start.
pub const IDENTITY_OFFSET: usize = 4;

/// Columns that are never offered as a statistic, wherever they appear.
pub const IDENTITY_COLUMNS: [&str; 4] = [POSITION, LEAGUE, TEAM, PLAYER];

/// Columns a file must carry to be explored at all.
const REQUIRED_COLUMNS: [&str; 3] = [PLAYER, LEAGUE, MINUTES];

pub const DEFAULT_STAT_X: &str = "Buts";
pub const DEFAULT_STAT_Y: &str = "Passes decisives";

// ---------------------------------------------------------------------------
// Schema descriptor
// ---------------------------------------------------------------------------

/// Explicit description of the loaded columns.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Schema {
    /// All columns in source order.
    pub columns: Vec<String>,
    /// The leading identity columns.
    pub identity: Vec<String>,
    /// Numeric columns past the identity block, in source order.
    pub numeric: Vec<String>,
    /// Every other column, stored as text.
    pub text: Vec<String>,
}

impl Schema {
    /// Classify `headers` from the parsed cells.  A column past the identity
    /// block is numeric when every non-missing cell parsed as a number.
    pub fn infer(headers: &[String], rows: &[Vec<CellValue>]) -> Self {
        let mut schema = Schema {
            columns: headers.to_vec(),
            ..Default::default()
        };

        for (idx, col) in headers.iter().enumerate() {
            let is_identity =
                idx < IDENTITY_OFFSET || IDENTITY_COLUMNS.contains(&col.as_str());
            if idx < IDENTITY_OFFSET {
                schema.identity.push(col.clone());
            }
            if is_identity {
                schema.text.push(col.clone());
                continue;
            }

            let all_numeric = rows.iter().all(|row| {
                matches!(row.get(idx), None | Some(CellValue::Null | CellValue::Number(_)))
            });
            if all_numeric {
                schema.numeric.push(col.clone());
            } else {
                log::warn!("Column '{col}' is not numeric, it will not be offered as a statistic");
                schema.text.push(col.clone());
            }
        }
        schema
    }

    /// Fail fast on files that cannot drive the explorer.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for col in &self.columns {
            if !seen.insert(col.as_str()) {
                return Err(EngineError::Schema(format!("duplicated column '{col}'")));
            }
        }
        for required in REQUIRED_COLUMNS {
            if !self.has_column(required) {
                return Err(EngineError::Schema(format!(
                    "missing required column '{required}'"
                )));
            }
        }
        if !self.is_numeric(MINUTES) {
            return Err(EngineError::Schema(format!(
                "column '{MINUTES}' must be numeric"
            )));
        }
        Ok(())
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    pub fn is_numeric(&self, column: &str) -> bool {
        self.numeric.iter().any(|c| c == column)
    }

    pub fn has_position(&self) -> bool {
        self.has_column(POSITION)
    }

    pub fn has_team(&self) -> bool {
        self.has_column(TEAM)
    }
}

/// The default exclusion set: the identity columns.
pub fn default_excluded() -> BTreeSet<String> {
    IDENTITY_COLUMNS.iter().map(|c| c.to_string()).collect()
}

/// Statistic columns that can be put on an axis, in source order.
pub fn available_stats(schema: &Schema, excluded: &BTreeSet<String>) -> Vec<String> {
    schema
        .columns
        .iter()
        .skip(IDENTITY_OFFSET)
        .filter(|col| schema.is_numeric(col) && !excluded.contains(*col))
        .cloned()
        .collect()
}

/// Initial axis selection: goals vs assists when the file has them.
pub fn default_axes(stats: &[String]) -> Option<(String, String)> {
    let pick = |name: &str, fallback: usize| {
        stats
            .iter()
            .find(|s| *s == name)
            .or_else(|| stats.get(fallback))
            .or_else(|| stats.first())
            .cloned()
    };
    Some((pick(DEFAULT_STAT_X, 0)?, pick(DEFAULT_STAT_Y, 1)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(cols: &[&str]) -> Vec<String> {
        cols.iter().map(|c| c.to_string()).collect()
    }

    fn row(cells: &[&str]) -> Vec<CellValue> {
        cells.iter().map(|c| CellValue::parse(c)).collect()
    }

    fn sample_schema() -> Schema {
        let h = headers(&[PLAYER, TEAM, LEAGUE, POSITION, MINUTES, "Buts", "Nation", "xG"]);
        let rows = vec![
            row(&["A", "PSG", "Ligue 1", "FW", "900", "10", "FRA", "8.2"]),
            row(&["B", "OM", "Ligue 1", "MF", "", "2", "ESP", ""]),
        ];
        Schema::infer(&h, &rows)
    }

    #[test]
    fn infer_separates_numeric_and_text_columns() {
        let schema = sample_schema();
        assert_eq!(schema.identity, headers(&[PLAYER, TEAM, LEAGUE, POSITION]));
        assert_eq!(schema.numeric, headers(&[MINUTES, "Buts", "xG"]));
        assert!(schema.text.contains(&"Nation".to_string()));
        assert!(schema.validate().is_ok());
    }

    #[test]
    fn available_stats_skips_identity_and_excluded() {
        let schema = sample_schema();
        let mut excluded = default_excluded();
        assert_eq!(
            available_stats(&schema, &excluded),
            headers(&[MINUTES, "Buts", "xG"])
        );
        excluded.insert("xG".into());
        assert_eq!(available_stats(&schema, &excluded), headers(&[MINUTES, "Buts"]));
    }

    #[test]
    fn identity_column_past_offset_is_never_a_stat() {
        let h = headers(&["Rang", "Club", "Pays", "Age", LEAGUE, PLAYER, MINUTES]);
        let rows = vec![row(&["1", "PSG", "FRA", "24", "Ligue 1", "A", "900"])];
        let schema = Schema::infer(&h, &rows);
        let stats = available_stats(&schema, &BTreeSet::new());
        assert_eq!(stats, headers(&[MINUTES]));
    }

    #[test]
    fn validate_rejects_missing_player_column() {
        let h = headers(&["Nom", TEAM, LEAGUE, POSITION, MINUTES]);
        let schema = Schema::infer(&h, &[row(&["A", "PSG", "Ligue 1", "FW", "900"])]);
        let err = schema.validate().unwrap_err();
        assert!(matches!(err, EngineError::Schema(msg) if msg.contains(PLAYER)));
    }

    #[test]
    fn validate_rejects_text_minutes() {
        let h = headers(&[PLAYER, TEAM, LEAGUE, POSITION, MINUTES]);
        let schema = Schema::infer(&h, &[row(&["A", "PSG", "Ligue 1", "FW", "lots"])]);
        assert!(matches!(schema.validate(), Err(EngineError::Schema(_))));
    }

    #[test]
    fn default_axes_prefers_goals_and_assists() {
        let stats = headers(&[MINUTES, DEFAULT_STAT_Y, "xG", DEFAULT_STAT_X]);
        assert_eq!(
            default_axes(&stats),
            Some((DEFAULT_STAT_X.to_string(), DEFAULT_STAT_Y.to_string()))
        );
        let stats = headers(&[MINUTES, "xG"]);
        assert_eq!(default_axes(&stats), Some((MINUTES.into(), "xG".into())));
        assert_eq!(default_axes(&[]), None);
    }
}
