use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::PathBuf;

use super::schema::{Schema, LEAGUE, MINUTES, PLAYER, POSITION, TEAM};

// ---------------------------------------------------------------------------
// CellValue – a single parsed cell before it is sorted into a record
// ---------------------------------------------------------------------------

/// A dynamically-typed cell as read from the source file.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Null,
}

/// Spellings pandas (and spreadsheets) write for a missing cell.
const NULL_TOKENS: &[&str] = &["", "nan", "NaN", "NA", "N/A", "null", "None"];

impl CellValue {
    /// Guess the type of a raw text cell.  Non-finite numbers count as missing
    /// so NaN never reaches a numeric accumulator.
    pub fn parse(raw: &str) -> Self {
        let s = raw.trim();
        if NULL_TOKENS.contains(&s) {
            return CellValue::Null;
        }
        match s.parse::<f64>() {
            Ok(v) if v.is_finite() => CellValue::Number(v),
            Ok(_) => CellValue::Null,
            Err(_) => CellValue::Text(s.to_string()),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Number(v) => Some(*v),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Number(v) => write!(f, "{v}"),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

// ---------------------------------------------------------------------------
// PlayerRecord – one row of the source file
// ---------------------------------------------------------------------------

/// One player-season row.  Missing cells are absent from both maps.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerRecord {
    /// 0-based position in the source file; the tie-breaker for rankings.
    pub row: usize,
    /// Identity and other categorical columns.
    pub text: BTreeMap<String, String>,
    /// Numeric statistic columns.
    pub stats: BTreeMap<String, f64>,
}

impl PlayerRecord {
    pub fn new(row: usize) -> Self {
        Self {
            row,
            ..Default::default()
        }
    }

    /// Builder-style setter used by tests and the JSON loader.
    pub fn with_text(mut self, column: &str, value: &str) -> Self {
        self.text.insert(column.to_string(), value.to_string());
        self
    }

    pub fn with_stat(mut self, column: &str, value: f64) -> Self {
        self.stats.insert(column.to_string(), value);
        self
    }

    pub fn stat(&self, key: &str) -> Option<f64> {
        self.stats.get(key).copied()
    }

    pub fn text_value(&self, column: &str) -> Option<&str> {
        self.text.get(column).map(String::as_str)
    }

    /// Whether `column` holds a value, whatever its type.
    pub fn has_value(&self, column: &str) -> bool {
        self.stats.contains_key(column) || self.text.contains_key(column)
    }

    pub fn player(&self) -> Option<&str> {
        self.text_value(PLAYER)
    }

    pub fn team(&self) -> Option<&str> {
        self.text_value(TEAM)
    }

    pub fn league(&self) -> Option<&str> {
        self.text_value(LEAGUE)
    }

    pub fn position(&self) -> Option<&str> {
        self.text_value(POSITION)
    }

    pub fn minutes(&self) -> Option<f64> {
        self.stat(MINUTES)
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded file
// ---------------------------------------------------------------------------

/// The full parsed dataset with pre-computed category indices.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// Where the records were read from.
    pub source: PathBuf,
    pub schema: Schema,
    /// All records, in file order.
    pub records: Vec<PlayerRecord>,
    /// For each text column the sorted set of distinct values.
    pub categories: BTreeMap<String, BTreeSet<String>>,
}

impl Dataset {
    /// Build category indices from the loaded records.
    pub fn from_records(source: PathBuf, schema: Schema, records: Vec<PlayerRecord>) -> Self {
        let mut categories: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for rec in &records {
            for (col, val) in &rec.text {
                categories.entry(col.clone()).or_default().insert(val.clone());
            }
        }
        Dataset {
            source,
            schema,
            records,
            categories,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct values of a text column (empty when the column is unknown).
    pub fn distinct(&self, column: &str) -> Vec<&str> {
        self.categories
            .get(column)
            .map(|vals| vals.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }
}
