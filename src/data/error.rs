use std::path::PathBuf;

use thiserror::Error;

/// Everything the engine can fail with.  The dashboard decides how each
/// variant is shown; the engine itself never aborts.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Source file missing or unreadable.
    #[error("data source not found: {}", path.display())]
    NotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    /// A row that could not be parsed at all (ragged CSV, bad JSON ...).
    #[error("malformed input at row {row}: {reason}")]
    Malformed { row: usize, reason: String },

    /// Required identity columns absent, duplicated headers, etc.
    #[error("invalid schema: {0}")]
    Schema(String),

    #[error("unknown statistic column: {0}")]
    UnknownStat(String),

    #[error("invalid filter criteria: {0}")]
    InvalidCriteria(String),

    /// An aggregate or ranking over zero records.
    #[error("no records to compute {0} over")]
    EmptyInput(&'static str),

    /// Too few usable points (or zero variance) for a correlation or fit.
    #[error("not enough data to compute {0}")]
    InsufficientData(&'static str),
}

impl EngineError {
    /// `false` for errors that leave nothing to render (the data view is
    /// unusable until another file is loaded).
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            EngineError::NotFound { .. }
                | EngineError::UnsupportedFormat(_)
                | EngineError::Malformed { .. }
                | EngineError::Schema(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
