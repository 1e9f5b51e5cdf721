/// Data layer: the statistics engine behind the dashboard.
///
/// Architecture:
/// ```text
///  .csv / .tsv / .json
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Dataset (cached per path)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Dataset  │  Vec<PlayerRecord>, Schema, category index
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  clean + predicates → FilteredView
///   └──────────┘
///        │
///        ├──────────────┬──────────────┐
///        ▼              ▼              ▼
///   ┌────────┐    ┌─────────┐    ┌─────────┐
///   │  rank   │    │  stats   │    │  trend   │
///   └────────┘    └─────────┘    └─────────┘
/// ```

pub mod error;
pub mod loader;
pub mod model;
pub mod schema;
pub mod filter;
pub mod rank;
pub mod stats;
pub mod trend;

pub use error::{EngineError, Result};
