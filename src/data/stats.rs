use std::collections::BTreeMap;

use serde::Serialize;

use super::error::{EngineError, Result};
use super::model::{Dataset, PlayerRecord};
use super::schema::{LEAGUE, POSITION, TEAM};

/// Default number of histogram bins.
pub const DEFAULT_BINS: usize = 20;

// ---------------------------------------------------------------------------
// Descriptive statistics
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Summary {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    /// Sample standard deviation; `None` for a single value.
    pub stddev: Option<f64>,
    pub max: f64,
}

fn column(view: &[&PlayerRecord], key: &str) -> Vec<f64> {
    view.iter().filter_map(|rec| rec.stat(key)).collect()
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Every value equal to the first.  Rounding in the mean can leave a tiny
/// non-zero variance for such columns, so this is checked on the raw values.
pub(crate) fn is_constant(values: &[f64]) -> bool {
    values.iter().all(|&v| v == values[0])
}

fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Mean, median, standard deviation and maximum of `key` over `view`.
pub fn summarize(view: &[&PlayerRecord], key: &str) -> Result<Summary> {
    let values = column(view, key);
    if values.is_empty() {
        return Err(EngineError::EmptyInput("summary"));
    }

    let mean = mean(&values);
    let stddev = (values.len() > 1).then(|| {
        let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
        (ss / (values.len() - 1) as f64).sqrt()
    });

    Ok(Summary {
        count: values.len(),
        mean,
        median: median(&values),
        stddev,
        max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
    })
}

/// Pearson correlation between `key_x` and `key_y` over records carrying both.
pub fn correlation(view: &[&PlayerRecord], key_x: &str, key_y: &str) -> Result<f64> {
    let (xs, ys): (Vec<f64>, Vec<f64>) = view
        .iter()
        .filter_map(|rec| Some((rec.stat(key_x)?, rec.stat(key_y)?)))
        .unzip();
    if xs.len() < 2 || is_constant(&xs) || is_constant(&ys) {
        return Err(EngineError::InsufficientData("correlation"));
    }

    let (mx, my) = (mean(&xs), mean(&ys));
    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in xs.iter().zip(&ys) {
        let (dx, dy) = (x - mx, y - my);
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    if var_x == 0.0 || var_y == 0.0 {
        return Err(EngineError::InsufficientData("correlation"));
    }
    Ok((cov / (var_x * var_y).sqrt()).clamp(-1.0, 1.0))
}

// ---------------------------------------------------------------------------
// Histogram
// ---------------------------------------------------------------------------

/// Equal-width bins over the observed range.  Bin `i` covers
/// `[start + i * bin_width, start + (i + 1) * bin_width)`, the last one closed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    pub start: f64,
    pub bin_width: f64,
    pub counts: Vec<usize>,
    /// The same bins split by league, for stacked bars.
    pub by_group: BTreeMap<String, Vec<usize>>,
}

impl Histogram {
    /// Centre of bin `i`, where a bar is drawn.
    pub fn bin_center(&self, i: usize) -> f64 {
        self.start + (i as f64 + 0.5) * self.bin_width
    }
}

pub fn histogram(view: &[&PlayerRecord], key: &str, bins: usize) -> Result<Histogram> {
    let points: Vec<(f64, Option<&str>)> = view
        .iter()
        .filter_map(|rec| rec.stat(key).map(|v| (v, rec.league())))
        .collect();
    if points.is_empty() {
        return Err(EngineError::EmptyInput("histogram"));
    }

    let min = points.iter().map(|p| p.0).fold(f64::INFINITY, f64::min);
    let max = points.iter().map(|p| p.0).fold(f64::NEG_INFINITY, f64::max);

    // A constant column gets one unit-wide bin centred on the value.
    let (start, bins, bin_width) = if max > min {
        let bins = bins.max(1);
        (min, bins, (max - min) / bins as f64)
    } else {
        (min - 0.5, 1, 1.0)
    };

    let mut hist = Histogram {
        start,
        bin_width,
        counts: vec![0; bins],
        by_group: BTreeMap::new(),
    };
    for (v, league) in points {
        let idx = (((v - start) / bin_width) as usize).min(bins - 1);
        hist.counts[idx] += 1;
        if let Some(league) = league {
            hist.by_group
                .entry(league.to_string())
                .or_insert_with(|| vec![0; bins])[idx] += 1;
        }
    }
    Ok(hist)
}

// ---------------------------------------------------------------------------
// Dataset overview
// ---------------------------------------------------------------------------

/// Headline counts shown above the charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Overview {
    pub players: usize,
    pub leagues: usize,
    /// `None` when the file has no team column.
    pub teams: Option<usize>,
    pub positions: Option<usize>,
}

pub fn overview(dataset: &Dataset) -> Overview {
    let count = |col: &str| dataset.categories.get(col).map_or(0, |v| v.len());
    Overview {
        players: dataset.len(),
        leagues: count(LEAGUE),
        teams: dataset.schema.has_team().then(|| count(TEAM)),
        positions: dataset.schema.has_position().then(|| count(POSITION)),
    }
}
