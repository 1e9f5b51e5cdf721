use serde::Serialize;

use super::error::{EngineError, Result};
use super::model::PlayerRecord;
use super::stats::is_constant;

/// `y = slope * x + intercept`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearFit {
    pub fn at(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// A fitted line sampled at both ends of the observed x range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrendLine {
    pub fit: LinearFit,
    pub start: [f64; 2],
    pub end: [f64; 2],
}

/// Ordinary least-squares line through `points`.
///
/// Needs at least two distinct x values.
pub fn fit_linear(points: &[(f64, f64)]) -> Result<LinearFit> {
    let xs: Vec<f64> = points.iter().map(|p| p.0).collect();
    if xs.len() < 2 || is_constant(&xs) {
        return Err(EngineError::InsufficientData("trend line"));
    }
    let n = xs.len() as f64;
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = points.iter().map(|p| p.1).sum::<f64>() / n;

    let (sxy, sxx) = points.iter().fold((0.0, 0.0), |(sxy, sxx), &(x, y)| {
        let dx = x - mean_x;
        (sxy + dx * (y - mean_y), sxx + dx * dx)
    });
    if sxx == 0.0 {
        return Err(EngineError::InsufficientData("trend line"));
    }

    let slope = sxy / sxx;
    Ok(LinearFit {
        slope,
        intercept: mean_y - slope * mean_x,
    })
}

/// Fit `key_y` against `key_x` over `view` and sample it for drawing.
pub fn trend_line(view: &[&PlayerRecord], key_x: &str, key_y: &str) -> Result<TrendLine> {
    let points: Vec<(f64, f64)> = view
        .iter()
        .filter_map(|rec| Some((rec.stat(key_x)?, rec.stat(key_y)?)))
        .collect();
    let fit = fit_linear(&points)?;

    let min_x = points.iter().map(|p| p.0).fold(f64::INFINITY, f64::min);
    let max_x = points.iter().map(|p| p.0).fold(f64::NEG_INFINITY, f64::max);
    Ok(TrendLine {
        fit,
        start: [min_x, fit.at(min_x)],
        end: [max_x, fit.at(max_x)],
    })
}
