use super::error::{EngineError, Result};
use super::model::PlayerRecord;

/// Size of the per-statistic leaderboards.
pub const LEADERBOARD_SIZE: usize = 5;

/// Fractions of the axis maxima used to nudge labels off their marker.
const LABEL_X_STEP: f64 = 0.01;
const LABEL_Y_STEP: f64 = 0.03;

/// A record with the combined score it was ranked by.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ranked<'a> {
    pub record: &'a PlayerRecord,
    pub score: f64,
}

/// A chart annotation candidate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Label<'a> {
    pub record: &'a PlayerRecord,
    pub score: f64,
    /// 0-based position in the combined ranking.
    pub rank: usize,
    /// `[dx, dy]` in data units, added to the marker position.
    pub offset: [f64; 2],
}

// ---------------------------------------------------------------------------
// Single-key ranking
// ---------------------------------------------------------------------------

/// The `n` records with the largest `key`, descending.  Ties keep file order;
/// records without a value for `key` are skipped.
pub fn top_n<'a>(view: &[&'a PlayerRecord], key: &str, n: usize) -> Vec<&'a PlayerRecord> {
    let mut keyed: Vec<(&PlayerRecord, f64)> = view
        .iter()
        .filter_map(|rec| rec.stat(key).map(|v| (*rec, v)))
        .collect();
    // `sort_by` is stable, so equal values stay in view order.
    keyed.sort_by(|a, b| b.1.total_cmp(&a.1));
    keyed.into_iter().take(n).map(|(rec, _)| rec).collect()
}

/// Top-5 table for one statistic.
pub fn leaderboard<'a>(view: &[&'a PlayerRecord], key: &str) -> Vec<&'a PlayerRecord> {
    top_n(view, key, LEADERBOARD_SIZE)
}

// ---------------------------------------------------------------------------
// Combined-score ranking
// ---------------------------------------------------------------------------

fn column_max(view: &[&PlayerRecord], key: &str) -> Option<f64> {
    view.iter()
        .filter_map(|rec| rec.stat(key))
        .fold(None, |acc, v| Some(acc.map_or(v, |a: f64| a.max(v))))
}

/// `value / max`, with a zero maximum contributing nothing.
fn normalized(value: f64, max: f64) -> f64 {
    if max == 0.0 {
        0.0
    } else {
        value / max
    }
}

/// Rank by `x / max(x) + y / max(y)`, each maximum taken over `view`.
///
/// Fails with [`EngineError::EmptyInput`] when no record carries both keys.
pub fn top_n_combined<'a>(
    view: &[&'a PlayerRecord],
    key_x: &str,
    key_y: &str,
    n: usize,
) -> Result<Vec<Ranked<'a>>> {
    let paired: Vec<(&PlayerRecord, f64, f64)> = view
        .iter()
        .filter_map(|rec| Some((*rec, rec.stat(key_x)?, rec.stat(key_y)?)))
        .collect();
    if paired.is_empty() {
        return Err(EngineError::EmptyInput("combined ranking"));
    }

    let max_x = paired.iter().map(|p| p.1).fold(f64::NEG_INFINITY, f64::max);
    let max_y = paired.iter().map(|p| p.2).fold(f64::NEG_INFINITY, f64::max);

    let mut ranked: Vec<Ranked> = paired
        .into_iter()
        .map(|(record, x, y)| Ranked {
            record,
            score: normalized(x, max_x) + normalized(y, max_y),
        })
        .collect();
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    ranked.truncate(n);
    Ok(ranked)
}

/// The first `num_labels` entries of a combined ranking, each with a small
/// deterministic offset so neighbouring names do not sit on top of each other.
///
/// `ranked` keeps the scores it was ranked by; offsets scale with the maxima
/// of the ranked records themselves.
pub fn labels<'a>(ranked: &[Ranked<'a>], key_x: &str, key_y: &str, num_labels: usize) -> Vec<Label<'a>> {
    let shown: Vec<&PlayerRecord> = ranked.iter().map(|r| r.record).collect();
    let max_x = column_max(&shown, key_x).unwrap_or(0.0);
    let max_y = column_max(&shown, key_y).unwrap_or(0.0);

    ranked
        .iter()
        .take(num_labels)
        .enumerate()
        .map(|(rank, r)| Label {
            record: r.record,
            score: r.score,
            rank,
            offset: label_offset(rank, max_x, max_y),
        })
        .collect()
}

/// Alternates the x nudge every other label and stacks y over three levels.
pub fn label_offset(rank: usize, max_x: f64, max_y: f64) -> [f64; 2] {
    [
        max_x * LABEL_X_STEP * (rank % 2) as f64,
        max_y * LABEL_Y_STEP * (rank % 3 + 1) as f64,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(row: usize, goals: f64, assists: f64) -> PlayerRecord {
        PlayerRecord::new(row)
            .with_text("Joueur", &format!("P{row}"))
            .with_stat("Buts", goals)
            .with_stat("Passes decisives", assists)
    }

    fn names(recs: &[&PlayerRecord]) -> Vec<String> {
        recs.iter().filter_map(|r| r.player()).map(str::to_string).collect()
    }

    #[test]
    fn top_n_sorts_descending_and_truncates() {
        let recs = vec![rec(0, 3.0, 0.0), rec(1, 9.0, 0.0), rec(2, 5.0, 0.0), rec(3, 7.0, 0.0)];
        let view: Vec<&PlayerRecord> = recs.iter().collect();
        assert_eq!(names(&top_n(&view, "Buts", 2)), vec!["P1", "P3"]);
        assert_eq!(top_n(&view, "Buts", 10).len(), 4);
        assert!(top_n(&view, "Buts", 0).is_empty());
    }

    #[test]
    fn top_n_ties_keep_view_order() {
        let recs = vec![rec(0, 4.0, 0.0), rec(1, 8.0, 0.0), rec(2, 4.0, 0.0), rec(3, 4.0, 0.0)];
        let view: Vec<&PlayerRecord> = recs.iter().collect();
        assert_eq!(names(&top_n(&view, "Buts", 4)), vec!["P1", "P0", "P2", "P3"]);
    }

    #[test]
    fn top_n_returns_records_from_the_view() {
        let recs = vec![rec(0, 1.0, 0.0), rec(1, 2.0, 0.0)];
        let view: Vec<&PlayerRecord> = recs.iter().collect();
        for r in top_n(&view, "Buts", 5) {
            assert!(view.iter().any(|v| std::ptr::eq(*v, r)));
        }
    }

    #[test]
    fn top_n_skips_records_without_the_key() {
        let recs = vec![rec(0, 1.0, 0.0), PlayerRecord::new(1).with_text("Joueur", "P1")];
        let view: Vec<&PlayerRecord> = recs.iter().collect();
        assert_eq!(names(&top_n(&view, "Buts", 5)), vec!["P0"]);
    }

    #[test]
    fn combined_score_normalizes_each_axis() {
        // goals max 10, assists max 8
        let recs = vec![rec(0, 10.0, 2.0), rec(1, 5.0, 8.0), rec(2, 7.0, 7.0)];
        let view: Vec<&PlayerRecord> = recs.iter().collect();
        let ranked = top_n_combined(&view, "Buts", "Passes decisives", 3).unwrap();

        let order: Vec<usize> = ranked.iter().map(|r| r.record.row).collect();
        assert_eq!(order, vec![2, 1, 0]);
        assert!((ranked[0].score - (0.7 + 0.875)).abs() < 1e-12);
        assert!((ranked[2].score - 1.25).abs() < 1e-12);
        for r in &ranked {
            assert!((0.0..=2.0).contains(&r.score));
        }
    }

    #[test]
    fn combined_score_on_empty_view_fails() {
        let err = top_n_combined(&[], "Buts", "Passes decisives", 5).unwrap_err();
        assert!(matches!(err, EngineError::EmptyInput(_)));
    }

    #[test]
    fn zero_maximum_contributes_nothing() {
        let recs = vec![rec(0, 0.0, 4.0), rec(1, 0.0, 2.0)];
        let view: Vec<&PlayerRecord> = recs.iter().collect();
        let ranked = top_n_combined(&view, "Buts", "Passes decisives", 2).unwrap();
        assert_eq!(ranked[0].score, 1.0);
        assert_eq!(ranked[1].score, 0.5);
    }

    #[test]
    fn labels_follow_the_combined_ranking() {
        let recs = vec![rec(0, 10.0, 2.0), rec(1, 5.0, 8.0), rec(2, 7.0, 7.0)];
        let view: Vec<&PlayerRecord> = recs.iter().collect();
        let ranked = top_n_combined(&view, "Buts", "Passes decisives", 3).unwrap();
        let labels = labels(&ranked, "Buts", "Passes decisives", 2);

        assert_eq!(labels.len(), 2);
        assert_eq!(labels[0].record.row, 2);
        assert_eq!(labels[0].score, ranked[0].score);
        assert_eq!(labels[1].rank, 1);
        assert_eq!(labels[0].offset, [0.0, 8.0 * 0.03]);
        assert!((labels[1].offset[0] - 0.1).abs() < 1e-12);
        assert!((labels[1].offset[1] - 8.0 * 0.06).abs() < 1e-12);
    }

    #[test]
    fn capped_labels_keep_the_scores_of_the_full_view() {
        // P0 holds the goals maximum but is cut by the cap of 3.
        let recs = vec![rec(0, 100.0, 0.0), rec(1, 60.0, 10.0), rec(2, 90.0, 6.9), rec(3, 50.0, 9.5)];
        let view: Vec<&PlayerRecord> = recs.iter().collect();
        let charted = top_n_combined(&view, "Buts", "Passes decisives", 3).unwrap();
        let order: Vec<usize> = charted.iter().map(|r| r.record.row).collect();
        assert_eq!(order, vec![1, 2, 3]);

        let labels = labels(&charted, "Buts", "Passes decisives", 1);
        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].record.row, 1);
        assert!((labels[0].score - 1.6).abs() < 1e-12);
        // offsets come from the charted maxima: 90 goals, 10 assists
        assert_eq!(labels[0].offset, [0.0, 10.0 * 0.03]);
    }

    #[test]
    fn labels_never_exceed_the_ranking() {
        let recs = vec![rec(0, 1.0, 1.0)];
        let view: Vec<&PlayerRecord> = recs.iter().collect();
        let ranked = top_n_combined(&view, "Buts", "Passes decisives", 1).unwrap();
        assert_eq!(labels(&ranked, "Buts", "Passes decisives", 10).len(), 1);
        assert!(labels(&ranked, "Buts", "Passes decisives", 0).is_empty());
        assert!(labels(&[], "Buts", "Passes decisives", 5).is_empty());
    }

    #[test]
    fn label_offsets_are_bounded() {
        for rank in 0..50 {
            let [dx, dy] = label_offset(rank, 20.0, 10.0);
            assert!((0.0..=20.0 * 0.01).contains(&dx));
            assert!((10.0 * 0.03..=10.0 * 0.09 + 1e-12).contains(&dy));
        }
    }
}
