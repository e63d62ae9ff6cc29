use crate::curve::{Curve, CurveKind, CurvePoint};
use crate::sweep::sweep;
use themis_core::model::EvaluationRow;

/// False positive rate against true positive rate, one point per distinct
/// confidence. Empty when every row is correct or every row is incorrect.
pub fn roc_curve(rows: &[EvaluationRow]) -> Curve {
    let positives = rows.iter().filter(|r| r.correct).count();
    let negatives = rows.len() - positives;
    if positives == 0 || negatives == 0 {
        tracing::warn!(positives, negatives, "ROC curve undefined for a single class");
        return Curve {
            kind: CurveKind::Roc,
            points: Vec::new(),
        };
    }

    let points = sweep(rows)
        .into_iter()
        .map(|s| CurvePoint {
            threshold: s.threshold,
            x: s.false_positives as f64 / negatives as f64,
            y: s.true_positives as f64 / positives as f64,
        })
        .collect();
    Curve {
        kind: CurveKind::Roc,
        points,
    }
}
