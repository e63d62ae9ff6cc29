use crate::curve::{Curve, CurveKind, CurvePoint};
use crate::sweep::sweep;
use themis_core::model::EvaluationRow;

/// Precision at each coverage level, where coverage is the fraction of rows
/// answered at or above the threshold. There is no point at zero coverage.
pub fn precision_curve(rows: &[EvaluationRow]) -> Curve {
    let total = rows.len() as f64;
    let points = sweep(rows)
        .into_iter()
        .map(|s| CurvePoint {
            threshold: s.threshold,
            x: s.count as f64 / total,
            y: s.true_positives as f64 / s.count as f64,
        })
        .collect();
    Curve {
        kind: CurveKind::Precision,
        points,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sweep::tests::row;

    #[test]
    fn test_precision_points() {
        let rows = vec![row(0.9, true), row(0.5, false), row(0.5, true), row(0.1, false)];
        let curve = precision_curve(&rows);
        let xy: Vec<_> = curve.points.iter().map(|p| (p.threshold, p.x, p.y)).collect();
        assert_eq!(xy, vec![(0.9, 0.25, 1.0), (0.5, 0.75, 2.0 / 3.0), (0.1, 1.0, 0.5)]);
    }

    #[test]
    fn test_no_rows_no_points() {
        let curve = precision_curve(&[]);
        assert!(curve.is_empty());
        assert!(curve.points.iter().all(|p| !p.y.is_nan()));
    }
}
