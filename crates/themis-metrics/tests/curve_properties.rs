use proptest::prelude::*;
use themis_core::model::EvaluationRow;
use themis_metrics::{compute, CurveKind};

fn rows() -> impl Strategy<Value = Vec<EvaluationRow>> {
    // Few distinct confidences so ties are common.
    let row = (0u8..10, any::<bool>()).prop_map(|(c, correct)| EvaluationRow {
        question: format!("q{}", c),
        answer: "a".into(),
        answer_id: None,
        confidence: c as f64 / 10.0,
        frequency: 1,
        score: Some(if correct { 90.0 } else { 10.0 }),
        in_purview: None,
        correct,
    });
    prop::collection::vec(row, 0..40)
}

proptest! {
    #[test]
    fn curves_are_monotonic_in_x(rows in rows()) {
        for kind in [CurveKind::Roc, CurveKind::Precision] {
            let curve = compute(kind, &rows);
            for w in curve.points.windows(2) {
                prop_assert!(w[0].x <= w[1].x);
                prop_assert!(w[0].threshold > w[1].threshold);
            }
            for p in &curve.points {
                prop_assert!(p.x.is_finite() && p.y.is_finite());
                prop_assert!((0.0..=1.0).contains(&p.x) && (0.0..=1.0).contains(&p.y));
            }
        }
    }

    #[test]
    fn last_point_covers_everything(rows in rows()) {
        let curve = compute(CurveKind::Precision, &rows);
        if let Some(last) = curve.points.last() {
            prop_assert_eq!(last.x, 1.0);
        } else {
            prop_assert!(rows.is_empty());
        }
    }
}
