use themis_core::model::EvaluationRow;

/// Cumulative counts after admitting every row with confidence >= `threshold`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step {
    pub threshold: f64,
    pub count: usize,
    pub true_positives: usize,
    pub false_positives: usize,
}

/// Walks rows from highest to lowest confidence, one step per distinct
/// confidence value. Tied rows are admitted together.
pub fn sweep(rows: &[EvaluationRow]) -> Vec<Step> {
    let mut order: Vec<(f64, bool)> = rows.iter().map(|r| (r.confidence, r.correct)).collect();
    order.sort_by(|a, b| b.0.total_cmp(&a.0));

    let mut steps = Vec::new();
    let mut tp = 0;
    let mut fp = 0;
    let mut i = 0;
    while i < order.len() {
        let threshold = order[i].0;
        while i < order.len() && order[i].0.total_cmp(&threshold).is_eq() {
            if order[i].1 {
                tp += 1;
            } else {
                fp += 1;
            }
            i += 1;
        }
        steps.push(Step {
            threshold,
            count: i,
            true_positives: tp,
            false_positives: fp,
        });
    }
    steps
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn row(confidence: f64, correct: bool) -> EvaluationRow {
        EvaluationRow {
            question: format!("q{}", confidence),
            answer: "a".into(),
            answer_id: None,
            confidence,
            frequency: 1,
            score: Some(if correct { 100.0 } else { 0.0 }),
            in_purview: None,
            correct,
        }
    }

    #[test]
    fn test_ties_advance_together() {
        let rows = vec![row(0.5, true), row(0.9, false), row(0.5, false), row(0.1, true)];
        let steps = sweep(&rows);
        let got: Vec<_> = steps
            .iter()
            .map(|s| (s.threshold, s.count, s.true_positives, s.false_positives))
            .collect();
        assert_eq!(got, vec![(0.9, 1, 0, 1), (0.5, 3, 1, 2), (0.1, 4, 2, 2)]);
    }

    #[test]
    fn test_empty() {
        assert!(sweep(&[]).is_empty());
    }
}
