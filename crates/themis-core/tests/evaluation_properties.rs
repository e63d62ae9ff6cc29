use proptest::prelude::*;
use std::collections::HashSet;
use themis_core::judge::interpret;
use themis_core::merge::{merge, merge_with, JoinMode};
use themis_core::model::{AnswerRecord, Judgment};

fn answers_and_judgments() -> impl Strategy<Value = (Vec<AnswerRecord>, Vec<Judgment>)> {
    let answer = (0u8..6, 0u8..3, 0.0f64..1.0)
        .prop_map(|(q, a, c)| AnswerRecord::new(format!("Q{}", q), format!("A{}", a), c));
    let judgment = (0u8..6, 0u8..3, 0.0f64..100.0)
        .prop_map(|(q, a, s)| Judgment::new(format!("Q{}", q), format!("A{}", a), s));
    (
        prop::collection::vec(answer, 0..30),
        prop::collection::vec(judgment, 0..30),
    )
}

proptest! {
    #[test]
    fn raising_threshold_never_adds_correct_rows(
        (answers, judgments) in answers_and_judgments(),
        lo in 0.0f64..100.0,
        step in 0.0f64..50.0,
    ) {
        let table = merge(&answers, &judgments, &[]);
        let low = table.clone().mark_correct(lo).rows.iter().filter(|r| r.correct).count();
        let high = table.mark_correct(lo + step).rows.iter().filter(|r| r.correct).count();
        prop_assert!(high <= low);
    }

    #[test]
    fn one_row_per_pair_with_null_iff_unjudged(
        (answers, judgments) in answers_and_judgments(),
    ) {
        let table = merge(&answers, &judgments, &[]);
        let pairs: HashSet<_> = answers.iter().map(|a| (a.question.clone(), a.answer.clone())).collect();
        prop_assert_eq!(table.len(), pairs.len());

        let judged: HashSet<_> = judgments.iter().map(|j| (j.question.clone(), j.answer.clone())).collect();
        for r in &table.rows {
            let key = (r.question.clone(), r.answer.clone());
            prop_assert_eq!(r.score.is_some(), judged.contains(&key));
        }
    }

    #[test]
    fn inner_join_keeps_only_judged_rows(
        (answers, judgments) in answers_and_judgments(),
    ) {
        let left = merge_with(&answers, &judgments, &[], JoinMode::Left);
        let inner = merge_with(&answers, &judgments, &[], JoinMode::Inner);
        prop_assert_eq!(inner.len(), left.rows.iter().filter(|r| r.is_judged()).count());
    }

    #[test]
    fn interpret_applies_threshold(
        (_answers, judgments) in answers_and_judgments(),
        threshold in 0.0f64..100.0,
    ) {
        for (j, i) in judgments.iter().zip(interpret(&judgments, threshold)) {
            prop_assert_eq!(i.correct, j.score.map_or(false, |s| s >= threshold));
        }
    }
}

#[test]
fn test_threshold_scenario() {
    let answers = vec![
        AnswerRecord::new("Q1", "A1", 0.8),
        AnswerRecord::new("Q1", "A2", 0.3),
    ];
    let judgments = vec![Judgment::new("Q1", "A1", 80.0), Judgment::new("Q1", "A2", 30.0)];

    let at_50: Vec<bool> = merge(&answers, &judgments, &[])
        .mark_correct(50.0)
        .rows
        .iter()
        .map(|r| r.correct)
        .collect();
    assert_eq!(at_50, vec![true, false]);

    let at_90 = merge(&answers, &judgments, &[]).mark_correct(90.0);
    assert!(at_90.rows.iter().all(|r| !r.correct));
}
