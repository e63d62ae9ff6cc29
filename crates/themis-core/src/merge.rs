//! Joins system answers with human judgments and question frequencies.

use crate::model::{AnswerRecord, EvaluationRow, FrequencyRecord, Judgment};
use crate::thresholds::is_correct;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum JoinMode {
    /// Keep unjudged answers with empty judgment fields.
    #[default]
    Left,
    /// Keep only answers that have a judgment row.
    Inner,
}

impl std::str::FromStr for JoinMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "left" => Ok(JoinMode::Left),
            "inner" => Ok(JoinMode::Inner),
            other => Err(format!("unknown join mode '{}' (expected left|inner)", other)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EvaluationTable {
    pub rows: Vec<EvaluationRow>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EvaluationSummary {
    pub rows: usize,
    pub judged: usize,
    pub unjudged: usize,
    pub correct: usize,
    pub in_purview: usize,
    pub in_purview_unjudged: usize,
    pub confidence_range: Option<(f64, f64)>,
    pub correct_confidence_range: Option<(f64, f64)>,
}

/// Left join of answers onto judgments by (question, answer), and onto
/// frequencies by question. Questions without a frequency get 0.
pub fn merge(
    answers: &[AnswerRecord],
    judgments: &[Judgment],
    frequencies: &[FrequencyRecord],
) -> EvaluationTable {
    merge_with(answers, judgments, frequencies, JoinMode::Left)
}

pub fn merge_with(
    answers: &[AnswerRecord],
    judgments: &[Judgment],
    frequencies: &[FrequencyRecord],
    mode: JoinMode,
) -> EvaluationTable {
    let mut judged: HashMap<(&str, &str), &Judgment> = HashMap::new();
    for j in judgments {
        if judged
            .insert((j.question.as_str(), j.answer.as_str()), j)
            .is_some()
        {
            tracing::warn!(question = %j.question, answer = %j.answer, "duplicate judgment, keeping the last");
        }
    }

    let mut freq: HashMap<&str, u64> = HashMap::new();
    for f in frequencies {
        *freq.entry(f.question.as_str()).or_insert(0) += f.frequency;
    }

    let mut seen: HashSet<(&str, &str)> = HashSet::new();
    let mut rows = Vec::with_capacity(answers.len());
    for a in answers {
        let pair = (a.question.as_str(), a.answer.as_str());
        if !seen.insert(pair) {
            tracing::debug!(question = %a.question, answer = %a.answer, "duplicate answer row dropped");
            continue;
        }
        let j = judged.get(&pair);
        if j.is_none() && mode == JoinMode::Inner {
            continue;
        }
        rows.push(EvaluationRow {
            question: a.question.clone(),
            answer: a.answer.clone(),
            answer_id: a.answer_id.clone(),
            confidence: a.confidence,
            frequency: freq.get(a.question.as_str()).copied().unwrap_or(0),
            score: j.and_then(|j| j.score),
            in_purview: j.and_then(|j| j.in_purview),
            correct: false,
        });
    }

    tracing::debug!(
        answers = answers.len(),
        judgments = judgments.len(),
        rows = rows.len(),
        "merged judgments"
    );
    EvaluationTable { rows }
}

impl EvaluationTable {
    /// Sets `correct = score >= threshold`; unjudged rows stay incorrect.
    pub fn mark_correct(mut self, threshold: f64) -> Self {
        for r in &mut self.rows {
            r.correct = is_correct(r.score, threshold);
        }
        self
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Ascending by confidence, then frequency.
    pub fn sort_for_collate(&mut self) {
        self.rows.sort_by(|a, b| {
            a.confidence
                .total_cmp(&b.confidence)
                .then(a.frequency.cmp(&b.frequency))
        });
    }

    pub fn summarize(&self) -> EvaluationSummary {
        let mut s = EvaluationSummary {
            rows: self.rows.len(),
            ..Default::default()
        };
        for r in &self.rows {
            if r.is_judged() {
                s.judged += 1;
            } else {
                s.unjudged += 1;
            }
            if r.in_purview == Some(true) {
                s.in_purview += 1;
                if !r.is_judged() {
                    s.in_purview_unjudged += 1;
                }
            }
            widen(&mut s.confidence_range, r.confidence);
            if r.correct {
                s.correct += 1;
                widen(&mut s.correct_confidence_range, r.confidence);
            }
        }
        s
    }
}

fn widen(range: &mut Option<(f64, f64)>, v: f64) {
    *range = Some(match *range {
        None => (v, v),
        Some((lo, hi)) => (lo.min(v), hi.max(v)),
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answer(q: &str, a: &str, c: f64) -> AnswerRecord {
        AnswerRecord::new(q, a, c)
    }

    fn freq(q: &str, n: u64) -> FrequencyRecord {
        FrequencyRecord {
            question: q.into(),
            frequency: n,
        }
    }

    #[test]
    fn test_threshold_marks_correct() {
        let answers = vec![answer("Q1", "A1", 0.9), answer("Q1", "A2", 0.4)];
        let judgments = vec![Judgment::new("Q1", "A1", 80.0), Judgment::new("Q1", "A2", 30.0)];

        let at_50 = merge(&answers, &judgments, &[]).mark_correct(50.0);
        assert!(at_50.rows[0].correct);
        assert!(!at_50.rows[1].correct);

        let at_90 = merge(&answers, &judgments, &[]).mark_correct(90.0);
        assert!(at_90.rows.iter().all(|r| !r.correct));
    }

    #[test]
    fn test_unjudged_rows_are_kept_with_null_score() {
        let answers = vec![answer("Q1", "A1", 0.9), answer("Q2", "B", 0.1)];
        let judgments = vec![Judgment::new("Q1", "A1", 80.0)];

        let t = merge(&answers, &judgments, &[]).mark_correct(0.0);
        assert_eq!(t.len(), 2);
        assert_eq!(t.rows[1].score, None);
        assert!(!t.rows[1].correct);
    }

    #[test]
    fn test_inner_join_drops_unjudged() {
        let answers = vec![answer("Q1", "A1", 0.9), answer("Q2", "B", 0.1)];
        let judgments = vec![Judgment::new("Q1", "A1", 80.0)];

        let t = merge_with(&answers, &judgments, &[], JoinMode::Inner);
        assert_eq!(t.len(), 1);
        assert_eq!(t.rows[0].question, "Q1");
    }

    #[test]
    fn test_frequency_defaults_to_zero_and_sums_duplicates() {
        let answers = vec![answer("Q1", "A", 0.5), answer("Q2", "B", 0.5)];
        let t = merge(&answers, &[], &[freq("Q1", 3), freq("Q1", 4)]);
        assert_eq!(t.rows[0].frequency, 7);
        assert_eq!(t.rows[1].frequency, 0);
    }

    #[test]
    fn test_one_row_per_pair() {
        let answers = vec![answer("Q1", "A", 0.5), answer("Q1", "A", 0.7)];
        let judgments = vec![Judgment::new("Q1", "A", 10.0), Judgment::new("Q1", "A", 90.0)];
        let t = merge(&answers, &judgments, &[]);
        assert_eq!(t.len(), 1);
        assert_eq!(t.rows[0].confidence, 0.5);
        assert_eq!(t.rows[0].score, Some(90.0));
    }

    #[test]
    fn test_summary_ranges() {
        let answers = vec![
            answer("Q1", "A", 0.2),
            answer("Q2", "B", 0.9),
            answer("Q3", "C", 0.5),
        ];
        let mut unscored = Judgment::new("Q3", "C", 0.0);
        unscored.score = None;
        unscored.in_purview = Some(true);
        let judgments = vec![
            Judgment::new("Q1", "A", 70.0),
            Judgment::new("Q2", "B", 10.0),
            unscored,
        ];
        let s = merge(&answers, &judgments, &[]).mark_correct(50.0).summarize();
        assert_eq!(s.rows, 3);
        assert_eq!(s.judged, 2);
        assert_eq!(s.unjudged, 1);
        assert_eq!(s.correct, 1);
        assert_eq!(s.in_purview_unjudged, 1);
        assert_eq!(s.confidence_range, Some((0.2, 0.9)));
        assert_eq!(s.correct_confidence_range, Some((0.2, 0.2)));
    }

    #[test]
    fn test_collate_order() {
        let answers = vec![answer("Q1", "A", 0.9), answer("Q2", "B", 0.1), answer("Q3", "C", 0.1)];
        let mut t = merge(&answers, &[], &[freq("Q2", 5), freq("Q3", 1)]);
        t.sort_for_collate();
        let order: Vec<_> = t.rows.iter().map(|r| r.question.as_str()).collect();
        assert_eq!(order, vec!["Q3", "Q2", "Q1"]);
    }
}
