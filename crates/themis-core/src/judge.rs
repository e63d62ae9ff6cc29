//! Preparing answers for human judgment and interpreting the judgments that
//! come back.

use crate::model::{
    AnswerRecord, InterpretedJudgment, JudgedLogEntry, Judgment, QaPair, UsageLogEntry,
};
use crate::thresholds::is_correct;
use std::collections::{BTreeSet, HashMap, HashSet};

/// Distinct (question, answer) pairs from one or more answer tables that still
/// need a judgment.
///
/// Pairs are limited to `questions` when given, and pairs already present in
/// `judged` are left out. Empty answers are never sent for judgment. Output is
/// sorted by question then answer.
pub fn pairs_to_judge(
    answer_sets: &[Vec<AnswerRecord>],
    questions: Option<&[String]>,
    judged: &[Judgment],
) -> Vec<QaPair> {
    let allowed: Option<HashSet<&str>> =
        questions.map(|qs| qs.iter().map(String::as_str).collect());
    let done: HashSet<(&str, &str)> = judged
        .iter()
        .map(|j| (j.question.as_str(), j.answer.as_str()))
        .collect();

    let mut out = BTreeSet::new();
    for a in answer_sets.iter().flatten() {
        if a.is_missing() {
            continue;
        }
        if let Some(allowed) = &allowed {
            if !allowed.contains(a.question.as_str()) {
                continue;
            }
        }
        if done.contains(&(a.question.as_str(), a.answer.as_str())) {
            continue;
        }
        out.insert(QaPair {
            question: a.question.clone(),
            answer: a.answer.clone(),
        });
    }
    out.into_iter().collect()
}

/// Applies the correctness threshold to raw judgments.
pub fn interpret(judgments: &[Judgment], threshold: f64) -> Vec<InterpretedJudgment> {
    judgments
        .iter()
        .map(|j| InterpretedJudgment {
            question: j.question.clone(),
            answer: j.answer.clone(),
            score: j.score,
            in_purview: j.in_purview,
            correct: is_correct(j.score, threshold),
        })
        .collect()
}

/// Attaches judgments to usage log rows by (question, answer).
///
/// Every log row is kept in its original order. Rows whose pair was never
/// judged get an empty score and count as incorrect. When a pair is judged
/// more than once the last judgment wins.
pub fn augment_usage_log(
    entries: &[UsageLogEntry],
    judgments: &[Judgment],
    threshold: f64,
) -> Vec<JudgedLogEntry> {
    let by_pair: HashMap<(&str, &str), &Judgment> = judgments
        .iter()
        .map(|j| ((j.question.as_str(), j.answer.as_str()), j))
        .collect();

    entries
        .iter()
        .map(|e| {
            let j = by_pair.get(&(e.question.as_str(), e.answer.as_str()));
            let score = j.and_then(|j| j.score);
            JudgedLogEntry {
                question: e.question.clone(),
                answer: e.answer.clone(),
                confidence: e.confidence,
                user_experience: e.user_experience.clone(),
                score,
                in_purview: j.and_then(|j| j.in_purview),
                correct: is_correct(score, threshold),
            }
        })
        .collect()
}
