use super::AnswerSource;
use crate::errors::ThemisError;
use crate::model::{
    AnswerRecord, Question, UsageLogEntry, ANSWER, CONFIDENCE, QUESTION, QUESTION_TEXT,
    TOP_ANSWER_CONFIDENCE, TOP_ANSWER_TEXT, USER_EXPERIENCE,
};
use crate::table::{Table, TableSpec};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

/// Column selection that maps a service usage log onto Themis column names.
pub fn usage_log_spec() -> TableSpec {
    TableSpec::columns(&[
        QUESTION_TEXT,
        TOP_ANSWER_TEXT,
        TOP_ANSWER_CONFIDENCE,
        USER_EXPERIENCE,
    ])
    .rename(QUESTION_TEXT, QUESTION)
    .rename(TOP_ANSWER_TEXT, ANSWER)
    .rename(TOP_ANSWER_CONFIDENCE, CONFIDENCE)
}

pub fn load_usage_log(path: &Path) -> Result<Vec<UsageLogEntry>, ThemisError> {
    Table::load(path, &usage_log_spec())?.records()
}

/// Answers questions with whatever the live system answered last time the
/// same question was asked.
pub struct UsageLogLookup {
    latest: HashMap<String, UsageLogEntry>,
    outcomes: BTreeMap<String, usize>,
}

impl UsageLogLookup {
    /// Logs are chronological, so later entries win.
    pub fn new(entries: Vec<UsageLogEntry>) -> Self {
        let mut latest = HashMap::new();
        let mut outcomes = BTreeMap::new();
        for e in entries {
            let outcome = e.user_experience.clone().unwrap_or_default();
            *outcomes.entry(outcome).or_insert(0) += 1;
            latest.insert(e.question.clone(), e);
        }
        Self { latest, outcomes }
    }

    pub fn from_path(path: &Path) -> Result<Self, ThemisError> {
        Ok(Self::new(load_usage_log(path)?))
    }

    pub fn distinct_questions(&self) -> usize {
        self.latest.len()
    }

    /// Number of log entries per user-experience marker.
    pub fn outcome_counts(&self) -> &BTreeMap<String, usize> {
        &self.outcomes
    }
}

#[async_trait]
impl AnswerSource for UsageLogLookup {
    async fn answer(&self, question: &Question) -> Result<AnswerRecord, ThemisError> {
        Ok(match self.latest.get(&question.text) {
            Some(e) => AnswerRecord::new(&question.text, &e.answer, e.confidence),
            None => AnswerRecord::missing(&question.text),
        })
    }

    fn backend_name(&self) -> &'static str {
        "usage-log"
    }
}
