use crate::table::Record;
use serde::{Deserialize, Deserializer, Serialize};

pub const QUESTION: &str = "Question";
pub const QUESTION_ID: &str = "Question Id";
pub const ANSWER: &str = "Answer";
pub const ANSWER_ID: &str = "Answer Id";
pub const TITLE: &str = "Title";
pub const CONFIDENCE: &str = "Confidence";
pub const FREQUENCY: &str = "Frequency";
pub const JUDGMENT: &str = "Judgment";
pub const IN_PURVIEW: &str = "In Purview";
pub const CORRECT: &str = "Correct";

// Usage log columns as exported by the answering service.
pub const QUESTION_TEXT: &str = "QuestionText";
pub const TOP_ANSWER_TEXT: &str = "TopAnswerText";
pub const TOP_ANSWER_CONFIDENCE: &str = "TopAnswerConfidence";
pub const USER_EXPERIENCE: &str = "UserExperience";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    #[serde(rename = "Question Id", default)]
    pub id: Option<String>,
    #[serde(rename = "Question")]
    pub text: String,
}

impl Question {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: None,
            text: text.into(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

impl Record for Question {
    const COLUMNS: &'static [&'static str] = &[QUESTION_ID, QUESTION];
    const REQUIRED: &'static [&'static str] = &[QUESTION];
}

/// One answer returned by a backend. An empty `answer` with zero confidence is
/// a well-formed "no result".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerRecord {
    #[serde(rename = "Question")]
    pub question: String,
    #[serde(rename = "Answer", default)]
    pub answer: String,
    #[serde(rename = "Confidence", default, deserialize_with = "zero_if_empty")]
    pub confidence: f64,
    #[serde(rename = "Answer Id", default)]
    pub answer_id: Option<String>,
}

impl AnswerRecord {
    pub fn new(question: impl Into<String>, answer: impl Into<String>, confidence: f64) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            confidence,
            answer_id: None,
        }
    }

    pub fn missing(question: impl Into<String>) -> Self {
        Self::new(question, "", 0.0)
    }

    pub fn with_answer_id(mut self, id: impl Into<String>) -> Self {
        self.answer_id = Some(id.into());
        self
    }

    pub fn is_missing(&self) -> bool {
        self.answer.is_empty()
    }
}

impl Record for AnswerRecord {
    const COLUMNS: &'static [&'static str] = &[QUESTION, ANSWER, CONFIDENCE, ANSWER_ID];
    const REQUIRED: &'static [&'static str] = &[QUESTION, ANSWER, CONFIDENCE];
}

/// Human correctness judgment for one (question, answer) pair, on the
/// annotator's native scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Judgment {
    #[serde(rename = "Question")]
    pub question: String,
    #[serde(rename = "Answer")]
    pub answer: String,
    #[serde(rename = "Judgment", default)]
    pub score: Option<f64>,
    #[serde(rename = "In Purview", default, deserialize_with = "flexible_bool")]
    pub in_purview: Option<bool>,
}

impl Judgment {
    pub fn new(question: impl Into<String>, answer: impl Into<String>, score: f64) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            score: Some(score),
            in_purview: None,
        }
    }
}

impl Record for Judgment {
    const COLUMNS: &'static [&'static str] = &[QUESTION, ANSWER, JUDGMENT, IN_PURVIEW];
    const REQUIRED: &'static [&'static str] = &[QUESTION, ANSWER, JUDGMENT];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrequencyRecord {
    #[serde(rename = "Question")]
    pub question: String,
    #[serde(rename = "Frequency", default, deserialize_with = "zero_if_empty")]
    pub frequency: u64,
}

impl Record for FrequencyRecord {
    const COLUMNS: &'static [&'static str] = &[QUESTION, FREQUENCY];
}

/// Usage log row after its service column names have been mapped onto ours.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageLogEntry {
    #[serde(rename = "Question")]
    pub question: String,
    #[serde(rename = "Answer", default)]
    pub answer: String,
    #[serde(rename = "Confidence", default, deserialize_with = "zero_if_empty")]
    pub confidence: f64,
    #[serde(rename = "UserExperience", default)]
    pub user_experience: Option<String>,
}

impl Record for UsageLogEntry {
    const COLUMNS: &'static [&'static str] = &[QUESTION, ANSWER, CONFIDENCE, USER_EXPERIENCE];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorpusEntry {
    #[serde(rename = "Answer Id")]
    pub answer_id: String,
    #[serde(rename = "Answer", default)]
    pub answer: String,
    #[serde(rename = "Title", default)]
    pub title: Option<String>,
}

impl Record for CorpusEntry {
    const COLUMNS: &'static [&'static str] = &[ANSWER_ID, ANSWER, TITLE];
    const REQUIRED: &'static [&'static str] = &[ANSWER_ID, ANSWER];
}

/// A (question, answer) pair awaiting human judgment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QaPair {
    #[serde(rename = "Question")]
    pub question: String,
    #[serde(rename = "Answer")]
    pub answer: String,
}

impl Record for QaPair {
    const COLUMNS: &'static [&'static str] = &[QUESTION, ANSWER];
}

/// A judgment with the correctness threshold applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterpretedJudgment {
    #[serde(rename = "Question")]
    pub question: String,
    #[serde(rename = "Answer")]
    pub answer: String,
    #[serde(rename = "Judgment")]
    pub score: Option<f64>,
    #[serde(rename = "In Purview", default, deserialize_with = "flexible_bool")]
    pub in_purview: Option<bool>,
    #[serde(rename = "Correct")]
    pub correct: bool,
}

impl Record for InterpretedJudgment {
    const COLUMNS: &'static [&'static str] = &[QUESTION, ANSWER, JUDGMENT, IN_PURVIEW, CORRECT];
}

/// A usage log row with the judgment of its (question, answer) pair attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JudgedLogEntry {
    #[serde(rename = "Question")]
    pub question: String,
    #[serde(rename = "Answer")]
    pub answer: String,
    #[serde(rename = "Confidence")]
    pub confidence: f64,
    #[serde(rename = "UserExperience", default)]
    pub user_experience: Option<String>,
    #[serde(rename = "Judgment")]
    pub score: Option<f64>,
    #[serde(rename = "In Purview", default, deserialize_with = "flexible_bool")]
    pub in_purview: Option<bool>,
    #[serde(rename = "Correct")]
    pub correct: bool,
}

impl Record for JudgedLogEntry {
    const COLUMNS: &'static [&'static str] = &[
        QUESTION,
        ANSWER,
        CONFIDENCE,
        USER_EXPERIENCE,
        JUDGMENT,
        IN_PURVIEW,
        CORRECT,
    ];
}

/// Joined answer, judgment and frequency for one (question, answer) pair.
/// `score == None` means unjudged, which is distinct from judged incorrect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRow {
    #[serde(rename = "Question")]
    pub question: String,
    #[serde(rename = "Answer")]
    pub answer: String,
    #[serde(rename = "Answer Id")]
    pub answer_id: Option<String>,
    #[serde(rename = "Confidence")]
    pub confidence: f64,
    #[serde(rename = "Frequency")]
    pub frequency: u64,
    #[serde(rename = "Judgment")]
    pub score: Option<f64>,
    #[serde(rename = "In Purview", default, deserialize_with = "flexible_bool")]
    pub in_purview: Option<bool>,
    #[serde(rename = "Correct")]
    pub correct: bool,
}

impl EvaluationRow {
    pub fn is_judged(&self) -> bool {
        self.score.is_some()
    }
}

impl Record for EvaluationRow {
    const COLUMNS: &'static [&'static str] = &[
        QUESTION, ANSWER, ANSWER_ID, CONFIDENCE, FREQUENCY, JUDGMENT, IN_PURVIEW, CORRECT,
    ];
}

fn zero_if_empty<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(d)?.unwrap_or_default())
}

// Exported spreadsheets spell booleans every way imaginable.
fn flexible_bool<'de, D>(d: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(d)?;
    let Some(raw) = raw else {
        return Ok(None);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "" => Ok(None),
        "true" | "t" | "yes" | "y" | "1" => Ok(Some(true)),
        "false" | "f" | "no" | "n" | "0" => Ok(Some(false)),
        other => Err(serde::de::Error::custom(format!(
            "invalid boolean '{}'",
            other
        ))),
    }
}
