use super::AnswerSource;
use crate::errors::ThemisError;
use crate::model::{AnswerRecord, Question};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Canned answers keyed by question text, with a record of every call.
#[derive(Default)]
pub struct ScriptedBackend {
    answers: HashMap<String, (String, f64)>,
    fail_on: Option<String>,
    calls: AtomicUsize,
    asked: Mutex<Vec<String>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_answer(mut self, question: &str, answer: &str, confidence: f64) -> Self {
        self.answers
            .insert(question.to_string(), (answer.to_string(), confidence));
        self
    }

    /// Answering this question fails with `BackendUnavailable`.
    pub fn failing_on(mut self, question: &str) -> Self {
        self.fail_on = Some(question.to_string());
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn asked(&self) -> Vec<String> {
        self.asked.lock().map(|v| v.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl AnswerSource for ScriptedBackend {
    async fn answer(&self, question: &Question) -> Result<AnswerRecord, ThemisError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut asked) = self.asked.lock() {
            asked.push(question.text.clone());
        }
        if self.fail_on.as_deref() == Some(question.text.as_str()) {
            return Err(ThemisError::backend("scripted", "connection refused"));
        }
        Ok(match self.answers.get(&question.text) {
            Some((a, c)) => AnswerRecord::new(&question.text, a, *c),
            None => AnswerRecord::missing(&question.text),
        })
    }

    fn backend_name(&self) -> &'static str {
        "scripted"
    }
}
