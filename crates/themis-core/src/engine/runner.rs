use crate::context::RunContext;
use crate::errors::ThemisError;
use crate::model::{Question, ANSWER, ANSWER_ID, CONFIDENCE, QUESTION, QUESTION_ID};
use crate::providers::AnswerSource;
use crate::storage::CheckpointStore;
use serde::Serialize;
use std::path::Path;
use tracing::Instrument;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub total: usize,
    /// Already answered in an earlier run (or earlier in this one).
    pub skipped: usize,
    pub answered: usize,
    /// Answered with the backend's "no result".
    pub missing: usize,
}

/// Output layout for answers. The key column comes first: `Question Id` when
/// every question carries one, otherwise the question text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerLayout {
    keyed_by_id: bool,
}

impl AnswerLayout {
    pub fn for_questions(questions: &[Question]) -> Self {
        Self {
            keyed_by_id: !questions.is_empty() && questions.iter().all(|q| q.id.is_some()),
        }
    }

    pub fn columns(&self) -> Vec<&'static str> {
        let mut cols = Vec::with_capacity(5);
        if self.keyed_by_id {
            cols.push(QUESTION_ID);
        }
        cols.extend([QUESTION, ANSWER, CONFIDENCE, ANSWER_ID]);
        cols
    }

    pub fn key<'a>(&self, q: &'a Question) -> &'a str {
        match (&q.id, self.keyed_by_id) {
            (Some(id), true) => id,
            _ => &q.text,
        }
    }

    fn row(&self, q: &Question, rec: &crate::model::AnswerRecord) -> Vec<String> {
        let mut row = Vec::with_capacity(5);
        if self.keyed_by_id {
            row.push(self.key(q).to_string());
        }
        row.push(q.text.clone());
        row.push(rec.answer.clone());
        row.push(rec.confidence.to_string());
        row.push(rec.answer_id.clone().unwrap_or_default());
        row
    }
}

pub struct Runner<'a, S: AnswerSource + ?Sized> {
    pub ctx: &'a RunContext,
    pub source: &'a S,
    pub flush_interval: usize,
}

impl<'a, S: AnswerSource + ?Sized> Runner<'a, S> {
    pub fn new(ctx: &'a RunContext, source: &'a S) -> Self {
        Self {
            ctx,
            source,
            flush_interval: ctx.config.checkpoint_frequency,
        }
    }

    pub fn with_flush_interval(mut self, n: usize) -> Self {
        self.flush_interval = n;
        self
    }

    /// Answers every question not already in the checkpoint at `output`, in
    /// input order, one at a time. A backend error aborts the run; rows
    /// answered before it stay on disk for the next run.
    pub async fn run(&self, questions: &[Question], output: &Path) -> Result<RunSummary, ThemisError> {
        let span = self.ctx.span.clone();
        self.run_inner(questions, output).instrument(span).await
    }

    async fn run_inner(
        &self,
        questions: &[Question],
        output: &Path,
    ) -> Result<RunSummary, ThemisError> {
        let layout = AnswerLayout::for_questions(questions);
        let mut store = CheckpointStore::open(output, &layout.columns(), self.flush_interval)?;
        let mut summary = RunSummary {
            total: questions.len(),
            ..Default::default()
        };

        tracing::debug!(
            questions = questions.len(),
            fingerprint = %crate::fingerprint::question_set(questions),
            "question set"
        );
        if store.recovered_len() > 0 {
            tracing::debug!(
                file = %output.display(),
                recovered = store.recovered_len(),
                "resuming from checkpoint"
            );
        }

        for q in questions {
            let key = layout.key(q);
            if store.contains(key) {
                summary.skipped += 1;
                continue;
            }

            let rec = match self.source.answer(q).await {
                Ok(rec) => rec,
                Err(e) => {
                    tracing::error!(
                        backend = self.source.backend_name(),
                        question = %q.text,
                        answered = summary.answered,
                        error = %e,
                        "backend failed, aborting run"
                    );
                    return Err(e);
                }
            };
            tracing::debug!(question = %q.text, answer = %rec.answer, confidence = rec.confidence, "answered");

            if rec.is_missing() {
                summary.missing += 1;
            }
            store.append(layout.row(q, &rec))?;
            summary.answered += 1;
        }

        store.close()?;
        tracing::info!(
            backend = self.source.backend_name(),
            total = summary.total,
            answered = summary.answered,
            skipped = summary.skipped,
            missing = summary.missing,
            elapsed_ms = self.ctx.elapsed_ms(),
            "answering finished"
        );
        Ok(summary)
    }
}

/// Convenience wrapper over [`Runner`].
pub async fn answer_questions<S: AnswerSource + ?Sized>(
    ctx: &RunContext,
    questions: &[Question],
    source: &S,
    output: &Path,
    flush_interval: usize,
) -> Result<RunSummary, ThemisError> {
    Runner::new(ctx, source)
        .with_flush_interval(flush_interval)
        .run(questions, output)
        .await
}
