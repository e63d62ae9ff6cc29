use crate::errors::ThemisError;
use crate::model::CorpusEntry;
use crate::table::{load_records, TableSpec};
use std::path::Path;

pub fn load_corpus(path: &Path) -> Result<Vec<CorpusEntry>, ThemisError> {
    load_records(path, &TableSpec::all())
}

/// Drops entries with no answer text and, when `max_size` is set, entries
/// whose answer is longer than `max_size` characters.
pub fn filter_corpus(entries: Vec<CorpusEntry>, max_size: Option<usize>) -> Vec<CorpusEntry> {
    let before = entries.len();
    let kept: Vec<CorpusEntry> = entries
        .into_iter()
        .filter(|e| !e.answer.trim().is_empty())
        .filter(|e| max_size.map_or(true, |m| e.answer.chars().count() <= m))
        .collect();
    tracing::info!(before, after = kept.len(), max_size = ?max_size, "filtered corpus");
    kept
}
