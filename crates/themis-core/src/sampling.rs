//! Building question sets from usage logs.

use crate::errors::ThemisError;
use crate::model::{FrequencyRecord, UsageLogEntry};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::HashMap;

/// How often each question was asked, most frequent first, ties by question.
pub fn question_frequencies(entries: &[UsageLogEntry]) -> Vec<FrequencyRecord> {
    let mut counts: HashMap<&str, u64> = HashMap::new();
    for e in entries {
        *counts.entry(e.question.as_str()).or_insert(0) += 1;
    }
    let mut out: Vec<FrequencyRecord> = counts
        .into_iter()
        .map(|(q, n)| FrequencyRecord {
            question: q.to_string(),
            frequency: n,
        })
        .collect();
    out.sort_by(|a, b| {
        b.frequency
            .cmp(&a.frequency)
            .then_with(|| a.question.cmp(&b.question))
    });
    out
}

/// Samples `n` distinct questions without replacement, weighted by frequency.
///
/// The same `seed` always reproduces the same sample. Zero-frequency questions
/// are only taken once every weighted one has been. The result keeps the input
/// order.
pub fn weighted_sample(
    items: &[FrequencyRecord],
    n: usize,
    seed: u64,
) -> Result<Vec<FrequencyRecord>, ThemisError> {
    if n >= items.len() {
        return Ok(items.to_vec());
    }
    let mut rng = StdRng::seed_from_u64(seed);
    let indices: Vec<usize> = (0..items.len()).collect();
    let mut chosen: Vec<usize> = indices
        .choose_multiple_weighted(&mut rng, n, |&i| items[i].frequency as f64)
        .map_err(|e| ThemisError::Config(format!("cannot sample test set: {}", e)))?
        .copied()
        .collect();
    chosen.sort_unstable();
    Ok(chosen.into_iter().map(|i| items[i].clone()).collect())
}

/// Question set with frequencies, optionally sampled down to `n` questions.
pub fn create_test_set(
    entries: &[UsageLogEntry],
    n: Option<usize>,
    seed: u64,
) -> Result<Vec<FrequencyRecord>, ThemisError> {
    let freqs = question_frequencies(entries);
    match n {
        Some(n) => {
            tracing::info!(unique = freqs.len(), sample = n, seed, "sampling test set");
            weighted_sample(&freqs, n, seed)
        }
        None => Ok(freqs),
    }
}
