use themis_core::config::ThemisConfig;
use themis_core::corpus::{filter_corpus, load_corpus};
use themis_core::providers::usage_log::load_usage_log;
use themis_core::sampling::create_test_set;

use super::{exit_codes, write_table};
use crate::cli::args::{CorpusFilterArgs, TestSetArgs};

pub fn test_set(args: TestSetArgs, cfg: &ThemisConfig) -> anyhow::Result<i32> {
    let entries = load_usage_log(&args.usage_log)?;
    let seed = args
        .seed
        .or(cfg.seed)
        .unwrap_or_else(|| chrono::Utc::now().timestamp_micros() as u64);
    if args.n.is_some() {
        // Logged so an unseeded sample can be reproduced.
        tracing::info!(seed, "test set seed");
    }
    let set = create_test_set(&entries, args.n, seed)?;
    tracing::info!(
        log_entries = entries.len(),
        questions = set.len(),
        "created test set"
    );
    write_table(args.output.as_deref(), &set)?;
    Ok(exit_codes::OK)
}

pub fn corpus_filter(args: CorpusFilterArgs) -> anyhow::Result<i32> {
    let corpus = load_corpus(&args.corpus)?;
    let kept = filter_corpus(corpus, args.max_size);
    write_table(args.output.as_deref(), &kept)?;
    Ok(exit_codes::OK)
}
