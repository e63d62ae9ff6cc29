use themis_core::config::ThemisConfig;
use themis_core::judge::{augment_usage_log, interpret as interpret_judgments, pairs_to_judge};
use themis_core::model::{AnswerRecord, Judgment, Question};
use themis_core::providers::usage_log::load_usage_log;
use themis_core::table::{load_records, TableSpec};

use super::{exit_codes, threshold, write_table};
use crate::cli::args::{AugmentArgs, JudgeInterpretArgs, JudgePairsArgs};

pub fn pairs(args: JudgePairsArgs) -> anyhow::Result<i32> {
    let answer_sets = args
        .answers
        .iter()
        .map(|p| load_records::<AnswerRecord>(p, &TableSpec::all()))
        .collect::<Result<Vec<_>, _>>()?;

    let questions = match &args.questions {
        Some(p) => Some(
            load_records::<Question>(p, &TableSpec::all())?
                .into_iter()
                .map(|q| q.text)
                .collect::<Vec<_>>(),
        ),
        None => None,
    };

    let mut judged = Vec::new();
    for p in &args.judgments {
        judged.extend(load_records::<Judgment>(p, &TableSpec::all())?);
    }

    let pairs = pairs_to_judge(&answer_sets, questions.as_deref(), &judged);
    tracing::info!(
        answer_files = answer_sets.len(),
        already_judged = judged.len(),
        pairs = pairs.len(),
        "pairs to judge"
    );
    write_table(args.output.as_deref(), &pairs)?;
    Ok(exit_codes::OK)
}

pub fn interpret(args: JudgeInterpretArgs, cfg: &ThemisConfig) -> anyhow::Result<i32> {
    let judgments: Vec<Judgment> = load_records(&args.judgments, &TableSpec::all())?;
    let t = threshold(args.judgment_threshold, cfg);
    let rows = interpret_judgments(&judgments, t);
    tracing::info!(
        judgments = rows.len(),
        correct = rows.iter().filter(|r| r.correct).count(),
        threshold = t,
        "interpreted judgments"
    );
    write_table(args.output.as_deref(), &rows)?;
    Ok(exit_codes::OK)
}

pub fn augment(args: AugmentArgs, cfg: &ThemisConfig) -> anyhow::Result<i32> {
    let entries = load_usage_log(&args.usage_log)?;
    let judgments: Vec<Judgment> = load_records(&args.judgments, &TableSpec::all())?;
    let t = threshold(args.judgment_threshold, cfg);
    let rows = augment_usage_log(&entries, &judgments, t);
    tracing::info!(
        log_entries = rows.len(),
        judged = rows.iter().filter(|r| r.score.is_some()).count(),
        threshold = t,
        "augmented usage log"
    );
    write_table(args.output.as_deref(), &rows)?;
    Ok(exit_codes::OK)
}
