use themis_core::config::ThemisConfig;
use themis_core::merge::{merge_with, EvaluationTable, JoinMode};
use themis_core::model::{AnswerRecord, FrequencyRecord, Judgment};
use themis_core::report::print_evaluation_summary;
use themis_core::table::{load_records, TableSpec};
use themis_metrics::{compute, CurveKind};

use super::{exit_codes, invalid_arg, output_delimiter, threshold, write_table};
use crate::cli::args::{CollateArgs, CurvesArgs, EvaluationInputs};

/// Loads the three inputs, joins them and marks correctness.
fn evaluation_table(inputs: &EvaluationInputs, cfg: &ThemisConfig) -> anyhow::Result<(EvaluationTable, f64)> {
    let mode: JoinMode = inputs.join.parse().map_err(invalid_arg)?;
    let frequencies: Vec<FrequencyRecord> = load_records(&inputs.test_set, &TableSpec::all())?;
    let judgments: Vec<Judgment> = load_records(&inputs.judgments, &TableSpec::all())?;
    let answers: Vec<AnswerRecord> = load_records(&inputs.answers, &TableSpec::all())?;

    let t = threshold(inputs.judgment_threshold, cfg);
    let table = merge_with(&answers, &judgments, &frequencies, mode).mark_correct(t);
    Ok((table, t))
}

pub fn curves(args: CurvesArgs, cfg: &ThemisConfig) -> anyhow::Result<i32> {
    let kind: CurveKind = args.kind.parse().map_err(invalid_arg)?;
    let (table, t) = evaluation_table(&args.inputs, cfg)?;
    let summary = table.summarize();
    if summary.unjudged > 0 {
        tracing::warn!(unjudged = summary.unjudged, "unjudged answers count as incorrect");
    }

    let curve = compute(kind, &table.rows);
    if curve.is_empty() {
        tracing::warn!(curve = kind.name(), rows = table.len(), threshold = t, "curve has no points");
    }

    let output = args.inputs.output.as_deref();
    let delimiter = output_delimiter(output);
    match output {
        Some(path) => {
            let file = std::fs::File::create(path)
                .map_err(|e| themis_core::ThemisError::io(path, e))?;
            curve.write_to(std::io::BufWriter::new(file), delimiter)?;
            tracing::info!(file = %path.display(), points = curve.points.len(), "wrote curve");
        }
        None => curve.write_to(std::io::stdout().lock(), delimiter)?,
    }
    Ok(exit_codes::OK)
}

pub fn collate(args: CollateArgs, cfg: &ThemisConfig) -> anyhow::Result<i32> {
    let (mut table, t) = evaluation_table(&args.inputs, cfg)?;
    table.sort_for_collate();
    print_evaluation_summary(&table.summarize(), t);
    write_table(args.inputs.output.as_deref(), &table.rows)?;
    Ok(exit_codes::OK)
}
