use crate::engine::RunSummary;
use crate::merge::EvaluationSummary;

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

pub fn print_run_summary(backend: &str, summary: &RunSummary) {
    eprintln!("\n{}", RULE);
    eprintln!(
        "{}: {} questions, {} answered, {} already on disk, {} without an answer",
        backend, summary.total, summary.answered, summary.skipped, summary.missing
    );
}

pub fn print_evaluation_summary(summary: &EvaluationSummary, threshold: f64) {
    eprintln!("\n{}", RULE);
    eprintln!(
        "{} answers: {} judged, {} unjudged, {} correct at threshold {}",
        summary.rows, summary.judged, summary.unjudged, summary.correct, threshold
    );
    if summary.judged > 0 {
        eprintln!(
            "Accuracy on judged answers: {:.1}%",
            100.0 * summary.correct as f64 / summary.judged as f64
        );
    }
    if let Some((lo, hi)) = summary.confidence_range {
        eprintln!("Confidence range: {:.4} .. {:.4}", lo, hi);
    }
    if let Some((lo, hi)) = summary.correct_confidence_range {
        eprintln!("Correct confidence range: {:.4} .. {:.4}", lo, hi);
    }
    if summary.in_purview_unjudged > 0 {
        eprintln!(
            "⚠️  {} in-purview answers have no judgment",
            summary.in_purview_unjudged
        );
    }
}
