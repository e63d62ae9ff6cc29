/// Default judgment score at or above which an answer is correct.
pub const DEFAULT_JUDGMENT_THRESHOLD: f64 = 50.0;

/// Unjudged answers are never correct.
pub fn is_correct(score: Option<f64>, threshold: f64) -> bool {
    matches!(score, Some(s) if s >= threshold)
}
