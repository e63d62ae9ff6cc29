use crate::config::ThemisConfig;
use chrono::{DateTime, Utc};

/// Per-invocation state handed to engine entry points. Built once by the
/// caller for a single command and dropped when it finishes.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub config: ThemisConfig,
    pub command: String,
    pub started_at: DateTime<Utc>,
    pub span: tracing::Span,
}

impl RunContext {
    pub fn new(command: &str, config: ThemisConfig) -> Self {
        let started_at = Utc::now();
        let span = tracing::info_span!("command", name = %command, started_at = %started_at.to_rfc3339());
        Self {
            config,
            command: command.to_string(),
            started_at,
            span,
        }
    }

    pub fn elapsed_ms(&self) -> i64 {
        (Utc::now() - self.started_at).num_milliseconds()
    }
}

impl Default for RunContext {
    fn default() -> Self {
        Self::new("default", ThemisConfig::default())
    }
}
