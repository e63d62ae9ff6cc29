use crate::errors::ThemisError;
use crate::model::{AnswerRecord, Question};
use async_trait::async_trait;

pub mod fake;
pub mod nlc;
pub mod solr;
pub mod usage_log;

pub use nlc::NlcClient;
pub use solr::SolrClient;
pub use usage_log::UsageLogLookup;

/// A source of answers for single questions.
///
/// Implementations may perform network I/O but hold no engine state. A
/// well-formed "no result" is `AnswerRecord::missing`, not an error.
#[async_trait]
pub trait AnswerSource: Send + Sync {
    async fn answer(&self, question: &Question) -> Result<AnswerRecord, ThemisError>;
    fn backend_name(&self) -> &'static str;
}

/// The answer backends Themis can evaluate.
pub enum Backend {
    UsageLog(UsageLogLookup),
    Solr(SolrClient),
    Nlc(NlcClient),
}

#[async_trait]
impl AnswerSource for Backend {
    async fn answer(&self, question: &Question) -> Result<AnswerRecord, ThemisError> {
        match self {
            Backend::UsageLog(b) => b.answer(question).await,
            Backend::Solr(b) => b.answer(question).await,
            Backend::Nlc(b) => b.answer(question).await,
        }
    }

    fn backend_name(&self) -> &'static str {
        match self {
            Backend::UsageLog(b) => b.backend_name(),
            Backend::Solr(b) => b.backend_name(),
            Backend::Nlc(b) => b.backend_name(),
        }
    }
}

pub(crate) fn http_client(
    backend: &str,
    timeout: Option<std::time::Duration>,
) -> Result<reqwest::Client, ThemisError> {
    let mut builder = reqwest::Client::builder();
    if let Some(t) = timeout {
        builder = builder.timeout(t);
    }
    builder.build().map_err(|e| ThemisError::backend(backend, e))
}
