use super::{http_client, AnswerSource};
use crate::config::SolrSettings;
use crate::errors::ThemisError;
use crate::model::{AnswerRecord, Question};
use async_trait::async_trait;
use serde_json::Value;

const BACKEND: &str = "solr";

/// Answers a question with the top-ranked document of a Solr full-text query.
pub struct SolrClient {
    pub url: String,
    pub settings: SolrSettings,
    pub client: reqwest::Client,
}

impl SolrClient {
    pub fn new(
        url: &str,
        settings: SolrSettings,
        timeout: Option<std::time::Duration>,
    ) -> Result<Self, ThemisError> {
        Ok(Self {
            url: url.trim_end_matches('/').to_string(),
            settings,
            client: http_client(BACKEND, timeout)?,
        })
    }

    pub fn select_url(&self) -> String {
        format!("{}/select", self.url)
    }

    pub fn query_params(&self, question: &str) -> Vec<(&'static str, String)> {
        vec![
            ("q", escape_query(question)),
            ("wt", "json".to_string()),
            ("fl", "*,score".to_string()),
            ("rows", self.settings.rows.max(1).to_string()),
        ]
    }
}

#[async_trait]
impl AnswerSource for SolrClient {
    async fn answer(&self, question: &Question) -> Result<AnswerRecord, ThemisError> {
        let resp = self
            .client
            .get(self.select_url())
            .query(&self.query_params(&question.text))
            .send()
            .await
            .map_err(|e| ThemisError::backend(BACKEND, e))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(ThemisError::backend(
                BACKEND,
                format!("HTTP {}: {}", status, body),
            ));
        }

        let json: Value = resp
            .json()
            .await
            .map_err(|e| ThemisError::backend(BACKEND, e))?;
        parse_select_response(&question.text, &json, &self.settings)
    }

    fn backend_name(&self) -> &'static str {
        BACKEND
    }
}

/// Turns a `/select` JSON response into an answer. No hits is a missing answer.
pub fn parse_select_response(
    question: &str,
    json: &Value,
    settings: &SolrSettings,
) -> Result<AnswerRecord, ThemisError> {
    let docs = json
        .pointer("/response/docs")
        .and_then(|d| d.as_array())
        .ok_or_else(|| ThemisError::backend(BACKEND, "response missing response.docs"))?;

    let Some(top) = docs.first() else {
        return Ok(AnswerRecord::missing(question));
    };

    let answer = field_text(top, &settings.answer_field).ok_or_else(|| {
        ThemisError::backend(
            BACKEND,
            format!("top document has no '{}' field", settings.answer_field),
        )
    })?;
    let score = top.get("score").and_then(|s| s.as_f64()).unwrap_or(0.0);

    let mut rec = AnswerRecord::new(question, answer, score);
    if let Some(id) = field_text(top, &settings.id_field) {
        rec = rec.with_answer_id(id);
    }
    Ok(rec)
}

// Solr returns multi-valued fields as arrays.
fn field_text(doc: &Value, field: &str) -> Option<String> {
    match doc.get(field)? {
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => items.first().and_then(|v| v.as_str()).map(String::from),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Backslash-escapes Lucene query syntax so a question is searched as text.
pub fn escape_query(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(
            c,
            '+' | '-'
                | '&'
                | '|'
                | '!'
                | '('
                | ')'
                | '{'
                | '}'
                | '['
                | ']'
                | '^'
                | '"'
                | '~'
                | '*'
                | '?'
                | ':'
                | '\\'
                | '/'
        ) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
