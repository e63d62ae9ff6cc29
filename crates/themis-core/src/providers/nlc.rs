use super::{http_client, AnswerSource};
use crate::errors::ThemisError;
use crate::model::{AnswerRecord, CorpusEntry, Question};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::collections::HashMap;

const BACKEND: &str = "nlc";

/// Answers questions with a trained natural language classifier whose class
/// labels are corpus answer ids.
pub struct NlcClient {
    pub url: String,
    pub username: String,
    pub password: String,
    pub classifier_id: String,
    corpus: HashMap<String, String>,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
pub struct ClassifyResponse {
    pub top_class: String,
    #[serde(default)]
    pub classes: Vec<ClassScore>,
}

#[derive(Debug, Deserialize)]
pub struct ClassScore {
    pub class_name: String,
    pub confidence: f64,
}

impl NlcClient {
    pub fn new(
        url: &str,
        username: &str,
        password: &str,
        classifier_id: &str,
        corpus: Vec<CorpusEntry>,
        timeout: Option<std::time::Duration>,
    ) -> Result<Self, ThemisError> {
        Ok(Self {
            url: url.trim_end_matches('/').to_string(),
            username: username.to_string(),
            password: password.to_string(),
            classifier_id: classifier_id.to_string(),
            corpus: corpus
                .into_iter()
                .map(|e| (e.answer_id, e.answer))
                .collect(),
            client: http_client(BACKEND, timeout)?,
        })
    }

    pub fn classify_url(&self) -> String {
        format!("{}/v1/classifiers/{}/classify", self.url, self.classifier_id)
    }

    /// Resolves a classifier response to answer text. The corpus must cover
    /// every label the model was trained on.
    pub fn resolve(
        &self,
        question: &str,
        resp: &ClassifyResponse,
    ) -> Result<AnswerRecord, ThemisError> {
        let answer = self.corpus.get(&resp.top_class).ok_or_else(|| {
            ThemisError::backend(
                BACKEND,
                format!("class '{}' not found in corpus", resp.top_class),
            )
        })?;
        let confidence = resp
            .classes
            .iter()
            .find(|c| c.class_name == resp.top_class)
            .or_else(|| resp.classes.first())
            .map(|c| c.confidence)
            .unwrap_or(0.0);
        Ok(AnswerRecord::new(question, answer, confidence).with_answer_id(&resp.top_class))
    }
}

#[async_trait]
impl AnswerSource for NlcClient {
    async fn answer(&self, question: &Question) -> Result<AnswerRecord, ThemisError> {
        let resp = self
            .client
            .post(self.classify_url())
            .basic_auth(&self.username, Some(&self.password))
            .json(&json!({ "text": question.text }))
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

        let parsed: ClassifyResponse = resp
            .json()
            .await
            .map_err(|e| ThemisError::backend(BACKEND, e))?;
        self.resolve(&question.text, &parsed)
    }

    fn backend_name(&self) -> &'static str {
        BACKEND
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> NlcClient {
        NlcClient::new(
            "https://gateway.example.com/natural-language-classifier/api/",
            "user",
            "secret",
            "c-123",
            vec![
                CorpusEntry {
                    answer_id: "a1".into(),
                    answer: "Paris".into(),
                    title: None,
                },
                CorpusEntry {
                    answer_id: "a2".into(),
                    answer: "Four".into(),
                    title: Some("Arithmetic".into()),
                },
            ],
            None,
        )
        .unwrap()
    }

    fn response(raw: &str) -> ClassifyResponse {
        serde_json::from_str(raw).unwrap()
    }

    #[test]
    fn test_classify_url() {
        assert_eq!(
            client().classify_url(),
            "https://gateway.example.com/natural-language-classifier/api/v1/classifiers/c-123/classify"
        );
    }

    #[test]
    fn test_top_class_resolves_through_corpus() {
        let resp = response(
            r#"{"classifier_id":"c-123","top_class":"a1",
                "classes":[{"class_name":"a1","confidence":0.82},{"class_name":"a2","confidence":0.1}]}"#,
        );
        let rec = client().resolve("Capital of France?", &resp).unwrap();
        assert_eq!(
            rec,
            AnswerRecord::new("Capital of France?", "Paris", 0.82).with_answer_id("a1")
        );
    }

    #[test]
    fn test_unknown_label_is_backend_error() {
        let resp = response(r#"{"top_class":"a9","classes":[{"class_name":"a9","confidence":0.5}]}"#);
        let err = client().resolve("q", &resp).unwrap_err();
        assert!(matches!(err, ThemisError::BackendUnavailable { .. }));
        assert!(err.to_string().contains("a9"));
    }
}
