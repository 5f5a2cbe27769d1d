//! Japanese to English translation of diary content.
//!
//! [`TranslationService`] never fails: an empty text is returned as is, and a
//! provider error becomes an inline `[Translation error: ...]` placeholder so
//! the entry is still saved.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

pub const DEFAULT_TRANSLATE_URL: &str = "https://translate.googleapis.com/translate_a/single";

#[derive(Error, Debug)]
pub enum TranslationError {
    #[error("{0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),
}

#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, text: &str) -> Result<String, TranslationError>;
}

/// Google's public translate endpoint, `ja` to `en`.
pub struct GoogleTranslator {
    client: reqwest::Client,
    endpoint: String,
}

impl GoogleTranslator {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl Translator for GoogleTranslator {
    async fn translate(&self, text: &str) -> Result<String, TranslationError> {
        let body: Value = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("client", "gtx"),
                ("sl", "ja"),
                ("tl", "en"),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        parse_response(&body)
    }
}

/// The endpoint answers `[[["Hello", "こんにちは", ...], ...], ...]`: one
/// array per sentence, translated text first.
fn parse_response(body: &Value) -> Result<String, TranslationError> {
    let sentences = body
        .get(0)
        .and_then(Value::as_array)
        .ok_or_else(|| TranslationError::UnexpectedResponse(body.to_string()))?;

    Ok(sentences
        .iter()
        .filter_map(|sentence| sentence.get(0).and_then(Value::as_str))
        .collect())
}

#[derive(Clone)]
pub struct TranslationService {
    backend: Arc<dyn Translator>,
}

impl TranslationService {
    pub fn new(backend: impl Translator + 'static) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    pub async fn translate(&self, text: &str) -> String {
        if text.is_empty() {
            return String::new();
        }

        match self.backend.translate(text).await {
            Ok(translated) => translated,
            Err(e) => {
                log::error!("Translation error: {}", e);
                format!("[Translation error: {}]", e)
            }
        }
    }
}
