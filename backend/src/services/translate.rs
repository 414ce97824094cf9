//! Machine translation of user input
//!
//! Translation is best effort: callers use [`translate_or_original`], which
//! never fails and hands back the input when the provider does.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

use crate::config::TranslateConfig;

#[derive(Debug, Error)]
pub enum TranslateError {
    #[error("Translation request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Translation service returned HTTP {0}")]
    Status(u16),

    #[error("Unexpected translation response: {0}")]
    Parse(String),
}

/// Translates text into a target language, source auto-detected
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, text: &str, target: &str) -> Result<String, TranslateError>;
}

/// Client for the public Google Translate web endpoint (`client=gtx`)
pub struct GoogleTranslator {
    http_client: Client,
    endpoint: String,
}

impl GoogleTranslator {
    pub fn new(config: &TranslateConfig) -> Result<Self, TranslateError> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { http_client, endpoint: config.endpoint.clone() })
    }
}

#[async_trait]
impl Translator for GoogleTranslator {
    async fn translate(&self, text: &str, target: &str) -> Result<String, TranslateError> {
        if text.trim().is_empty() {
            return Ok(text.to_string());
        }

        let response = self
            .http_client
            .get(&self.endpoint)
            .query(&[("client", "gtx"), ("sl", "auto"), ("tl", target), ("dt", "t"), ("q", text)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(TranslateError::Status(response.status().as_u16()));
        }

        let body: Value = response.json().await?;
        parse_translation(&body)
    }
}

/// Join the translated segments at `body[0][i][0]`
pub(crate) fn parse_translation(body: &Value) -> Result<String, TranslateError> {
    let segments = body
        .get(0)
        .and_then(Value::as_array)
        .ok_or_else(|| TranslateError::Parse("missing segment list".to_string()))?;

    let translated: String = segments
        .iter()
        .filter_map(|segment| segment.get(0).and_then(Value::as_str))
        .collect();

    if translated.trim().is_empty() {
        return Err(TranslateError::Parse("empty translation".to_string()));
    }
    Ok(translated)
}

/// Translate `text`, falling back to the original on any failure
pub async fn translate_or_original(translator: &dyn Translator, text: &str, target: &str) -> String {
    match translator.translate(text, target).await {
        Ok(translated) => {
            tracing::debug!("Translated input to '{}' ({} chars)", target, translated.chars().count());
            translated
        },
        Err(e) => {
            tracing::warn!("Translation to '{}' failed, using original text: {}", target, e);
            text.to_string()
        },
    }
}
