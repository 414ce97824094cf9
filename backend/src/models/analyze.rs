use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::Language;

fn default_language() -> String {
    Language::default().code().to_string()
}

/// Body of `POST /analyze`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AnalyzeRequest {
    pub text: String,
    /// Conversational focus inserted into the system prompt
    pub category: String,
    #[serde(default = "default_language")]
    #[schema(default = "en", example = "ml")]
    pub language: String,
}

impl AnalyzeRequest {
    pub fn language(&self) -> Language {
        Language::from_code(&self.language)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    Mp3,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AnalyzeResponse {
    pub response: String,
    /// Base64 encoded speech for `response`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_format: Option<AudioFormat>,
}

impl AnalyzeResponse {
    pub fn text(response: String) -> Self {
        Self { response, audio: None, audio_format: None }
    }

    pub fn with_audio(response: String, audio: String) -> Self {
        Self { response, audio: Some(audio), audio_format: Some(AudioFormat::Mp3) }
    }
}
