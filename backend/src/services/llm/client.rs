//! HTTP client for OpenAI-compatible chat-completion endpoints

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::{Duration, Instant};

use super::models::{ChatCompletionRequest, ChatMessage, LLMError};
use crate::config::LLMConfig;

/// Generates one assistant reply for a conversation
#[async_trait]
pub trait ChatCompletion: Send + Sync {
    async fn complete(&self, messages: Vec<ChatMessage>) -> Result<String, LLMError>;

    /// Whether credentials are present; calls fail fast when false
    fn is_available(&self) -> bool {
        true
    }
}

pub struct LLMClient {
    http_client: Client,
    api_url: String,
    api_key: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl LLMClient {
    pub fn new(config: &LLMConfig) -> Result<Self, LLMError> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LLMError::ApiError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    pub fn build_request(&self, messages: Vec<ChatMessage>) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.model.clone(),
            messages,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }
}

#[async_trait]
impl ChatCompletion for LLMClient {
    async fn complete(&self, messages: Vec<ChatMessage>) -> Result<String, LLMError> {
        if !self.is_available() {
            return Err(LLMError::NotConfigured);
        }

        let request = self.build_request(messages);
        tracing::debug!(
            "Sending chat completion: model={}, messages={}, max_tokens={}",
            request.model,
            request.messages.len(),
            request.max_tokens
        );

        let started = Instant::now();
        let response = self
            .http_client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        // Error bodies are parsed too so upstream messages reach the caller
        let body: Value = response.json().await.map_err(|e| {
            if e.is_timeout() {
                LLMError::from(e)
            } else if status.is_success() {
                LLMError::ParseError(e.to_string())
            } else {
                LLMError::ApiError(format!("HTTP {}: {}", status, e))
            }
        })?;

        let reply = extract_reply(&body).map_err(|e| match e {
            LLMError::ParseError(_) if !status.is_success() => {
                LLMError::ApiError(format!("HTTP {}", status))
            },
            other => other,
        })?;

        tracing::info!(
            "Chat completion finished in {}ms ({} chars)",
            started.elapsed().as_millis(),
            reply.chars().count()
        );
        Ok(reply)
    }

    fn is_available(&self) -> bool {
        !self.api_key.is_empty() && !self.model.is_empty()
    }
}

/// Read `choices[0].message.content` from a chat-completion body
pub(crate) fn extract_reply(body: &Value) -> Result<String, LLMError> {
    if let Some(content) = body
        .pointer("/choices/0/message/content")
        .and_then(Value::as_str)
    {
        return Ok(content.to_string());
    }

    match body.get("error") {
        Some(Value::String(message)) => Err(LLMError::ApiError(message.clone())),
        Some(err) => {
            let message = err
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| err.to_string());
            Err(LLMError::ApiError(message))
        },
        None => Err(LLMError::ParseError("missing choices[0].message.content".to_string())),
    }
}
