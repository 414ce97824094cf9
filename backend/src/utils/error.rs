use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rust_i18n::t;
use serde::Serialize;
use thiserror::Error;

use super::i18n::get_locale;
use crate::services::llm::LLMError;
use crate::services::speech::SpeechError;

/// API Error surfaced by the HTTP layer
///
/// Translation failures never become an `ApiError`: the analyze flow
/// falls back to the untranslated text instead.
#[derive(Error, Debug)]
pub enum ApiError {
    // Validation errors 4xxx
    #[error("Validation error: {0}")]
    ValidationError(String),

    // Upstream chat-completion errors 51xx
    #[error("Chat completion failed: {0}")]
    ChatCompletion(#[from] LLMError),

    // Upstream speech-synthesis errors 52xx
    #[error("Speech synthesis failed: {0}")]
    SpeechSynthesis(#[from] SpeechError),
}

impl ApiError {
    /// Helper to create validation error
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::ValidationError(message.into())
    }

    pub fn error_code(&self) -> i32 {
        match self {
            Self::ValidationError(_) => 4001,
            Self::ChatCompletion(_) => 5101,
            Self::SpeechSynthesis(_) => 5201,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::ValidationError(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::ChatCompletion(LLMError::NotConfigured) => StatusCode::SERVICE_UNAVAILABLE,
            Self::ChatCompletion(LLMError::Timeout(_)) => StatusCode::GATEWAY_TIMEOUT,
            Self::ChatCompletion(_) | Self::SpeechSynthesis(_) => StatusCode::BAD_GATEWAY,
        }
    }

    /// Get localized error message based on current locale
    pub fn localized_message(&self) -> String {
        let locale = get_locale();
        match self {
            Self::ValidationError(details) => {
                t!("validation.failed", locale = &locale, details = details).to_string()
            },
            Self::ChatCompletion(LLMError::NotConfigured) => {
                t!("chat.not_configured", locale = &locale).to_string()
            },
            Self::ChatCompletion(LLMError::Timeout(_)) => {
                t!("chat.timeout", locale = &locale).to_string()
            },
            Self::ChatCompletion(err) => {
                t!("chat.failed", locale = &locale, message = err.to_string()).to_string()
            },
            Self::SpeechSynthesis(err) => {
                t!("speech.failed", locale = &locale, message = err.to_string()).to_string()
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApiErrorResponse {
    pub code: i32,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        } else {
            tracing::debug!("Request rejected: {}", self);
        }

        let response = ApiErrorResponse { code: self.error_code(), message: self.localized_message() };

        (status, Json(response)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
