use std::sync::Arc;

use crate::config::Config;
use crate::models::{AnalyzeRequest, AnalyzeResponse, Language};
use crate::services::llm::{ChatCompletion, LLMClient, build_messages};
use crate::services::speech::{GoogleSpeech, SpeechSynthesizer, encode_audio};
use crate::services::translate::{GoogleTranslator, Translator, translate_or_original};
use crate::utils::ApiResult;

/// Runs one analyze request: translate, prompt, complete, speak.
#[derive(Clone)]
pub struct AssistantService {
    chat: Arc<dyn ChatCompletion>,
    translator: Arc<dyn Translator>,
    speech: Arc<dyn SpeechSynthesizer>,
    english_audio: bool,
}

impl AssistantService {
    pub fn new(
        chat: Arc<dyn ChatCompletion>,
        translator: Arc<dyn Translator>,
        speech: Arc<dyn SpeechSynthesizer>,
        english_audio: bool,
    ) -> Self {
        Self { chat, translator, speech, english_audio }
    }

    /// Wire the HTTP-backed providers from configuration
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let chat = LLMClient::new(&config.llm)?;
        let translator = GoogleTranslator::new(&config.translate)?;
        let speech = GoogleSpeech::new(&config.speech)?;

        Ok(Self::new(
            Arc::new(chat),
            Arc::new(translator),
            Arc::new(speech),
            config.speech.english_audio,
        ))
    }

    pub fn is_chat_available(&self) -> bool {
        self.chat.is_available()
    }

    /// Malayalam replies always carry audio; English ones only when enabled
    pub fn requires_audio(&self, language: Language) -> bool {
        match language {
            Language::Malayalam => true,
            Language::English => self.english_audio,
        }
    }

    pub async fn analyze(&self, request: &AnalyzeRequest) -> ApiResult<AnalyzeResponse> {
        let language = request.language();

        let user_text = if language.requires_translation() {
            translate_or_original(self.translator.as_ref(), &request.text, language.code()).await
        } else {
            request.text.clone()
        };

        let messages = build_messages(&request.category, language, &user_text);
        let reply = self.chat.complete(messages).await?;

        if !self.requires_audio(language) {
            return Ok(AnalyzeResponse::text(reply));
        }

        let audio = self.speech.synthesize(&reply, language.code()).await?;
        tracing::debug!("Attaching {} bytes of {} audio", audio.len(), language);

        Ok(AnalyzeResponse::with_audio(reply, encode_audio(&audio)))
    }
}
