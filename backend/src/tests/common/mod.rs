// Common test utilities: in-memory provider doubles and app wiring

use async_trait::async_trait;
use axum::Router;
use std::sync::{Arc, Mutex};

use crate::config::CorsConfig;
use crate::services::AssistantService;
use crate::services::llm::{ChatCompletion, ChatMessage, LLMError};
use crate::services::speech::{SpeechError, SpeechSynthesizer};
use crate::services::translate::{TranslateError, Translator};
use crate::{AppState, build_router};

pub const FAKE_MP3: &[u8] = &[0x49, 0x44, 0x33, 0x04, 0x00, 0xff, 0xfb, 0x90];

/// Chat double recording every conversation it receives
pub struct FakeChat {
    reply: Option<String>,
    available: bool,
    pub calls: Mutex<Vec<Vec<ChatMessage>>>,
}

impl FakeChat {
    pub fn replying(reply: &str) -> Arc<Self> {
        Arc::new(Self { reply: Some(reply.to_string()), available: true, calls: Mutex::new(vec![]) })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self { reply: None, available: true, calls: Mutex::new(vec![]) })
    }

    pub fn unconfigured() -> Arc<Self> {
        Arc::new(Self { reply: None, available: false, calls: Mutex::new(vec![]) })
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn last_messages(&self) -> Vec<ChatMessage> {
        self.calls.lock().unwrap().last().cloned().expect("chat was not called")
    }
}

#[async_trait]
impl ChatCompletion for FakeChat {
    async fn complete(&self, messages: Vec<ChatMessage>) -> Result<String, LLMError> {
        if !self.available {
            return Err(LLMError::NotConfigured);
        }
        self.calls.lock().unwrap().push(messages);
        self.reply
            .clone()
            .ok_or_else(|| LLMError::ApiError("Model is overloaded".to_string()))
    }

    fn is_available(&self) -> bool {
        self.available
    }
}

/// Translator double: prefixes the target code, or fails
pub struct FakeTranslator {
    fail: bool,
    pub calls: Mutex<Vec<(String, String)>>,
}

impl FakeTranslator {
    pub fn working() -> Arc<Self> {
        Arc::new(Self { fail: false, calls: Mutex::new(vec![]) })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self { fail: true, calls: Mutex::new(vec![]) })
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl Translator for FakeTranslator {
    async fn translate(&self, text: &str, target: &str) -> Result<String, TranslateError> {
        self.calls.lock().unwrap().push((text.to_string(), target.to_string()));
        if self.fail {
            return Err(TranslateError::Status(429));
        }
        Ok(format!("[{}] {}", target, text))
    }
}

/// Speech double returning a fixed MP3 header, or failing
pub struct FakeSpeech {
    fail: bool,
    pub calls: Mutex<Vec<(String, String)>>,
}

impl FakeSpeech {
    pub fn working() -> Arc<Self> {
        Arc::new(Self { fail: false, calls: Mutex::new(vec![]) })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self { fail: true, calls: Mutex::new(vec![]) })
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl SpeechSynthesizer for FakeSpeech {
    async fn synthesize(&self, text: &str, lang: &str) -> Result<Vec<u8>, SpeechError> {
        self.calls.lock().unwrap().push((text.to_string(), lang.to_string()));
        if self.fail {
            return Err(SpeechError::Status { status: 404, chunk: 0 });
        }
        Ok(FAKE_MP3.to_vec())
    }
}

pub struct TestProviders {
    pub chat: Arc<FakeChat>,
    pub translator: Arc<FakeTranslator>,
    pub speech: Arc<FakeSpeech>,
}

impl TestProviders {
    pub fn new(chat: Arc<FakeChat>, translator: Arc<FakeTranslator>, speech: Arc<FakeSpeech>) -> Self {
        Self { chat, translator, speech }
    }

    pub fn healthy(reply: &str) -> Self {
        Self::new(FakeChat::replying(reply), FakeTranslator::working(), FakeSpeech::working())
    }

    pub fn service(&self, english_audio: bool) -> AssistantService {
        AssistantService::new(
            self.chat.clone(),
            self.translator.clone(),
            self.speech.clone(),
            english_audio,
        )
    }

    pub fn app(&self, english_audio: bool) -> Router {
        self.app_with_cors(english_audio, &CorsConfig::default())
    }

    pub fn app_with_cors(&self, english_audio: bool, cors: &CorsConfig) -> Router {
        let state = Arc::new(AppState { assistant: self.service(english_audio) });
        build_router(state, cors)
    }
}
