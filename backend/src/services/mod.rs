pub mod assistant_service;
pub mod llm;
pub mod speech;
pub mod translate;

pub use assistant_service::AssistantService;
pub use llm::{ChatCompletion, LLMClient};
pub use speech::{GoogleSpeech, SpeechSynthesizer};
pub use translate::{GoogleTranslator, Translator};
