//! Text-to-speech synthesis for assistant replies
//!
//! The web TTS endpoint only accepts short inputs, so replies are split into
//! sentence-aligned chunks, synthesized one by one, and the MP3 streams are
//! concatenated in order.

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

use crate::config::SpeechConfig;

// A run of non-terminators followed by its terminators (Latin and Devanagari danda).
// A dot between two digits ("3.50") does not end a sentence.
static SENTENCE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:\d\.\d|[^.!?।\n])+[.!?।]*").unwrap());

const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko)";

#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("No text to speak")]
    EmptyText,

    #[error("Speech request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Speech service returned HTTP {status} for chunk {chunk}")]
    Status { status: u16, chunk: usize },

    #[error("Speech service returned no audio for chunk {0}")]
    EmptyAudio(usize),
}

/// Produces MP3 audio for text in the given language
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(&self, text: &str, lang: &str) -> Result<Vec<u8>, SpeechError>;
}

/// Client for the Google Translate web TTS endpoint
pub struct GoogleSpeech {
    http_client: Client,
    endpoint: String,
    max_chunk_chars: usize,
}

impl GoogleSpeech {
    pub fn new(config: &SpeechConfig) -> Result<Self, SpeechError> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            http_client,
            endpoint: config.endpoint.clone(),
            max_chunk_chars: config.max_chunk_chars,
        })
    }
}

#[async_trait]
impl SpeechSynthesizer for GoogleSpeech {
    async fn synthesize(&self, text: &str, lang: &str) -> Result<Vec<u8>, SpeechError> {
        let chunks = split_for_speech(text, self.max_chunk_chars);
        if chunks.is_empty() {
            return Err(SpeechError::EmptyText);
        }

        let total = chunks.len().to_string();
        let mut audio = Vec::new();
        for (idx, chunk) in chunks.iter().enumerate() {
            let idx_param = idx.to_string();
            let textlen = chunk.chars().count().to_string();
            let response = self
                .http_client
                .get(&self.endpoint)
                .query(&[
                    ("ie", "UTF-8"),
                    ("client", "tw-ob"),
                    ("tl", lang),
                    ("q", chunk.as_str()),
                    ("total", total.as_str()),
                    ("idx", idx_param.as_str()),
                    ("textlen", textlen.as_str()),
                ])
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                return Err(SpeechError::Status { status: status.as_u16(), chunk: idx });
            }

            let bytes = response.bytes().await?;
            if bytes.is_empty() {
                return Err(SpeechError::EmptyAudio(idx));
            }
            audio.extend_from_slice(&bytes);
        }

        tracing::debug!(
            "Synthesized {} chunk(s) of '{}' speech, {} bytes",
            chunks.len(),
            lang,
            audio.len()
        );
        Ok(audio)
    }
}

/// Split `text` into speakable chunks of at most `max_chars` characters.
///
/// Sentences are kept whole when they fit, long sentences are packed word by
/// word, and single words longer than the limit are cut. Chunks without any
/// alphanumeric character are dropped.
pub fn split_for_speech(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut chunks = Vec::new();

    for sentence in SENTENCE_REGEX.find_iter(text) {
        let sentence = sentence.as_str().trim();

        if sentence.chars().count() <= max_chars {
            push_speakable(&mut chunks, sentence.to_string());
            continue;
        }

        let mut current = String::new();
        let mut current_len = 0;
        for word in sentence.split_whitespace() {
            for piece in split_long_word(word, max_chars) {
                let piece_len = piece.chars().count();
                if current_len > 0 && current_len + 1 + piece_len > max_chars {
                    push_speakable(&mut chunks, std::mem::take(&mut current));
                    current_len = 0;
                }
                if current_len > 0 {
                    current.push(' ');
                    current_len += 1;
                }
                current.push_str(&piece);
                current_len += piece_len;
            }
        }
        push_speakable(&mut chunks, current);
    }

    chunks
}

// Punctuation-only input makes the TTS endpoint fail
fn push_speakable(chunks: &mut Vec<String>, chunk: String) {
    if chunk.chars().any(char::is_alphanumeric) {
        chunks.push(chunk);
    }
}

fn split_long_word(word: &str, max_chars: usize) -> Vec<String> {
    let chars: Vec<char> = word.chars().collect();
    chars.chunks(max_chars).map(|c| c.iter().collect()).collect()
}

/// Standard (padded) base64 of an audio stream
pub fn encode_audio(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}
