use std::fmt;

use serde::{Deserialize, Serialize};

pub mod chunk;
pub mod completion;
pub mod parse;
pub mod pipeline;

// Re-export for convenience
pub use chunk::split_text;
pub use completion::{Completer, CompletionClient, CompletionError};
pub use flashcards_pdf::{PdfError, TextExtractor};
pub use parse::parse_flashcards;
pub use pipeline::{FlashcardError, Upload, generate_flashcards, process_upload};

/// Default chat-completion endpoint (OpenAI-compatible).
pub const DEFAULT_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";

/// Default model identifier sent with every completion request.
pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";

/// A single question/answer pair extracted from a completion reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashcard {
    pub question: String,
    pub answer: String,
}

impl Flashcard {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }
}

/// Configuration for flashcard generation.
///
/// Resolved once at startup and passed down explicitly; nothing in this crate
/// reads the environment.
#[derive(Clone)]
pub struct Config {
    pub api_url: String,
    /// Bearer credential. When `None` the request goes out unauthenticated and
    /// the upstream 401 surfaces as a [`CompletionError::Status`].
    pub api_key: Option<String>,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub request_timeout_secs: u64,
    pub max_words_per_chunk: usize,
    /// Only this many chunks are sent for completion; the rest are dropped.
    pub max_chunks: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.7,
            max_tokens: 500,
            request_timeout_secs: 15,
            max_words_per_chunk: 150,
            max_chunks: 3,
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_url", &self.api_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("max_words_per_chunk", &self.max_words_per_chunk)
            .field("max_chunks", &self.max_chunks)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_deployment() {
        let config = Config::default();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.temperature, 0.7);
        assert_eq!(config.max_tokens, 500);
        assert_eq!(config.request_timeout_secs, 15);
        assert_eq!(config.max_words_per_chunk, 150);
        assert_eq!(config.max_chunks, 3);
        assert!(config.api_key.is_none());
    }

    #[test]
    fn debug_redacts_api_key() {
        let config = Config {
            api_key: Some("gsk_secret".into()),
            ..Config::default()
        };
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("gsk_secret"), "got: {rendered}");
        assert!(rendered.contains("<redacted>"));
    }
}
