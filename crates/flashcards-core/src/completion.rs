//! Chat-completion client that turns one text chunk into raw flashcard text.
//!
//! The request is an OpenAI-compatible `chat/completions` call with a fixed
//! system instruction. Failures come back as a typed [`CompletionError`]; its
//! `Display` form keeps the `[Error <status>]` / `[API Error]` wording users of
//! the web page see.

use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Config;

/// System instruction sent ahead of every chunk.
pub const SYSTEM_PROMPT: &str = "You are a flashcard generator. Output Q&A flashcards only.";

/// Prefix of the user message; the chunk text follows it directly.
pub const USER_PROMPT_PREFIX: &str = "Generate flashcards from this text:\n";

/// Error type for completion calls.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompletionError {
    /// The endpoint answered with a non-success status.
    #[error("[Error {status}]: {body}")]
    Status { status: u16, body: String },
    /// The request never produced a response (timeout, connection refused, ...).
    #[error("[API Error]: {0}")]
    Transport(String),
    /// A success response whose payload had no usable completion text.
    #[error("[API Error]: {0}")]
    Decode(String),
}

/// Something that can turn a chunk of document text into a raw completion.
///
/// [`CompletionClient`] is the production implementation; the seam exists so
/// the pipeline can be driven without network access.
pub trait Completer: Send + Sync {
    fn complete(
        &self,
        chunk: &str,
    ) -> impl Future<Output = Result<String, CompletionError>> + Send;
}

#[derive(Debug, Serialize)]
pub(crate) struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage; 2],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: String,
}

pub(crate) fn build_request<'a>(chunk: &str, config: &'a Config) -> ChatRequest<'a> {
    ChatRequest {
        model: &config.model,
        messages: [
            ChatMessage {
                role: "system",
                content: SYSTEM_PROMPT.to_string(),
            },
            ChatMessage {
                role: "user",
                content: format!("{USER_PROMPT_PREFIX}{chunk}"),
            },
        ],
        temperature: config.temperature,
        max_tokens: config.max_tokens,
    }
}

/// HTTP client for the chat-completion endpoint.
///
/// Cheap to clone; the underlying `reqwest::Client` shares its connection pool.
#[derive(Debug, Clone)]
pub struct CompletionClient {
    client: reqwest::Client,
    config: Config,
}

impl CompletionClient {
    /// Build a client whose every request is bounded by
    /// `config.request_timeout_secs`.
    pub fn new(config: Config) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }
}

impl Completer for CompletionClient {
    async fn complete(&self, chunk: &str) -> Result<String, CompletionError> {
        let body = build_request(chunk, &self.config);
        let mut request = self.client.post(&self.config.api_url).json(&body);
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key);
        }

        log::debug!(
            "completion request: model={}, {} chars",
            self.config.model,
            chunk.len()
        );

        let response = request
            .send()
            .await
            .map_err(|e| CompletionError::Transport(e.to_string()))?;
        read_completion(response).await
    }
}

/// Interpret a completion response.
///
/// Success statuses yield `choices[0].message.content`; anything else becomes
/// [`CompletionError::Status`] carrying the raw body.
pub async fn read_completion(response: reqwest::Response) -> Result<String, CompletionError> {
    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .map_err(|e| CompletionError::Transport(e.to_string()))?;
        log::warn!("completion endpoint returned {}", status.as_u16());
        return Err(CompletionError::Status {
            status: status.as_u16(),
            body,
        });
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| CompletionError::Transport(e.to_string()))?;
    let parsed: ChatResponse =
        serde_json::from_slice(&bytes).map_err(|e| CompletionError::Decode(e.to_string()))?;

    parsed
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message.content)
        .ok_or_else(|| CompletionError::Decode("response contained no choices".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16, body: &'static str) -> reqwest::Response {
        http::Response::builder()
            .status(status)
            .header("content-type", "application/json")
            .body(body)
            .unwrap()
            .into()
    }

    #[test]
    fn request_body_shape() {
        let config = Config::default();
        let body = serde_json::to_value(build_request("Cells divide.", &config)).unwrap();

        assert_eq!(body["model"], "llama-3.3-70b-versatile");
        assert_eq!(body["max_tokens"], 500);
        assert!((body["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);

        let messages = body["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0]["role"], "system");
        assert_eq!(messages[0]["content"], SYSTEM_PROMPT);
        assert_eq!(messages[1]["role"], "user");
        assert_eq!(
            messages[1]["content"],
            "Generate flashcards from this text:\nCells divide."
        );
    }

    #[test]
    fn error_display_keeps_markers() {
        let status = CompletionError::Status {
            status: 500,
            body: "upstream exploded".into(),
        };
        assert_eq!(status.to_string(), "[Error 500]: upstream exploded");
        assert!(
            CompletionError::Transport("timed out".into())
                .to_string()
                .starts_with("[API Error]:")
        );
    }

    #[tokio::test]
    async fn reads_first_choice() {
        let resp = response(
            200,
            r#"{"choices":[{"message":{"role":"assistant","content":"Q: a A: b"}},{"message":{"role":"assistant","content":"ignored"}}]}"#,
        );
        assert_eq!(read_completion(resp).await.unwrap(), "Q: a A: b");
    }

    #[tokio::test]
    async fn non_success_carries_status_and_body() {
        let resp = response(401, r#"{"error":{"message":"Invalid API Key"}}"#);
        let err = read_completion(resp).await.unwrap_err();
        assert_eq!(
            err,
            CompletionError::Status {
                status: 401,
                body: r#"{"error":{"message":"Invalid API Key"}}"#.into(),
            }
        );
        assert!(err.to_string().starts_with("[Error 401]"));
    }

    #[tokio::test]
    async fn empty_choices_is_decode_error() {
        let err = read_completion(response(200, r#"{"choices":[]}"#))
            .await
            .unwrap_err();
        assert!(matches!(err, CompletionError::Decode(_)), "got: {err:?}");
    }

    #[tokio::test]
    async fn malformed_json_is_decode_error() {
        let err = read_completion(response(200, "not json"))
            .await
            .unwrap_err();
        assert!(matches!(err, CompletionError::Decode(_)), "got: {err:?}");
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_transport_error() {
        let config = Config {
            api_url: "http://127.0.0.1:1/v1/chat/completions".into(),
            request_timeout_secs: 2,
            ..Config::default()
        };
        let client = CompletionClient::new(config).unwrap();
        let err = client.complete("anything").await.unwrap_err();
        assert!(matches!(err, CompletionError::Transport(_)), "got: {err:?}");
        assert!(err.to_string().starts_with("[API Error]:"));
    }
}
