//! Completion backend: OpenAI-compatible chat/vision requests over reqwest.
//!
//! The network edge of the crate sits behind the [`CompletionApi`] trait so
//! the rest of the pipeline never sees reqwest. Production uses
//! [`OpenAiCompat`]; tests inject a scripted implementation and exercise the
//! full request flow without a network.
//!
//! The wire shape is the OpenAI `chat/completions` dialect, which Groq also
//! speaks: `content` is either a plain string or an array of typed parts, the
//! image part carrying a base64 data-URL with `detail: "high"` so the model
//! reads fine print on ID documents instead of a single low-res overview tile.

use crate::error::ExtractError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// One chat-completion request, already fully rendered.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// A single message in the conversation.
#[derive(Debug, Clone, Serialize)]
pub struct Message {
    pub role: &'static str,
    pub content: MessageContent,
}

impl Message {
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: "system",
            content: MessageContent::Text(text.into()),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: "user",
            content: MessageContent::Text(text.into()),
        }
    }

    /// User message carrying an instruction plus one inline image.
    pub fn user_with_image(text: impl Into<String>, image_data_url: impl Into<String>) -> Self {
        Self {
            role: "user",
            content: MessageContent::Parts(vec![
                ContentPart::Text { text: text.into() },
                ContentPart::ImageUrl {
                    image_url: ImageUrl {
                        url: image_data_url.into(),
                        detail: "high",
                    },
                },
            ]),
        }
    }
}

/// `content` is a bare string for text-only turns and an array of typed
/// parts for multimodal turns; `untagged` picks the right wire shape.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Clone, Serialize)]
pub struct ImageUrl {
    pub url: String,
    pub detail: &'static str,
}

// ── Response wire types ──────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

// ── Trait ────────────────────────────────────────────────────────────────

/// A chat-completion service able to answer one request with raw text.
///
/// The single-method surface is deliberate: retries, prompt construction,
/// and output normalization all live elsewhere, so implementations only
/// have to move bytes.
#[async_trait]
pub trait CompletionApi: Send + Sync {
    /// Send the request and return the first choice's message content.
    async fn chat(&self, request: &ChatRequest) -> Result<String, ExtractError>;
}

// ── Production implementation ────────────────────────────────────────────

/// OpenAI-compatible HTTP backend (OpenAI, Groq, and lookalikes).
pub struct OpenAiCompat {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl OpenAiCompat {
    /// Build a backend for `{base_url}/chat/completions` with a per-call
    /// timeout. The timeout is the only defence against a hung upstream —
    /// nothing above this layer retries or cancels.
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        timeout_secs: u64,
    ) -> Result<Self, ExtractError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ExtractError::InvalidConfig(format!("HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }
}

#[async_trait]
impl CompletionApi for OpenAiCompat {
    async fn chat(&self, request: &ChatRequest) -> Result<String, ExtractError> {
        let url = format!("{}/chat/completions", self.base_url);
        debug!(model = %request.model, url = %url, "sending completion request");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "completion request rejected");
            return Err(ExtractError::UpstreamStatus {
                status: status.as_u16(),
                detail,
            });
        }

        let decoded: ChatCompletionResponse = response.json().await?;
        decoded
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|s| s.trim().to_string())
            .ok_or(ExtractError::EmptyCompletion)
    }
}
