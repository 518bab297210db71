//! Configuration for the extraction service.
//!
//! All behaviour is controlled through [`ExtractorConfig`], built via its
//! [`ExtractorConfigBuilder`] or loaded from the environment with
//! [`ExtractorConfig::from_env`]. Keeping every knob in one struct makes it
//! trivial to share the config across handlers and to diff two deployments
//! when their extractions differ.
//!
//! # Design choice: builder over constructor
//! The struct already has a dozen fields and grows with every upstream quirk
//! we have to work around. The builder lets callers set only what they care
//! about and rely on documented defaults for the rest.

use crate::error::ExtractError;
use crate::pipeline::completion::CompletionApi;
use std::fmt;
use std::sync::Arc;

/// Configuration for an [`crate::extract::Extractor`].
///
/// # Example
/// ```rust
/// use parsonnel::ExtractorConfig;
///
/// let config = ExtractorConfig::builder()
///     .chat_api_key("gsk-…")
///     .chat_model("llama-3.1-8b-instant")
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct ExtractorConfig {
    /// Credential for the text-completion endpoint. Required for `parse_text`.
    pub chat_api_key: Option<String>,

    /// Base URL of the OpenAI-compatible text endpoint.
    /// Default: `https://api.groq.com/openai/v1`.
    pub chat_base_url: String,

    /// Text model identifier. Default: `llama-3.1-8b-instant`.
    pub chat_model: String,

    /// Credential for the vision endpoint. Without it `parse_id_card`
    /// fails with [`ExtractError::VisionNotConfigured`].
    pub vision_api_key: Option<String>,

    /// Base URL of the OpenAI-compatible vision endpoint.
    /// Default: `https://api.openai.com/v1`.
    pub vision_base_url: String,

    /// Vision model identifier. Default: `gpt-4o`.
    pub vision_model: String,

    /// Sampling temperature. Default: 0.1.
    ///
    /// Low temperature keeps the model deterministic and faithful to the
    /// input — exactly what you want for extraction. Higher values introduce
    /// creativity that shows up as invented field values.
    pub temperature: f32,

    /// Output-token budget for the text path. Default: 300.
    ///
    /// The answer is a small fixed-shape JSON object; 300 tokens covers it
    /// with room for long addresses while keeping a runaway completion cheap.
    pub chat_max_tokens: u32,

    /// Output-token budget for the vision path. Default: 500.
    ///
    /// ID documents carry more fields than the text schema, and vision models
    /// are more verbose, so the budget is roomier than the text one.
    pub vision_max_tokens: u32,

    /// Maximum image dimension (width or height) sent upstream, in pixels.
    /// Default: 1024.
    ///
    /// Vision APIs tile images at ~512 px; beyond roughly 1024 px extra
    /// resolution costs upload time and tokens without improving extraction.
    pub max_image_dim: u32,

    /// JPEG quality for the re-encoded upload. Default: 85. Range 1–100.
    pub jpeg_quality: u8,

    /// Upload size limit enforced before any remote call, in bytes.
    /// Default: 10 MiB.
    pub max_upload_bytes: usize,

    /// Per-completion-call timeout in seconds. Default: 60.
    pub api_timeout_secs: u64,

    /// Pre-constructed text backend. Takes precedence over the key/URL pair;
    /// used by tests to inject a scripted completion service.
    pub chat_backend: Option<Arc<dyn CompletionApi>>,

    /// Pre-constructed vision backend, same precedence rule as `chat_backend`.
    pub vision_backend: Option<Arc<dyn CompletionApi>>,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            chat_api_key: None,
            chat_base_url: "https://api.groq.com/openai/v1".to_string(),
            chat_model: "llama-3.1-8b-instant".to_string(),
            vision_api_key: None,
            vision_base_url: "https://api.openai.com/v1".to_string(),
            vision_model: "gpt-4o".to_string(),
            temperature: 0.1,
            chat_max_tokens: 300,
            vision_max_tokens: 500,
            max_image_dim: 1024,
            jpeg_quality: 85,
            max_upload_bytes: 10 * 1024 * 1024,
            api_timeout_secs: 60,
            chat_backend: None,
            vision_backend: None,
        }
    }
}

impl fmt::Debug for ExtractorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Credentials are redacted; presence is still visible for diagnostics.
        f.debug_struct("ExtractorConfig")
            .field("chat_api_key", &self.chat_api_key.as_ref().map(|_| "<redacted>"))
            .field("chat_base_url", &self.chat_base_url)
            .field("chat_model", &self.chat_model)
            .field("vision_api_key", &self.vision_api_key.as_ref().map(|_| "<redacted>"))
            .field("vision_base_url", &self.vision_base_url)
            .field("vision_model", &self.vision_model)
            .field("temperature", &self.temperature)
            .field("chat_max_tokens", &self.chat_max_tokens)
            .field("vision_max_tokens", &self.vision_max_tokens)
            .field("max_image_dim", &self.max_image_dim)
            .field("jpeg_quality", &self.jpeg_quality)
            .field("max_upload_bytes", &self.max_upload_bytes)
            .field("api_timeout_secs", &self.api_timeout_secs)
            .field("chat_backend", &self.chat_backend.as_ref().map(|_| "<dyn CompletionApi>"))
            .field("vision_backend", &self.vision_backend.as_ref().map(|_| "<dyn CompletionApi>"))
            .finish()
    }
}

impl ExtractorConfig {
    /// Create a new builder for `ExtractorConfig`.
    pub fn builder() -> ExtractorConfigBuilder {
        ExtractorConfigBuilder {
            config: Self::default(),
        }
    }

    /// Load the configuration from environment variables.
    ///
    /// | Variable | Meaning | Default |
    /// |----------|---------|---------|
    /// | `GROQ_API_KEY` | text-completion credential | — |
    /// | `OPENAI_API_KEY` | vision credential | — |
    /// | `GROQ_BASE_URL` | text endpoint override | Groq |
    /// | `OPENAI_BASE_URL` | vision endpoint override | OpenAI |
    /// | `PARSER_MODEL` | text model | `llama-3.1-8b-instant` |
    /// | `PARSER_VISION_MODEL` | vision model | `gpt-4o` |
    pub fn from_env() -> Result<Self, ExtractError> {
        let mut builder = Self::builder();
        if let Ok(key) = std::env::var("GROQ_API_KEY") {
            if !key.is_empty() {
                builder = builder.chat_api_key(key);
            }
        }
        if let Ok(key) = std::env::var("OPENAI_API_KEY") {
            if !key.is_empty() {
                builder = builder.vision_api_key(key);
            }
        }
        if let Ok(url) = std::env::var("GROQ_BASE_URL") {
            builder = builder.chat_base_url(url);
        }
        if let Ok(url) = std::env::var("OPENAI_BASE_URL") {
            builder = builder.vision_base_url(url);
        }
        if let Ok(model) = std::env::var("PARSER_MODEL") {
            builder = builder.chat_model(model);
        }
        if let Ok(model) = std::env::var("PARSER_VISION_MODEL") {
            builder = builder.vision_model(model);
        }
        builder.build()
    }
}

/// Builder for [`ExtractorConfig`].
#[derive(Debug)]
pub struct ExtractorConfigBuilder {
    config: ExtractorConfig,
}

impl ExtractorConfigBuilder {
    pub fn chat_api_key(mut self, key: impl Into<String>) -> Self {
        self.config.chat_api_key = Some(key.into());
        self
    }

    pub fn chat_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.chat_base_url = url.into();
        self
    }

    pub fn chat_model(mut self, model: impl Into<String>) -> Self {
        self.config.chat_model = model.into();
        self
    }

    pub fn vision_api_key(mut self, key: impl Into<String>) -> Self {
        self.config.vision_api_key = Some(key.into());
        self
    }

    pub fn vision_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.vision_base_url = url.into();
        self
    }

    pub fn vision_model(mut self, model: impl Into<String>) -> Self {
        self.config.vision_model = model.into();
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn chat_max_tokens(mut self, n: u32) -> Self {
        self.config.chat_max_tokens = n;
        self
    }

    pub fn vision_max_tokens(mut self, n: u32) -> Self {
        self.config.vision_max_tokens = n;
        self
    }

    pub fn max_image_dim(mut self, px: u32) -> Self {
        self.config.max_image_dim = px.max(64);
        self
    }

    pub fn jpeg_quality(mut self, q: u8) -> Self {
        self.config.jpeg_quality = q;
        self
    }

    pub fn max_upload_bytes(mut self, n: usize) -> Self {
        self.config.max_upload_bytes = n;
        self
    }

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = secs;
        self
    }

    pub fn chat_backend(mut self, backend: Arc<dyn CompletionApi>) -> Self {
        self.config.chat_backend = Some(backend);
        self
    }

    pub fn vision_backend(mut self, backend: Arc<dyn CompletionApi>) -> Self {
        self.config.vision_backend = Some(backend);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ExtractorConfig, ExtractError> {
        let c = &self.config;
        if c.jpeg_quality == 0 || c.jpeg_quality > 100 {
            return Err(ExtractError::InvalidConfig(format!(
                "JPEG quality must be 1–100, got {}",
                c.jpeg_quality
            )));
        }
        if c.max_upload_bytes == 0 {
            return Err(ExtractError::InvalidConfig(
                "Upload size limit must be non-zero".into(),
            ));
        }
        if c.chat_base_url.is_empty() || c.vision_base_url.is_empty() {
            return Err(ExtractError::InvalidConfig(
                "Completion base URLs must be non-empty".into(),
            ));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let c = ExtractorConfig::default();
        assert_eq!(c.chat_base_url, "https://api.groq.com/openai/v1");
        assert_eq!(c.chat_model, "llama-3.1-8b-instant");
        assert_eq!(c.vision_model, "gpt-4o");
        assert_eq!(c.max_image_dim, 1024);
        assert_eq!(c.jpeg_quality, 85);
        assert_eq!(c.max_upload_bytes, 10 * 1024 * 1024);
    }

    #[test]
    fn builder_rejects_bad_quality() {
        let err = ExtractorConfig::builder().jpeg_quality(0).build();
        assert!(matches!(err, Err(ExtractError::InvalidConfig(_))));
        let err = ExtractorConfig::builder().jpeg_quality(101).build();
        assert!(matches!(err, Err(ExtractError::InvalidConfig(_))));
    }

    #[test]
    fn debug_redacts_credentials() {
        let c = ExtractorConfig::builder()
            .chat_api_key("super-secret")
            .build()
            .unwrap();
        let rendered = format!("{c:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
