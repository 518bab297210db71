//! Extraction entry points: the [`Extractor`] and its two operations.
//!
//! The extractor is constructed once at process start and shared behind an
//! `Arc` by every request handler — explicit dependency injection instead of
//! a lazily-initialized process global, so tests can build one per case with
//! a scripted backend and nothing hides in static state.
//!
//! Both operations follow the same shape: render a prompt, await one
//! completion call, normalize the answer into a typed record. Failures
//! propagate as [`ExtractError`]; the HTTP layer decides which of them
//! degrade into the canonical default record.

use crate::config::ExtractorConfig;
use crate::error::ExtractError;
use crate::pipeline::completion::{ChatRequest, CompletionApi, Message, OpenAiCompat};
use crate::pipeline::{normalize, preprocess};
use crate::prompts::{parse_text_message, ID_CARD_SYSTEM_PROMPT, PERSONAL_INFO_SYSTEM_PROMPT};
use crate::schema::{IdCardInfo, PersonalInfo};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Personal-information extractor over remote chat/vision completion models.
pub struct Extractor {
    config: ExtractorConfig,
    chat: Arc<dyn CompletionApi>,
    vision: Option<Arc<dyn CompletionApi>>,
}

impl std::fmt::Debug for Extractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Extractor").finish_non_exhaustive()
    }
}

impl Extractor {
    /// Build an extractor from the configuration.
    ///
    /// The text backend is mandatory: without a chat credential (or an
    /// injected backend) no operation can succeed. The vision backend is
    /// optional — `parse_id_card` reports the gap per call instead.
    pub fn new(config: ExtractorConfig) -> Result<Self, ExtractError> {
        let chat: Arc<dyn CompletionApi> = match &config.chat_backend {
            Some(backend) => Arc::clone(backend),
            None => {
                let key = config
                    .chat_api_key
                    .as_deref()
                    .ok_or(ExtractError::ChatNotConfigured)?;
                Arc::new(OpenAiCompat::new(
                    key,
                    config.chat_base_url.as_str(),
                    config.api_timeout_secs,
                )?)
            }
        };

        let vision: Option<Arc<dyn CompletionApi>> = match &config.vision_backend {
            Some(backend) => Some(Arc::clone(backend)),
            None => match config.vision_api_key.as_deref() {
                Some(key) => Some(Arc::new(OpenAiCompat::new(
                    key,
                    config.vision_base_url.as_str(),
                    config.api_timeout_secs,
                )?)),
                None => None,
            },
        };

        Ok(Self {
            config,
            chat,
            vision,
        })
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Extract [`PersonalInfo`] from unstructured text.
    pub async fn parse_text(&self, input: &str) -> Result<PersonalInfo, ExtractError> {
        let start = Instant::now();
        let request = ChatRequest {
            model: self.config.chat_model.clone(),
            messages: vec![
                Message::system(PERSONAL_INFO_SYSTEM_PROMPT),
                Message::user(parse_text_message(input)),
            ],
            temperature: self.config.temperature,
            max_tokens: self.config.chat_max_tokens,
        };

        let raw = self.chat.chat(&request).await?;
        let record: PersonalInfo = normalize::normalize(&raw)?.into_record()?;
        info!(
            confidence = record.confidence,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "text extraction complete"
        );
        Ok(record)
    }

    /// Extract [`IdCardInfo`] from an uploaded ID-document image.
    ///
    /// The image is bounded and re-encoded before transmission (see
    /// [`crate::pipeline::preprocess`]); the instruction and the image travel
    /// in a single multimodal user message.
    pub async fn parse_id_card(
        &self,
        image_bytes: Vec<u8>,
        filename: &str,
    ) -> Result<IdCardInfo, ExtractError> {
        let vision = self
            .vision
            .as_ref()
            .ok_or(ExtractError::VisionNotConfigured)?;

        let start = Instant::now();
        debug!(filename, bytes = image_bytes.len(), "preprocessing upload");

        let max_dim = self.config.max_image_dim;
        let quality = self.config.jpeg_quality;
        // Image codecs are CPU-bound; keep them off the request task.
        let data_url = tokio::task::spawn_blocking(move || {
            preprocess::encode_id_image(&image_bytes, max_dim, quality)
        })
        .await
        .map_err(|e| ExtractError::ImageEncode {
            detail: format!("preprocessing task failed: {e}"),
        })??;

        let request = ChatRequest {
            model: self.config.vision_model.clone(),
            messages: vec![Message::user_with_image(ID_CARD_SYSTEM_PROMPT, data_url)],
            temperature: self.config.temperature,
            max_tokens: self.config.vision_max_tokens,
        };

        let raw = vision.chat(&request).await?;
        let record: IdCardInfo = normalize::normalize(&raw)?.into_record()?;
        info!(
            filename,
            confidence = record.confidence,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "id-card extraction complete"
        );
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::completion::MessageContent;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Backend that returns a fixed reply and records the request it saw.
    struct Scripted {
        reply: Result<String, u16>,
        seen: Mutex<Option<ChatRequest>>,
    }

    impl Scripted {
        fn replying(reply: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(reply.to_string()),
                seen: Mutex::new(None),
            })
        }

        fn failing(status: u16) -> Arc<Self> {
            Arc::new(Self {
                reply: Err(status),
                seen: Mutex::new(None),
            })
        }
    }

    #[async_trait]
    impl CompletionApi for Scripted {
        async fn chat(&self, request: &ChatRequest) -> Result<String, ExtractError> {
            *self.seen.lock().unwrap() = Some(request.clone());
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(status) => Err(ExtractError::UpstreamStatus {
                    status: *status,
                    detail: "scripted failure".into(),
                }),
            }
        }
    }

    fn extractor_with(chat: Arc<Scripted>, vision: Option<Arc<Scripted>>) -> Extractor {
        let mut builder = ExtractorConfig::builder().chat_backend(chat);
        if let Some(v) = vision {
            builder = builder.vision_backend(v);
        }
        Extractor::new(builder.build().unwrap()).unwrap()
    }

    fn tiny_png() -> Vec<u8> {
        use image::{DynamicImage, Rgba, RgbaImage};
        use std::io::Cursor;
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(8, 8, Rgba([0, 0, 255, 255])));
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .unwrap();
        buf
    }

    #[tokio::test]
    async fn parse_text_builds_expected_request() {
        let backend = Scripted::replying(r#"{"name": "Ada Lovelace", "confidence": 0.9}"#);
        let extractor = extractor_with(Arc::clone(&backend), None);

        let record = extractor.parse_text("I'm Ada Lovelace").await.unwrap();
        assert_eq!(record.name.as_deref(), Some("Ada Lovelace"));
        assert_eq!(record.confidence, 0.9);

        let request = backend.seen.lock().unwrap().clone().unwrap();
        assert_eq!(request.model, "llama-3.1-8b-instant");
        assert_eq!(request.temperature, 0.1);
        assert_eq!(request.max_tokens, 300);
        assert_eq!(request.messages.len(), 2);
        match &request.messages[1].content {
            MessageContent::Text(text) => assert_eq!(text, "Parse this text: I'm Ada Lovelace"),
            other => panic!("expected text content, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn parse_text_propagates_upstream_failure() {
        let extractor = extractor_with(Scripted::failing(503), None);
        let err = extractor.parse_text("anything").await.unwrap_err();
        assert!(matches!(err, ExtractError::UpstreamStatus { status: 503, .. }));
        assert!(err.is_degradable());
    }

    #[tokio::test]
    async fn parse_id_card_without_vision_backend_is_config_error() {
        let extractor = extractor_with(Scripted::replying("{}"), None);
        let err = extractor.parse_id_card(tiny_png(), "card.png").await.unwrap_err();
        assert!(matches!(err, ExtractError::VisionNotConfigured));
        assert!(!err.is_degradable());
    }

    #[tokio::test]
    async fn parse_id_card_sends_multimodal_message() {
        let vision = Scripted::replying(r#"{"full_name": "JANE SAMPLE", "confidence": 0.85}"#);
        let extractor = extractor_with(Scripted::replying("{}"), Some(Arc::clone(&vision)));

        let record = extractor.parse_id_card(tiny_png(), "card.png").await.unwrap();
        assert_eq!(record.full_name.as_deref(), Some("JANE SAMPLE"));

        let request = vision.seen.lock().unwrap().clone().unwrap();
        assert_eq!(request.model, "gpt-4o");
        assert_eq!(request.max_tokens, 500);
        assert_eq!(request.messages.len(), 1);
        match &request.messages[0].content {
            MessageContent::Parts(parts) => {
                let json = serde_json::to_value(parts).unwrap();
                assert!(json[1]["image_url"]["url"]
                    .as_str()
                    .unwrap()
                    .starts_with("data:image/jpeg;base64,"));
            }
            other => panic!("expected multimodal parts, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn parse_id_card_rejects_undecodable_upload() {
        let vision = Scripted::replying("{}");
        let extractor = extractor_with(Scripted::replying("{}"), Some(vision));
        let err = extractor
            .parse_id_card(b"not an image".to_vec(), "note.txt")
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractError::ImageDecode { .. }));
    }

    #[test]
    fn new_without_chat_credential_fails() {
        let config = ExtractorConfig::builder().build().unwrap();
        let err = Extractor::new(config).unwrap_err();
        assert!(matches!(err, ExtractError::ChatNotConfigured));
    }
}
