//! Error types for the parsonnel library.
//!
//! Two failure classes flow through one enum, distinguished by
//! [`ExtractError::is_degradable`]:
//!
//! * **Configuration errors** — a credential or setting is missing, so the
//!   request could never have succeeded. These propagate to the HTTP layer
//!   and become a 500 with the message attached.
//!
//! * **Degradable errors** — the upstream model was unreachable, answered
//!   with a non-2xx status, or produced output that is not valid JSON. The
//!   API layer converts these into the canonical default record (all fields
//!   `None`, confidence 0.0) with the failure message in the response's
//!   `error` field, so a flaky model never takes the endpoint down.
//!
//! Keeping the classification on the error type (rather than collapsing
//! everything into one default shape inside the client) lets callers tell
//! "upstream said X" from "upstream was unreachable" from "output was
//! unparsable".

use thiserror::Error;

/// All errors produced by the extraction pipeline.
#[derive(Debug, Error)]
pub enum ExtractError {
    // ── Configuration errors ──────────────────────────────────────────────
    /// No API key for the text-completion endpoint.
    #[error("Chat completion credential is not configured.\nSet GROQ_API_KEY in the environment.")]
    ChatNotConfigured,

    /// No API key for the vision endpoint; ID-card parsing cannot run.
    #[error("Vision credential is not configured for ID-card parsing.\nSet OPENAI_API_KEY in the environment.")]
    VisionNotConfigured,

    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Upstream / transport errors ───────────────────────────────────────
    /// The completion request never produced an HTTP response
    /// (DNS failure, connection refused, client-side timeout).
    #[error("Completion service unreachable: {detail}")]
    Transport { detail: String },

    /// The completion service answered with a non-2xx status.
    #[error("Completion service returned HTTP {status}: {detail}")]
    UpstreamStatus { status: u16, detail: String },

    /// The response decoded, but carried no message content.
    #[error("Completion response contained no choices")]
    EmptyCompletion,

    // ── Malformed-output errors ───────────────────────────────────────────
    /// Model output was not a JSON object after fence stripping.
    #[error("Model output is not a JSON object: {snippet}")]
    UnparsableOutput { snippet: String },

    // ── Image errors ──────────────────────────────────────────────────────
    /// Uploaded bytes could not be decoded as an image.
    #[error("Image decoding failed: {detail}")]
    ImageDecode { detail: String },

    /// Re-encoding the downscaled image as JPEG failed.
    #[error("Image re-encoding failed: {detail}")]
    ImageEncode { detail: String },
}

impl ExtractError {
    /// Whether the API layer should degrade this failure into the canonical
    /// default record instead of surfacing a 500.
    ///
    /// Configuration faults are never degradable: they mean the operator has
    /// to fix the deployment, and hiding them behind an empty record would
    /// make every response look like a model miss.
    pub fn is_degradable(&self) -> bool {
        match self {
            ExtractError::ChatNotConfigured
            | ExtractError::VisionNotConfigured
            | ExtractError::InvalidConfig(_) => false,
            ExtractError::Transport { .. }
            | ExtractError::UpstreamStatus { .. }
            | ExtractError::EmptyCompletion
            | ExtractError::UnparsableOutput { .. }
            | ExtractError::ImageDecode { .. }
            | ExtractError::ImageEncode { .. } => true,
        }
    }
}

impl From<reqwest::Error> for ExtractError {
    fn from(e: reqwest::Error) -> Self {
        ExtractError::Transport {
            detail: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_status_display() {
        let e = ExtractError::UpstreamStatus {
            status: 429,
            detail: "rate limited".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("429"), "got: {msg}");
        assert!(msg.contains("rate limited"));
    }

    #[test]
    fn config_errors_are_not_degradable() {
        assert!(!ExtractError::ChatNotConfigured.is_degradable());
        assert!(!ExtractError::VisionNotConfigured.is_degradable());
        assert!(!ExtractError::InvalidConfig("bad".into()).is_degradable());
    }

    #[test]
    fn upstream_and_parse_errors_are_degradable() {
        assert!(ExtractError::Transport {
            detail: "dns".into()
        }
        .is_degradable());
        assert!(ExtractError::UnparsableOutput {
            snippet: "not json".into()
        }
        .is_degradable());
        assert!(ExtractError::ImageDecode {
            detail: "truncated".into()
        }
        .is_degradable());
    }
}
