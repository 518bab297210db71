//! Pipeline stages for personal-information extraction.
//!
//! Each submodule implements exactly one transformation step. Keeping stages
//! separate makes each independently testable and lets us swap an
//! implementation (e.g. a different completion provider) without touching
//! the other stages.
//!
//! ## Data Flow
//!
//! ```text
//! text ─────────────────────▶ completion ──▶ normalize ──▶ record
//! image ──▶ preprocess ──┘      (LLM)        (JSON repair)
//!          (resize/JPEG)
//! ```
//!
//! 1. [`preprocess`] — bound and re-encode uploaded images; runs in
//!    `spawn_blocking` because image codecs are CPU-bound
//! 2. [`completion`] — the only stage with network I/O; OpenAI-compatible
//!    chat/vision requests behind the [`completion::CompletionApi`] trait
//! 3. [`normalize`] — deterministic repair of model quirks (code fences,
//!    broken confidence values) and the dynamic-JSON → typed-record boundary

pub mod completion;
pub mod normalize;
pub mod preprocess;
