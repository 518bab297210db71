//! # parsonnel
//!
//! Extract structured personal information from free text and ID-document
//! images using remote LLM chat/vision completion models.
//!
//! ## Why this crate?
//!
//! Regex- and rule-based PII parsers break on the messy ways people actually
//! write addresses and phone numbers, and they cannot read a driver's licence
//! photo at all. This crate delegates the extraction itself to a completion
//! model and keeps the part that has to be dependable in-process: prompt
//! construction, image preprocessing, and strict normalization of whatever
//! the model answers into a fixed schema with a validated confidence score.
//!
//! ## Pipeline Overview
//!
//! ```text
//! text ───────────────────────────┐
//!                                 ├─ completion  chat/vision API call
//! image ──▶ preprocess ───────────┘      │       (Groq / OpenAI compatible)
//!           (≤1024px, RGB, JPEG85)       ▼
//!                                   normalize    fence strip, JSON parse,
//!                                        │       confidence repair
//!                                        ▼
//!                            PersonalInfo / IdCardInfo
//! ```
//!
//! Failures past the completion boundary degrade rather than propagate: the
//! HTTP layer answers with the canonical default record (all fields null,
//! confidence 0.0) and an error marker, so one flaky model response never
//! becomes a 500.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use parsonnel::{Extractor, ExtractorConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Credentials from GROQ_API_KEY / OPENAI_API_KEY
//!     let extractor = Extractor::new(ExtractorConfig::from_env()?)?;
//!     let record = extractor
//!         .parse_text("my name is Lewis Hamilton, I live in 2944 Monaco dr…")
//!         .await?;
//!     println!("{:?} (confidence {})", record.name, record.confidence);
//!     Ok(())
//! }
//! ```
//!
//! To run the HTTP service, use the `parsonnel-server` binary (enabled by the
//! default `server` feature), or embed [`api::build_router`] in your own axum
//! application.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod api;
pub mod config;
pub mod error;
pub mod extract;
pub mod pipeline;
pub mod prompts;
pub mod schema;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ExtractorConfig, ExtractorConfigBuilder};
pub use error::ExtractError;
pub use extract::Extractor;
pub use schema::{IdCardInfo, PersonalInfo};
