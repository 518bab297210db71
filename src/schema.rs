//! Record types mirroring the shapes the model is asked to answer in.
//!
//! Both records are bags of optional strings plus a confidence score. The
//! fields track the system prompts in [`crate::prompts`] one-for-one: adding
//! a field there without adding it here means the value is silently dropped
//! at the deserialization boundary, so the two files should change together.
//!
//! `#[serde(default)]` on every optional field makes a missing key decode to
//! `None`; unknown keys from the model are ignored. Confidence is repaired
//! *before* these types are constructed (see [`crate::pipeline::normalize`]),
//! so a deserialized record always carries a value in [0.0, 1.0].

use serde::{Deserialize, Serialize};

/// Confidence substituted when the model omits the key or reports a value
/// that is not a number in [0.0, 1.0].
pub const DEFAULT_CONFIDENCE: f64 = 0.8;

/// Structured personal information extracted from free text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalInfo {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub street: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub zip_code: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    /// Model-reported certainty, always in [0.0, 1.0].
    pub confidence: f64,
}

impl PersonalInfo {
    /// The canonical default record: every field `None`, confidence 0.0.
    ///
    /// Substituted whenever extraction cannot be completed.
    pub fn empty() -> Self {
        Self {
            name: None,
            street: None,
            city: None,
            state: None,
            country: None,
            zip_code: None,
            phone_number: None,
            email: None,
            confidence: 0.0,
        }
    }
}

/// Structured fields extracted from an ID card, driver's licence, or passport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdCardInfo {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub date_of_birth: Option<String>,
    #[serde(default)]
    pub id_number: Option<String>,
    #[serde(default)]
    pub license_number: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub zip_code: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub issue_date: Option<String>,
    #[serde(default)]
    pub expiration_date: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub height: Option<String>,
    #[serde(default)]
    pub weight: Option<String>,
    #[serde(default)]
    pub eye_color: Option<String>,
    #[serde(default)]
    pub document_type: Option<String>,
    #[serde(default)]
    pub issuing_authority: Option<String>,
    /// Model-reported certainty, always in [0.0, 1.0].
    pub confidence: f64,
}

impl IdCardInfo {
    /// The canonical default record: every field `None`, confidence 0.0.
    pub fn empty() -> Self {
        Self {
            full_name: None,
            first_name: None,
            last_name: None,
            date_of_birth: None,
            id_number: None,
            license_number: None,
            address: None,
            city: None,
            state: None,
            zip_code: None,
            country: None,
            issue_date: None,
            expiration_date: None,
            gender: None,
            height: None,
            weight: None,
            eye_color: None,
            document_type: None,
            issuing_authority: None,
            confidence: 0.0,
        }
    }
}
