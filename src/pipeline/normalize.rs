//! Normalization of raw model output into typed records.
//!
//! ## Why is normalization necessary?
//!
//! Even with "Respond with ONLY a valid JSON object" in the prompt, models
//! routinely:
//!
//! - wrap the object in ` ```json … ``` ` fences (with or without a tag)
//! - pad it with leading/trailing whitespace
//! - omit the `confidence` key, or report it as `"high"` or `1.5`
//!
//! These are formatting quirks, not extraction failures, so they are repaired
//! deterministically here rather than rejected. Output that is not a JSON
//! object at all *is* a failure ([`ExtractError::UnparsableOutput`]) — the
//! caller substitutes the canonical default record for it.
//!
//! All dynamic-JSON handling is confined to this module: the rest of the
//! crate only ever sees [`RawExtraction`] (an object with a repaired
//! confidence) or the fixed-schema record it converts into.

use crate::error::ExtractError;
use crate::schema::DEFAULT_CONFIDENCE;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::debug;

/// A parsed model answer: a JSON object whose `confidence` key has been
/// validated and repaired, not yet bound to a record type.
///
/// Conversion into the typed record happens in exactly one place,
/// [`RawExtraction::into_record`], so there is a single boundary where
/// unknown fields are dropped and missing fields default to `None`.
#[derive(Debug, Clone)]
pub struct RawExtraction {
    object: Map<String, Value>,
}

impl RawExtraction {
    /// The repaired confidence, guaranteed to be in [0.0, 1.0].
    pub fn confidence(&self) -> f64 {
        self.object
            .get("confidence")
            .and_then(Value::as_f64)
            .unwrap_or(DEFAULT_CONFIDENCE)
    }

    /// Convert into the fixed-schema record type.
    ///
    /// Missing keys become `None`, unknown keys are dropped. A key bound to
    /// the wrong JSON type (e.g. a numeric `name`) fails the conversion and
    /// is reported as unparsable output.
    pub fn into_record<T: DeserializeOwned>(self) -> Result<T, ExtractError> {
        let snippet = snippet(&Value::Object(self.object.clone()).to_string());
        serde_json::from_value(Value::Object(self.object))
            .map_err(|_| ExtractError::UnparsableOutput { snippet })
    }
}

/// Parse raw model output into a [`RawExtraction`].
///
/// Steps, in order:
/// 1. Trim surrounding whitespace.
/// 2. Strip one outer markdown code fence, tagged or untagged.
/// 3. Strict JSON parse; anything but an object is unparsable.
/// 4. Repair `confidence`: missing → 0.8, non-numeric or outside [0, 1] →
///    0.8, otherwise coerced to a float.
pub fn normalize(raw: &str) -> Result<RawExtraction, ExtractError> {
    let stripped = strip_code_fence(raw.trim());

    let value: Value = serde_json::from_str(stripped).map_err(|_| {
        debug!("model output failed JSON parse: {}", snippet(raw));
        ExtractError::UnparsableOutput {
            snippet: snippet(raw),
        }
    })?;

    let Value::Object(mut object) = value else {
        return Err(ExtractError::UnparsableOutput {
            snippet: snippet(raw),
        });
    };

    let repaired = repair_confidence(object.get("confidence"));
    object.insert("confidence".to_string(), Value::from(repaired));

    Ok(RawExtraction { object })
}

// ── Fence stripping ──────────────────────────────────────────────────────
//
// Same rule as stripping ```markdown fences from a VLM transcription, but
// the tag is anything-or-nothing: models answer with ```json, ```JSON, or
// bare ``` depending on the day.

static RE_OUTER_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^```[A-Za-z0-9_-]*\s*(.*?)\s*```$").unwrap());

fn strip_code_fence(input: &str) -> &str {
    match RE_OUTER_FENCE.captures(input) {
        Some(caps) => caps.get(1).map_or(input, |m| m.as_str()),
        None => input,
    }
}

// ── Confidence repair ────────────────────────────────────────────────────

fn repair_confidence(value: Option<&Value>) -> f64 {
    match value.and_then(Value::as_f64) {
        Some(c) if (0.0..=1.0).contains(&c) => c,
        // Missing, non-numeric ("high"), NaN, or out of range (1.5, -2).
        _ => DEFAULT_CONFIDENCE,
    }
}

/// First 120 characters of the offending output, for error messages and logs.
fn snippet(raw: &str) -> String {
    let mut s: String = raw.chars().take(120).collect();
    if s.len() < raw.len() {
        s.push('…');
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{IdCardInfo, PersonalInfo};

    const LEWIS: &str = r#"{"name": "Lewis Hamilton", "street": "2944 Monaco dr", "city": "Manchester", "state": "Colorado", "country": "USA", "zip_code": "92223", "phone_number": "893-366-8888", "email": null, "confidence": 0.95}"#;

    #[test]
    fn documented_example_parses_into_record() {
        let record: PersonalInfo = normalize(LEWIS).unwrap().into_record().unwrap();
        assert_eq!(record.name.as_deref(), Some("Lewis Hamilton"));
        assert_eq!(record.zip_code.as_deref(), Some("92223"));
        assert!(record.email.is_none());
        assert_eq!(record.confidence, 0.95);
    }

    #[test]
    fn fenced_output_parses_identically_to_unfenced() {
        let fenced = format!("```json\n{LEWIS}\n```");
        let plain: PersonalInfo = normalize(LEWIS).unwrap().into_record().unwrap();
        let stripped: PersonalInfo = normalize(&fenced).unwrap().into_record().unwrap();
        assert_eq!(plain, stripped);
    }

    #[test]
    fn untagged_fence_is_stripped() {
        let fenced = format!("```\n{LEWIS}\n```");
        let record: PersonalInfo = normalize(&fenced).unwrap().into_record().unwrap();
        assert_eq!(record.name.as_deref(), Some("Lewis Hamilton"));
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        let padded = format!("\n\n  {LEWIS}  \n");
        assert_eq!(normalize(&padded).unwrap().confidence(), 0.95);
    }

    #[test]
    fn missing_confidence_defaults() {
        let raw = r#"{"name": "Ada"}"#;
        assert_eq!(normalize(raw).unwrap().confidence(), 0.8);
    }

    #[test]
    fn out_of_range_confidence_is_replaced() {
        assert_eq!(normalize(r#"{"confidence": 1.5}"#).unwrap().confidence(), 0.8);
        assert_eq!(normalize(r#"{"confidence": -0.2}"#).unwrap().confidence(), 0.8);
    }

    #[test]
    fn non_numeric_confidence_is_replaced() {
        assert_eq!(
            normalize(r#"{"confidence": "high"}"#).unwrap().confidence(),
            0.8
        );
        assert_eq!(normalize(r#"{"confidence": null}"#).unwrap().confidence(), 0.8);
    }

    #[test]
    fn integer_confidence_in_range_is_kept() {
        assert_eq!(normalize(r#"{"confidence": 1}"#).unwrap().confidence(), 1.0);
        assert_eq!(normalize(r#"{"confidence": 0}"#).unwrap().confidence(), 0.0);
    }

    #[test]
    fn prose_output_is_unparsable() {
        let err = normalize("I could not find any personal information.").unwrap_err();
        assert!(matches!(err, ExtractError::UnparsableOutput { .. }));
    }

    #[test]
    fn json_array_is_unparsable() {
        let err = normalize(r#"[{"name": "Ada"}]"#).unwrap_err();
        assert!(matches!(err, ExtractError::UnparsableOutput { .. }));
    }

    #[test]
    fn id_card_record_from_partial_object() {
        let raw = r#"{"full_name": "JANE SAMPLE", "document_type": "Driver's License"}"#;
        let record: IdCardInfo = normalize(raw).unwrap().into_record().unwrap();
        assert_eq!(record.full_name.as_deref(), Some("JANE SAMPLE"));
        assert!(record.license_number.is_none());
        assert_eq!(record.confidence, 0.8);
    }

    #[test]
    fn snippet_truncates_long_output() {
        let long = "x".repeat(500);
        let err = normalize(&long).unwrap_err();
        let ExtractError::UnparsableOutput { snippet } = err else {
            panic!("expected UnparsableOutput");
        };
        assert!(snippet.chars().count() <= 121);
    }
}
