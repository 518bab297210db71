//! Text-extraction endpoint: `POST /api/todos/classify`.

use crate::api::error::ApiError;
use crate::api::AppState;
use crate::schema::PersonalInfo;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Debug, Deserialize)]
pub struct TextParseRequest {
    pub input_text: String,
}

/// Response shape for text extraction.
///
/// `parsed_data` is always a full record — the canonical default one on
/// failure — and `confidence` is duplicated at the top level for convenience.
/// Failures additionally set `error`; the record is never replaced by null.
#[derive(Debug, Serialize)]
pub struct TextParseResponse {
    pub original_input: String,
    pub parsed_data: PersonalInfo,
    pub confidence: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Extract personal information from unstructured text.
pub async fn classify(
    State(state): State<AppState>,
    Json(request): Json<TextParseRequest>,
) -> Result<Json<TextParseResponse>, ApiError> {
    if request.input_text.trim().is_empty() {
        return Err(ApiError::BadRequest("input_text must not be empty".into()));
    }

    match state.extractor.parse_text(&request.input_text).await {
        Ok(record) => Ok(Json(TextParseResponse {
            original_input: request.input_text,
            confidence: record.confidence,
            parsed_data: record,
            error: None,
        })),
        Err(e) if e.is_degradable() => {
            warn!(error = %e, "text extraction degraded to default record");
            Ok(Json(TextParseResponse {
                original_input: request.input_text,
                parsed_data: PersonalInfo::empty(),
                confidence: 0.0,
                error: Some(e.to_string()),
            }))
        }
        Err(e) => Err(ApiError::Internal(e.to_string())),
    }
}
