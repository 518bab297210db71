//! ID-card extraction endpoint: `POST /api/idcard/parse`.
//!
//! Multipart upload, field name `file`. Both client-input checks — declared
//! content type and payload size — run before any remote call, so a rejected
//! upload never costs a vision-model invocation.

use crate::api::error::ApiError;
use crate::api::AppState;
use crate::schema::IdCardInfo;
use axum::extract::{Multipart, State};
use axum::Json;
use serde::Serialize;
use tracing::warn;

/// Filename reported back when the client did not send one.
const FALLBACK_FILENAME: &str = "uploaded_image";

/// Response shape for ID-card extraction; same conventions as the text
/// endpoint (`parsed_data` always a full record, `error` set on degraded
/// results).
#[derive(Debug, Serialize)]
pub struct IdCardParseResponse {
    pub filename: String,
    pub parsed_data: IdCardInfo,
    pub confidence: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Extract structured fields from an uploaded ID-document image.
pub async fn parse(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<IdCardParseResponse>, ApiError> {
    // Each field is consumed in full before the next one is requested; the
    // upload's metadata and bytes are carried out of the loop by value.
    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Malformed multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let is_image = field
            .content_type()
            .is_some_and(|ct| ct.starts_with("image/"));
        let filename = field
            .file_name()
            .filter(|name| !name.is_empty())
            .unwrap_or(FALLBACK_FILENAME)
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Failed to read upload: {e}")))?;
        upload = Some((filename, is_image, bytes));
        break;
    }

    let Some((filename, is_image, bytes)) = upload else {
        return Err(ApiError::BadRequest(
            "Multipart field 'file' is required".into(),
        ));
    };

    if !is_image {
        return Err(ApiError::BadRequest("File must be an image".into()));
    }

    let limit = state.extractor.config().max_upload_bytes;
    if bytes.len() > limit {
        return Err(ApiError::BadRequest(format!(
            "File too large. Maximum size is {} MiB",
            limit / (1024 * 1024)
        )));
    }

    match state.extractor.parse_id_card(bytes.to_vec(), &filename).await {
        Ok(record) => Ok(Json(IdCardParseResponse {
            filename,
            confidence: record.confidence,
            parsed_data: record,
            error: None,
        })),
        Err(e) if e.is_degradable() => {
            warn!(filename = %filename, error = %e, "id-card extraction degraded to default record");
            Ok(Json(IdCardParseResponse {
                filename,
                parsed_data: IdCardInfo::empty(),
                confidence: 0.0,
                error: Some(e.to_string()),
            }))
        }
        Err(e) => Err(ApiError::Internal(e.to_string())),
    }
}
