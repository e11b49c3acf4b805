//! Tagging proxy
//!
//! POST /api/analyze: forwards a photo to the vision model and returns the
//! mood keywords it sees.

use axum::{extract::rejection::JsonRejection, extract::State, http::StatusCode, Json};
use tracing::{error, warn};
use vibesync_common::api::{AnalyzeRequest, AnalyzeResponse};
use vibesync_common::TagSet;

use crate::error::{ApiResult, ProxyError};
use crate::services::InlineImage;
use crate::AppState;

/// Upper bound on keywords returned to the client
pub const MAX_TAGS: usize = 5;

/// MIME type assumed when the payload does not declare an image type
pub const DEFAULT_IMAGE_MIME: &str = "image/jpeg";

/// Split an image payload into MIME type and base64 data
///
/// - `data:<mime>;base64,<payload>`: prefix stripped; the declared MIME is
///   kept when it is an `image/*` type.
/// - any other `data:` URI (no `;base64,` marker, empty payload): rejected.
/// - anything else is treated as raw base64 and passed through untouched.
pub fn parse_image_payload(image: &str) -> Result<InlineImage, ProxyError> {
    let image = image.trim();
    if image.is_empty() {
        return Err(ProxyError::BadRequest("Missing image"));
    }

    let Some(rest) = image.strip_prefix("data:") else {
        return Ok(InlineImage {
            mime_type: DEFAULT_IMAGE_MIME.to_string(),
            data: image.to_string(),
        });
    };

    let (header, data) = rest
        .split_once(',')
        .ok_or(ProxyError::BadRequest("Invalid image payload"))?;
    let mime = header
        .strip_suffix(";base64")
        .ok_or(ProxyError::BadRequest("Invalid image payload"))?;
    if data.is_empty() {
        return Err(ProxyError::BadRequest("Invalid image payload"));
    }

    let mime_type = if mime.starts_with("image/") {
        mime.to_string()
    } else {
        DEFAULT_IMAGE_MIME.to_string()
    };

    Ok(InlineImage {
        mime_type,
        data: data.to_string(),
    })
}

/// Turn the model's comma-separated reply into a TagSet
///
/// `"cozy, , neon,"` → `["cozy", "neon"]`
pub fn normalize_tags(text: &str) -> TagSet {
    text.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .take(MAX_TAGS)
        .collect()
}

/// POST /api/analyze
pub async fn analyze_image(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> ApiResult<Json<AnalyzeResponse>> {
    let Some(gemini) = state.gemini.as_ref() else {
        error!("Tagging request rejected: GEMINI_API_KEY not configured");
        return Err(ProxyError::Misconfigured("Missing API Key"));
    };

    let Json(request) = payload.map_err(|e| {
        warn!("Malformed analyze request: {}", e);
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ProxyError::PayloadTooLarge("Image too large")
        } else {
            ProxyError::BadRequest("Missing image")
        }
    })?;

    let image = parse_image_payload(&request.image)?;

    let text = gemini.describe_atmosphere(&image).await.map_err(|e| {
        error!(error = %e, "Gemini error");
        ProxyError::Upstream("Analysis failed")
    })?;

    Ok(Json(AnalyzeResponse {
        tags: normalize_tags(&text),
    }))
}
