//! Cover image upload
//!
//! `POST /api/upload` with `{"filename": "...", "content": "<base64>"}`.
//! The response carries the public URL to store in an album's `coverUrl`;
//! no album is modified here.

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    Json,
};
use albumcat_common::api::{UploadRequest, UploadResponse};
use albumcat_common::asset::cover_url;
use base64::{engine::general_purpose, Engine as _};

use super::parse_body;
use crate::{ApiError, ApiResult, AppState};

/// POST /api/upload
pub async fn upload_image(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> ApiResult<Json<UploadResponse>> {
    let request: UploadRequest = parse_body(&body?)?;

    let filename = request.filename.filter(|f| !f.trim().is_empty());
    let content = request.content.filter(|c| !c.trim().is_empty());
    let (Some(filename), Some(content)) = (filename, content) else {
        return Err(ApiError::BadRequest("Missing filename or content".to_string()));
    };

    let bytes = decode_content(&content)?;
    let stored = state.assets.save(&filename, &bytes).await?;

    Ok(Json(UploadResponse {
        url: cover_url(&stored),
    }))
}

/// Decode base64 file content, accepting a full `data:<mime>;base64,` URL as well
fn decode_content(content: &str) -> ApiResult<Vec<u8>> {
    let payload = match content.split_once(";base64,") {
        Some((prefix, data)) if prefix.starts_with("data:") => data,
        _ => content,
    };

    general_purpose::STANDARD
        .decode(payload.trim())
        .map_err(|e| ApiError::BadRequest(format!("Invalid base64 content: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_plain_base64() {
        assert_eq!(decode_content("aGVsbG8=").unwrap(), b"hello");
    }

    #[test]
    fn test_decode_data_url() {
        assert_eq!(
            decode_content("data:image/png;base64,aGVsbG8=").unwrap(),
            b"hello"
        );
    }

    #[test]
    fn test_decode_rejects_invalid() {
        assert!(matches!(
            decode_content("***"),
            Err(ApiError::BadRequest(_))
        ));
    }
}
