//! Request and response bodies of the Local CMS API
//!
//! Shared by the server handlers and the data context client.

use serde::{Deserialize, Serialize};

/// Body of `POST /api/upload`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UploadRequest {
    /// Original file name as picked by the user
    #[serde(default)]
    pub filename: Option<String>,
    /// File bytes, base64 encoded (a `data:` URL prefix is tolerated)
    #[serde(default)]
    pub content: Option<String>,
}

/// Response of `POST /api/upload`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadResponse {
    pub url: String,
}

/// Response of `DELETE /api/albums/:id`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub success: bool,
}

/// Body of every error response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
