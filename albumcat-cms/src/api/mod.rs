//! HTTP API handlers for albumcat-cms

pub mod albums;
pub mod health;
pub mod upload;

use axum::routing::{get, post, put};
use axum::Router;
use serde::de::DeserializeOwned;
use tower_http::services::ServeDir;

use crate::{ApiError, ApiResult, AppState};

pub use albums::{create_album, delete_album, list_albums, update_album};
pub use health::{get_build_info, health_check, health_routes};
pub use upload::upload_image;

/// Local CMS API routes (development mode only)
///
/// Methods a route does not handle fall through to `host`, the same service
/// that answers every unmatched path.
pub fn cms_routes(host: ServeDir) -> Router<AppState> {
    Router::new()
        .route(
            "/api/albums",
            get(list_albums)
                .post(create_album)
                .fallback_service(host.clone()),
        )
        .route(
            "/api/albums/:id",
            put(update_album)
                .delete(delete_album)
                .fallback_service(host.clone()),
        )
        .route("/api/upload", post(upload_image).fallback_service(host))
}

/// Decode a JSON request body; anything malformed is a bad request
pub(crate) fn parse_body<T: DeserializeOwned>(body: &[u8]) -> ApiResult<T> {
    serde_json::from_slice(body).map_err(|e| ApiError::BadRequest(format!("Invalid request body: {}", e)))
}
