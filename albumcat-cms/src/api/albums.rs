//! Album CRUD endpoints
//!
//! - `GET    /api/albums`      full catalog
//! - `POST   /api/albums`      append one album
//! - `PUT    /api/albums/:id`  shallow-merge fields into an album
//! - `DELETE /api/albums/:id`  remove every album with the id

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, Path, State},
    Json,
};
use albumcat_common::api::DeleteResponse;
use albumcat_common::{Album, AlbumPatch, NewAlbum};

use super::parse_body;
use crate::{ApiResult, AppState};

/// Read the integer a path id starts with
///
/// Leading whitespace, an optional sign and a `0x` prefix are accepted, then
/// digits up to the first character that is not one (`"12abc"` and `"1.5"`
/// address 12 and 1). A path with no leading digits matches no album.
fn parse_id(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, rest) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    let (radix, rest) = match rest.get(..2) {
        Some("0x") | Some("0X") => (16, &rest[2..]),
        _ => (10, rest),
    };

    let end = rest
        .find(|c: char| !c.is_digit(radix))
        .unwrap_or(rest.len());
    let value = i64::from_str_radix(&rest[..end], radix).ok()?;
    Some(if negative { -value } else { value })
}

/// GET /api/albums
pub async fn list_albums(State(state): State<AppState>) -> ApiResult<Json<Vec<Album>>> {
    Ok(Json(state.catalog.list().await?))
}

/// POST /api/albums
pub async fn create_album(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> ApiResult<Json<Album>> {
    let payload: NewAlbum = parse_body(&body?)?;
    Ok(Json(state.catalog.create(payload).await?))
}

/// PUT /api/albums/:id
pub async fn update_album(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    body: Result<Bytes, BytesRejection>,
) -> ApiResult<Json<Album>> {
    let patch: AlbumPatch = parse_body(&body?)?;
    Ok(Json(state.catalog.update(parse_id(&raw_id), &patch).await?))
}

/// DELETE /api/albums/:id
///
/// Deleting an id that is not in the catalog still succeeds.
pub async fn delete_album(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> ApiResult<Json<DeleteResponse>> {
    state.catalog.delete(parse_id(&raw_id)).await?;
    Ok(Json(DeleteResponse { success: true }))
}
