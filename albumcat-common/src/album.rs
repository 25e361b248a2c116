//! Album records as stored in the catalog file
//!
//! The catalog is a JSON array of camelCase objects. Known fields are typed;
//! anything else a record carries (`rating`, `comment`, `lastUpdated`, ...)
//! rides along in `extra` and is written back untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{Error, Result};

/// One catalog entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Album {
    pub id: i64,
    #[serde(default)]
    pub artist: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    /// ISO-8601 timestamp, supplied by the client
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_added: Option<String>,
    /// Fields the catalog does not interpret
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body of a create request
///
/// `artist` and `title` must be present; everything else is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAlbum {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub artist: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_added: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl NewAlbum {
    /// Create a payload with only the required fields set
    pub fn new(artist: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            artist: artist.into(),
            title: title.into(),
            ..Default::default()
        }
    }

    /// Client-chosen id, if any. Zero counts as "not chosen".
    pub fn requested_id(&self) -> Option<i64> {
        self.id.filter(|id| *id != 0)
    }

    /// Turn the payload into a stored record under `id`
    pub fn into_album(self, id: i64) -> Album {
        Album {
            id,
            artist: self.artist,
            title: self.title,
            cover_url: self.cover_url,
            country: self.country,
            year: self.year,
            tags: self.tags,
            date_added: self.date_added,
            extra: self.extra,
        }
    }
}

/// Partial update: a JSON object whose keys overwrite the stored record's keys
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AlbumPatch(Map<String, Value>);

impl AlbumPatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter
    pub fn set(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for AlbumPatch {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

impl Album {
    /// Shallow merge: keys in `patch` replace this record's keys, the rest stay.
    ///
    /// The record keeps its id even if the patch carries one. A patch that gives
    /// a typed field the wrong type is rejected as invalid input.
    pub fn merged(&self, patch: &AlbumPatch) -> Result<Album> {
        let mut fields = match serde_json::to_value(self)? {
            Value::Object(map) => map,
            other => {
                return Err(Error::Internal(format!(
                    "album serialized to non-object: {}",
                    other
                )))
            }
        };

        for (key, value) in patch.fields() {
            if key == "id" {
                continue;
            }
            fields.insert(key.clone(), value.clone());
        }

        let mut merged: Album = serde_json::from_value(Value::Object(fields))
            .map_err(|e| Error::InvalidInput(format!("Invalid album fields: {}", e)))?;
        merged.id = self.id;
        Ok(merged)
    }
}

/// Parse catalog file text. Blank text is an empty catalog.
pub fn parse_catalog(text: &str) -> Result<Vec<Album>> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_str(text)?)
}

/// Serialize the catalog the way it is kept on disk (2-space indented JSON array)
pub fn render_catalog(albums: &[Album]) -> Result<String> {
    Ok(serde_json::to_string_pretty(albums)?)
}

/// Pick an id for a new record: the current millisecond timestamp, bumped past
/// the largest existing id when two creates land in the same millisecond.
///
/// Fails with `Error::Conflict` when the largest id is already `i64::MAX`.
pub fn next_album_id(existing: &[Album], now_ms: i64) -> Result<i64> {
    match existing.iter().map(|a| a.id).max() {
        Some(max_id) if max_id >= now_ms => max_id.checked_add(1).ok_or_else(|| {
            Error::Conflict(format!("No album id left above {}", max_id))
        }),
        _ => Ok(now_ms),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn in_rainbows() -> Album {
        serde_json::from_value(json!({
            "id": 1,
            "artist": "Radiohead",
            "title": "In Rainbows",
            "coverUrl": "/covers/in-rainbows.jpg",
            "country": "UK",
            "year": 2007,
            "tags": ["Art Rock", "Electronic", "Experimental"],
            "dateAdded": "2024-01-20T10:00:00Z",
            "rating": null,
            "comment": "Increíble texturas y calidez."
        }))
        .unwrap()
    }

    #[test]
    fn test_unknown_fields_survive_round_trip() {
        let album = in_rainbows();
        assert_eq!(album.extra.get("rating"), Some(&Value::Null));
        assert_eq!(album.extra["comment"], "Increíble texturas y calidez.");

        let value = serde_json::to_value(&album).unwrap();
        assert_eq!(value["rating"], Value::Null);
        assert!(value.as_object().unwrap().contains_key("rating"));
        assert_eq!(value["coverUrl"], "/covers/in-rainbows.jpg");
        assert_eq!(value["dateAdded"], "2024-01-20T10:00:00Z");
    }

    #[test]
    fn test_absent_optional_fields_stay_absent() {
        let album: Album = serde_json::from_value(json!({"id": 7, "artist": "A", "title": "T"})).unwrap();
        let value = serde_json::to_value(&album).unwrap();
        assert_eq!(value, json!({"id": 7, "artist": "A", "title": "T"}));
    }

    #[test]
    fn test_stored_album_tolerates_missing_artist() {
        let album: Album = serde_json::from_value(json!({"id": 3})).unwrap();
        assert_eq!(album.artist, "");
        assert_eq!(album.title, "");
    }

    #[test]
    fn test_new_album_requires_artist_and_title() {
        let err = serde_json::from_value::<NewAlbum>(json!({"title": "T"})).unwrap_err();
        assert!(err.to_string().contains("artist"));

        let err = serde_json::from_value::<NewAlbum>(json!({"artist": "A"})).unwrap_err();
        assert!(err.to_string().contains("title"));
    }

    #[test]
    fn test_requested_id_treats_zero_and_null_as_missing() {
        let zero: NewAlbum = serde_json::from_value(json!({"id": 0, "artist": "A", "title": "T"})).unwrap();
        assert_eq!(zero.requested_id(), None);

        let null: NewAlbum = serde_json::from_value(json!({"id": null, "artist": "A", "title": "T"})).unwrap();
        assert_eq!(null.requested_id(), None);

        let set: NewAlbum = serde_json::from_value(json!({"id": 42, "artist": "A", "title": "T"})).unwrap();
        assert_eq!(set.requested_id(), Some(42));
    }

    #[test]
    fn test_into_album_keeps_extra_fields() {
        let payload: NewAlbum = serde_json::from_value(json!({
            "artist": "A", "title": "T", "lastUpdated": "2024-02-01T00:00:00Z"
        }))
        .unwrap();
        let album = payload.into_album(99);
        assert_eq!(album.id, 99);
        assert_eq!(album.extra["lastUpdated"], "2024-02-01T00:00:00Z");
    }

    #[test]
    fn test_merge_overwrites_only_provided_keys() {
        let album = in_rainbows();
        let merged = album.merged(&AlbumPatch::new().set("year", 2008)).unwrap();

        assert_eq!(merged.year, Some(2008));
        assert_eq!(merged.artist, album.artist);
        assert_eq!(merged.tags, album.tags);
        assert_eq!(merged.extra, album.extra);
    }

    #[test]
    fn test_merge_keeps_record_id() {
        let album = in_rainbows();
        let merged = album
            .merged(&AlbumPatch::new().set("id", 555).set("title", "Other"))
            .unwrap();
        assert_eq!(merged.id, 1);
        assert_eq!(merged.title, "Other");
    }

    #[test]
    fn test_merge_adds_unknown_keys() {
        let merged = in_rainbows()
            .merged(&AlbumPatch::new().set("lastUpdated", "2025-01-01T00:00:00Z"))
            .unwrap();
        assert_eq!(merged.extra["lastUpdated"], "2025-01-01T00:00:00Z");
    }

    #[test]
    fn test_merge_rejects_wrong_types() {
        let err = in_rainbows()
            .merged(&AlbumPatch::new().set("year", "nineteen"))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_patch_must_be_object() {
        assert!(serde_json::from_value::<AlbumPatch>(json!([1, 2])).is_err());
        let patch: AlbumPatch = serde_json::from_value(json!({"year": 1999})).unwrap();
        assert!(!patch.is_empty());
    }

    #[test]
    fn test_catalog_text_round_trip() {
        assert!(parse_catalog("").unwrap().is_empty());

        let albums = vec![in_rainbows(), Album { id: 2, artist: "B".into(), title: "Y".into(), ..Default::default() }];
        let text = render_catalog(&albums).unwrap();
        assert!(text.starts_with("[\n  {\n    \"id\": 1,"));
        assert_eq!(parse_catalog(&text).unwrap(), albums);
        assert_eq!(render_catalog(&parse_catalog(&text).unwrap()).unwrap(), text);
    }

    #[test]
    fn test_next_album_id() {
        assert_eq!(next_album_id(&[], 1_000).unwrap(), 1_000);

        let small = vec![Album { id: 2, ..Default::default() }];
        assert_eq!(next_album_id(&small, 1_000).unwrap(), 1_000);

        let same_ms = vec![Album { id: 1_000, ..Default::default() }];
        assert_eq!(next_album_id(&same_ms, 1_000).unwrap(), 1_001);
    }

    #[test]
    fn test_next_album_id_at_i64_max_is_conflict() {
        let maxed = vec![Album { id: i64::MAX, ..Default::default() }];
        let err = next_album_id(&maxed, 1_000).unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));
    }
}
