//! Data context for catalog front-ends
//!
//! Decides where albums come from: the Local CMS API in development, the
//! bundled snapshot in production. Mutations are development-only and never
//! update the local list optimistically; each success triggers a full refetch.

use base64::{engine::general_purpose, Engine as _};
use reqwest::{Client, Response};
use tracing::{error, info, warn};

use crate::album::{Album, AlbumPatch, NewAlbum};
use crate::api::{ErrorResponse, UploadRequest, UploadResponse};
use crate::time::now_iso;
use crate::{Error, Result};

/// Where the album list is read from
#[derive(Debug, Clone, PartialEq)]
pub enum DataSource {
    /// Local CMS API rooted at `base_url` (e.g. `http://127.0.0.1:5173`)
    Development { base_url: String },
    /// Bundled snapshot, read-only
    Production,
}

/// Client-side holder of the current album list
pub struct DataContext {
    source: DataSource,
    http: Client,
    /// Bundled data: the production list and the development fallback
    snapshot: Vec<Album>,
    albums: Vec<Album>,
    edit_mode: bool,
}

impl DataContext {
    /// Context backed by the Local CMS API, falling back to `fallback` when it is unreachable
    pub fn development(base_url: impl Into<String>, fallback: Vec<Album>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            source: DataSource::Development { base_url },
            http: Client::new(),
            snapshot: fallback,
            albums: Vec::new(),
            edit_mode: false,
        }
    }

    /// Read-only context over the bundled snapshot
    pub fn production(snapshot: Vec<Album>) -> Self {
        Self {
            source: DataSource::Production,
            http: Client::new(),
            snapshot,
            albums: Vec::new(),
            edit_mode: false,
        }
    }

    pub fn source(&self) -> &DataSource {
        &self.source
    }

    pub fn is_dev(&self) -> bool {
        matches!(self.source, DataSource::Development { .. })
    }

    /// Albums from the last refresh
    pub fn albums(&self) -> &[Album] {
        &self.albums
    }

    pub fn is_edit_mode(&self) -> bool {
        self.edit_mode
    }

    /// Flip edit mode. Production never enters it.
    pub fn toggle_edit_mode(&mut self) -> bool {
        if self.is_dev() {
            self.edit_mode = !self.edit_mode;
        }
        self.edit_mode
    }

    /// Reload the album list
    ///
    /// In development any failure (unreachable server, error status, bad body)
    /// is logged and the bundled snapshot is shown instead.
    pub async fn refresh(&mut self) {
        let DataSource::Development { base_url } = &self.source else {
            self.albums = self.snapshot.clone();
            return;
        };

        let url = format!("{}/api/albums", base_url);
        match self.fetch_albums(&url).await {
            Ok(albums) => self.albums = albums,
            Err(e) => {
                error!("Failed to fetch albums from local CMS: {}", e);
                self.albums = self.snapshot.clone();
            }
        }
    }

    async fn fetch_albums(&self, url: &str) -> Result<Vec<Album>> {
        let response = check_status(self.http.get(url).send().await?).await?;
        Ok(response.json().await?)
    }

    /// `POST /api/albums`, then refresh
    ///
    /// A payload without `dateAdded` is stamped with the current time, as the
    /// editor form does for new albums.
    pub async fn add_album(&mut self, album: &NewAlbum) -> Result<Album> {
        let url = self.api_url("/api/albums")?;
        let mut payload = album.clone();
        if payload.date_added.is_none() {
            payload.date_added = Some(now_iso());
        }
        let response = check_status(self.http.post(url).json(&payload).send().await?).await?;
        let stored: Album = response.json().await?;
        info!("Added album {} ({} - {})", stored.id, stored.artist, stored.title);
        self.refresh().await;
        Ok(stored)
    }

    /// `PUT /api/albums/:id`, then refresh
    pub async fn update_album(&mut self, id: i64, patch: &AlbumPatch) -> Result<Album> {
        let url = self.api_url(&format!("/api/albums/{}", id))?;
        let response = check_status(self.http.put(url).json(patch).send().await?).await?;
        let merged: Album = response.json().await?;
        self.refresh().await;
        Ok(merged)
    }

    /// `DELETE /api/albums/:id`, then refresh
    pub async fn delete_album(&mut self, id: i64) -> Result<()> {
        let url = self.api_url(&format!("/api/albums/{}", id))?;
        check_status(self.http.delete(url).send().await?).await?;
        self.refresh().await;
        Ok(())
    }

    /// Upload a cover image as base64 JSON; returns the URL to put in `coverUrl`
    pub async fn upload_image(&self, filename: &str, bytes: &[u8]) -> Result<UploadResponse> {
        let url = self.api_url("/api/upload")?;
        let body = UploadRequest {
            filename: Some(filename.to_string()),
            content: Some(general_purpose::STANDARD.encode(bytes)),
        };
        let response = check_status(self.http.post(url).json(&body).send().await?).await?;
        Ok(response.json().await?)
    }

    fn api_url(&self, path: &str) -> Result<String> {
        match &self.source {
            DataSource::Development { base_url } => Ok(format!("{}{}", base_url, path)),
            DataSource::Production => Err(Error::ReadOnly),
        }
    }
}

/// Turn a non-2xx response into `Error::Remote` carrying the server's message
async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let fallback = status.canonical_reason().unwrap_or("request failed").to_string();
    let message = match response.json::<ErrorResponse>().await {
        Ok(body) => body.error,
        Err(_) => fallback,
    };
    warn!("Catalog API returned {}: {}", status, message);
    Err(Error::Remote {
        status: status.as_u16(),
        message,
    })
}
