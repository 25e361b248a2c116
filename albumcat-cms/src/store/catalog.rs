//! Catalog Store: one JSON file holding the whole album array
//!
//! The file is the unit of persistence: every mutation reads the full array,
//! changes it and writes the full array back. A process-wide gate serializes
//! those read-modify-write cycles so concurrent requests cannot lose updates.
//! Writes land in a sibling temp file that is renamed over the catalog, so
//! readers outside the gate only ever see a complete file.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use albumcat_common::album::{next_album_id, parse_catalog, render_catalog};
use albumcat_common::time::now_millis;
use albumcat_common::{Album, AlbumPatch, Error, NewAlbum, Result};
use tokio::sync::Mutex;
use tracing::{debug, info};

#[derive(Clone)]
pub struct CatalogStore {
    path: Arc<PathBuf>,
    gate: Arc<Mutex<()>>,
}

impl CatalogStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Arc::new(path.into()),
            gate: Arc::new(Mutex::new(())),
        }
    }

    /// Create the catalog's parent directory; the file itself appears on first write
    pub async fn init(path: impl Into<PathBuf>) -> Result<Self> {
        let store = Self::new(path);
        if let Some(parent) = store.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        info!("Catalog file: {}", store.path.display());
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Full catalog in file order. A missing file is an empty catalog.
    pub async fn list(&self) -> Result<Vec<Album>> {
        self.load().await
    }

    /// Append a new album, assigning an id when the payload has none
    ///
    /// A client-chosen id that is already taken is reported as a conflict and
    /// nothing is written.
    pub async fn create(&self, new: NewAlbum) -> Result<Album> {
        let _guard = self.gate.lock().await;
        let mut albums = self.load().await?;

        let id = match new.requested_id() {
            Some(id) if albums.iter().any(|a| a.id == id) => {
                return Err(Error::Conflict(format!(
                    "Album with id {} already exists",
                    id
                )));
            }
            Some(id) => id,
            None => next_album_id(&albums, now_millis())?,
        };

        let album = new.into_album(id);
        albums.push(album.clone());
        self.persist(&albums).await?;

        info!("Created album {} ({} - {})", album.id, album.artist, album.title);
        Ok(album)
    }

    /// Merge `patch` into the first album with `id`
    ///
    /// `None` (an unparseable path id) matches nothing. The file is not
    /// rewritten when nothing matches.
    pub async fn update(&self, id: Option<i64>, patch: &AlbumPatch) -> Result<Album> {
        let _guard = self.gate.lock().await;
        let mut albums = self.load().await?;

        let index = id
            .and_then(|id| albums.iter().position(|a| a.id == id))
            .ok_or_else(|| Error::NotFound(format!("album {:?}", id)))?;

        let merged = albums[index].merged(patch)?;
        albums[index] = merged.clone();
        self.persist(&albums).await?;

        info!("Updated album {}", merged.id);
        Ok(merged)
    }

    /// Remove every album with `id`; returns how many went away (possibly zero)
    pub async fn delete(&self, id: Option<i64>) -> Result<usize> {
        let _guard = self.gate.lock().await;
        let mut albums = self.load().await?;

        let before = albums.len();
        if let Some(id) = id {
            albums.retain(|a| a.id != id);
        }
        let removed = before - albums.len();
        self.persist(&albums).await?;

        info!("Deleted album {:?} ({} record(s) removed)", id, removed);
        Ok(removed)
    }

    /// Write `albums` as the whole catalog unless it already holds records
    ///
    /// With `force` the current file is not read at all, so even an unparseable
    /// catalog gets replaced.
    pub async fn seed(&self, albums: &[Album], force: bool) -> Result<()> {
        let _guard = self.gate.lock().await;
        if !force {
            let existing = self.load().await?;
            if !existing.is_empty() {
                return Err(Error::Conflict(format!(
                    "{} already holds {} album(s)",
                    self.path.display(),
                    existing.len()
                )));
            }
        }
        self.persist(albums).await
    }

    async fn load(&self) -> Result<Vec<Album>> {
        match tokio::fs::read_to_string(self.path.as_path()).await {
            Ok(text) => parse_catalog(&text),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("Catalog file missing, treating as empty");
                Ok(Vec::new())
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn persist(&self, albums: &[Album]) -> Result<()> {
        let text = render_catalog(albums)?;
        let tmp = temp_path(&self.path);
        tokio::fs::write(&tmp, text).await?;
        tokio::fs::rename(&tmp, self.path.as_path()).await?;
        debug!("Wrote {} album(s) to {}", albums.len(), self.path.display());
        Ok(())
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "catalog.json".into());
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn store() -> (TempDir, CatalogStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = CatalogStore::init(dir.path().join("data").join("catalog.json"))
            .await
            .unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn test_missing_file_is_empty() {
        let (_dir, store) = store().await;
        assert!(store.list().await.unwrap().is_empty());
        assert!(!store.path().exists());
        assert!(store.path().parent().unwrap().is_dir());
    }

    #[tokio::test]
    async fn test_blank_file_is_empty() {
        let (_dir, store) = store().await;
        std::fs::write(store.path(), "\n").unwrap();
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let (_dir, store) = store().await;
        std::fs::write(store.path(), "[{").unwrap();
        assert!(matches!(store.list().await, Err(Error::Json(_))));
    }

    #[tokio::test]
    async fn test_create_appends_and_assigns_id() {
        let (_dir, store) = store().await;
        let first = store.create(NewAlbum::new("A", "One")).await.unwrap();
        let second = store.create(NewAlbum::new("B", "Two")).await.unwrap();

        assert!(second.id > first.id);
        let albums = store.list().await.unwrap();
        assert_eq!(albums, vec![first, second]);
        assert!(!temp_path(store.path()).exists());
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_id() {
        let (_dir, store) = store().await;
        let mut payload = NewAlbum::new("A", "One");
        payload.id = Some(5);
        store.create(payload.clone()).await.unwrap();

        let before = std::fs::read_to_string(store.path()).unwrap();
        let err = store.create(payload).await.unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));
        assert_eq!(std::fs::read_to_string(store.path()).unwrap(), before);
    }

    #[tokio::test]
    async fn test_update_missing_does_not_write() {
        let (_dir, store) = store().await;
        let patch = AlbumPatch::new().set("year", 2001);

        assert!(matches!(store.update(Some(1), &patch).await, Err(Error::NotFound(_))));
        assert!(matches!(store.update(None, &patch).await, Err(Error::NotFound(_))));
        assert!(!store.path().exists());
    }

    #[tokio::test]
    async fn test_delete_removes_all_matches() {
        let (_dir, store) = store().await;
        let dup = |title: &str| Album {
            id: 3,
            artist: "X".into(),
            title: title.into(),
            ..Default::default()
        };
        store.seed(&[dup("a"), dup("b")], true).await.unwrap();

        assert_eq!(store.delete(Some(3)).await.unwrap(), 2);
        assert_eq!(store.delete(Some(3)).await.unwrap(), 0);
        assert_eq!(store.delete(None).await.unwrap(), 0);
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_after_max_id_is_conflict() {
        let (_dir, store) = store().await;
        let mut payload = NewAlbum::new("A", "Max");
        payload.id = Some(i64::MAX);
        store.create(payload).await.unwrap();

        let err = store.create(NewAlbum::new("B", "Next")).await.unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));
        assert_eq!(store.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_seed_refuses_non_empty_catalog() {
        let (_dir, store) = store().await;
        let existing = Album { id: 1, artist: "A".into(), title: "T".into(), ..Default::default() };
        store.seed(&[existing.clone()], false).await.unwrap();

        let demo = Album { id: 2, artist: "B".into(), title: "U".into(), ..Default::default() };
        assert!(matches!(store.seed(&[demo.clone()], false).await, Err(Error::Conflict(_))));
        assert_eq!(store.list().await.unwrap(), vec![existing]);

        store.seed(&[demo.clone()], true).await.unwrap();
        assert_eq!(store.list().await.unwrap(), vec![demo]);
    }

    #[tokio::test]
    async fn test_forced_seed_replaces_corrupt_catalog() {
        let (_dir, store) = store().await;
        std::fs::write(store.path(), "[{").unwrap();
        let demo = Album { id: 2, artist: "B".into(), title: "U".into(), ..Default::default() };

        assert!(matches!(store.seed(&[demo.clone()], false).await, Err(Error::Json(_))));
        store.seed(&[demo.clone()], true).await.unwrap();
        assert_eq!(store.list().await.unwrap(), vec![demo]);
    }

    #[tokio::test]
    async fn test_concurrent_creates_are_not_lost() {
        let (_dir, store) = store().await;

        let tasks: Vec<_> = (0..20)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move { store.create(NewAlbum::new("Artist", format!("Title {}", i))).await })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let albums = store.list().await.unwrap();
        assert_eq!(albums.len(), 20);
        let mut ids: Vec<i64> = albums.iter().map(|a| a.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 20, "generated ids must be unique");
    }

    #[test]
    fn test_temp_path_is_sibling() {
        assert_eq!(
            temp_path(Path::new("/a/b/catalog.json")),
            PathBuf::from("/a/b/catalog.json.tmp")
        );
    }
}
