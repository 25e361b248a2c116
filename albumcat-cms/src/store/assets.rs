//! Asset Store: the directory of uploaded cover images

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use albumcat_common::asset::generated_name;
use albumcat_common::time::now_millis;
use albumcat_common::{Error, Result};
use tokio::io::AsyncWriteExt;
use tracing::info;

/// Name collisions tolerated before giving up
const MAX_NAME_ATTEMPTS: i64 = 16;

#[derive(Clone)]
pub struct AssetStore {
    dir: Arc<PathBuf>,
}

impl AssetStore {
    /// Open the covers directory, creating it if missing. Runs once at startup.
    pub fn init(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        info!("Covers directory: {}", dir.display());
        Ok(Self { dir: Arc::new(dir) })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write `bytes` under `<epoch-ms>-<sanitized original>`; returns the stored name
    ///
    /// Existing files are never overwritten: on a collision the timestamp is
    /// bumped by one millisecond.
    pub async fn save(&self, original_name: &str, bytes: &[u8]) -> Result<String> {
        let started = now_millis();

        for offset in 0..MAX_NAME_ATTEMPTS {
            let name = generated_name(started + offset, original_name);
            let path = self.dir.join(&name);

            let mut file = match tokio::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(file) => file,
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e.into()),
            };

            file.write_all(bytes).await?;
            file.flush().await?;
            info!("Stored cover {} ({} bytes)", name, bytes.len());
            return Ok(name);
        }

        Err(Error::Conflict(format!(
            "Could not find a free file name for {}",
            original_name
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_init_creates_nested_dir() {
        let root = tempfile::tempdir().unwrap();
        let store = AssetStore::init(root.path().join("public").join("covers")).unwrap();
        assert!(store.dir().is_dir());
    }

    #[tokio::test]
    async fn test_save_writes_exact_bytes() {
        let root = tempfile::tempdir().unwrap();
        let store = AssetStore::init(root.path()).unwrap();
        let bytes = [0u8, 159, 146, 150, 255, 13, 10];

        let name = store.save("My Cover!.PNG", &bytes).await.unwrap();
        assert!(name.ends_with("-My_Cover_.PNG"));
        assert_eq!(std::fs::read(store.dir().join(&name)).unwrap(), bytes);
    }

    #[tokio::test]
    async fn test_save_never_overwrites() {
        let root = tempfile::tempdir().unwrap();
        let store = AssetStore::init(root.path()).unwrap();

        let a = store.save("same.jpg", b"first").await.unwrap();
        let b = store.save("same.jpg", b"second").await.unwrap();
        assert_ne!(a, b);
        assert_eq!(std::fs::read(store.dir().join(&a)).unwrap(), b"first");
        assert_eq!(std::fs::read(store.dir().join(&b)).unwrap(), b"second");
    }
}
