// Local device store - one JSON file per key under a data directory
use crate::application::state_repository::{IconCacheRepository, StateRepository};
use crate::domain::dashboard::Document;
use crate::domain::favicon::IconCache;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tokio::sync::Mutex;

pub const STATE_KEY: &str = "homepageData";
pub const ICON_CACHE_KEY: &str = "iconCache";

#[derive(Debug)]
pub struct LocalStore {
    dir: PathBuf,
    write_lock: Mutex<()>,
}

impl LocalStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    /// A value that does not parse is treated exactly like a missing one.
    pub async fn read_key<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let path = self.key_path(key);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {}", path.display()));
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Ignoring unparseable stored value");
                Ok(None)
            }
        }
    }

    /// Replace the value under `key`. The previous value survives any failure.
    pub async fn write_key<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(value).context("Failed to serialize value")?;
        let path = self.key_path(key);

        let _guard = self.write_lock.lock().await;
        tokio::task::spawn_blocking(move || atomic_write(&path, &bytes))
            .await
            .context("Write task panicked")??;

        tracing::debug!(key, "Stored value");
        Ok(())
    }
}

fn atomic_write(path: &Path, bytes: &[u8]) -> Result<()> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent)
        .with_context(|| format!("Failed to create {}", parent.display()))?;

    let mut tmp = NamedTempFile::new_in(parent).context("Failed to create temp file")?;
    tmp.write_all(bytes).context("Failed to write temp file")?;
    tmp.as_file().sync_all().context("Failed to sync temp file")?;
    tmp.persist(path)
        .map_err(|e| e.error)
        .with_context(|| format!("Failed to replace {}", path.display()))?;

    Ok(())
}

#[async_trait]
impl<D: Document> StateRepository<D> for LocalStore {
    async fn load(&self) -> Result<Option<D>> {
        self.read_key(STATE_KEY).await
    }

    async fn save(&self, state: &D) -> Result<()> {
        self.write_key(STATE_KEY, state).await
    }
}

#[async_trait]
impl IconCacheRepository for LocalStore {
    async fn load_icons(&self) -> Result<IconCache> {
        Ok(self.read_key(ICON_CACHE_KEY).await?.unwrap_or_default())
    }

    async fn save_icons(&self, icons: &IconCache) -> Result<()> {
        self.write_key(ICON_CACHE_KEY, icons).await
    }
}
