// Repository traits for dashboard persistence
use crate::domain::dashboard::Document;
use crate::domain::favicon::IconCache;
use async_trait::async_trait;

/// Load/save contract shared by the local device store and the remote-synced store.
///
/// `save` replaces the whole document. A failed save must leave the previously
/// stored document intact.
#[async_trait]
pub trait StateRepository<D: Document>: Send + Sync {
    /// `Ok(None)` when nothing usable is stored yet
    async fn load(&self) -> anyhow::Result<Option<D>>;

    async fn save(&self, state: &D) -> anyhow::Result<()>;
}

/// Persistence for the `origin -> icon` cache map
#[async_trait]
pub trait IconCacheRepository: Send + Sync {
    async fn load_icons(&self) -> anyhow::Result<IconCache>;

    async fn save_icons(&self, icons: &IconCache) -> anyhow::Result<()>;
}

/// Best-effort existence check for an icon url. The response body is never inspected.
#[async_trait]
pub trait FaviconProbe: Send + Sync {
    async fn probe(&self, icon_url: &str) -> anyhow::Result<()>;
}
