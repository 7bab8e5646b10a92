// Favicon service - TTL-cached best-effort icon lookup
use crate::application::state_repository::{FaviconProbe, IconCacheRepository};
use crate::domain::favicon::{FRESHNESS_WINDOW_MS, FaviconEntry, IconCache, icon_url_for, origin_of};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Resolves `<origin>/favicon.ico` for page urls, remembering successful probes per origin.
///
/// Concurrent lookups for one origin may both probe; the last cache write wins,
/// which is harmless because the icon url only depends on the origin.
#[derive(Clone)]
pub struct FaviconResolver {
    probe: Arc<dyn FaviconProbe>,
    repository: Option<Arc<dyn IconCacheRepository>>,
    cache: Arc<Mutex<IconCache>>,
    window_ms: i64,
}

impl FaviconResolver {
    pub fn new(probe: Arc<dyn FaviconProbe>) -> Self {
        Self {
            probe,
            repository: None,
            cache: Arc::new(Mutex::new(IconCache::new())),
            window_ms: FRESHNESS_WINDOW_MS,
        }
    }

    /// Persist the cache through `repository` after every successful probe.
    pub fn with_repository(mut self, repository: Arc<dyn IconCacheRepository>) -> Self {
        self.repository = Some(repository);
        self
    }

    pub fn with_window(mut self, window_ms: i64) -> Self {
        self.window_ms = window_ms;
        self
    }

    /// Seed the in-memory cache from the repository. An unreadable cache starts empty.
    pub async fn warm(&self) {
        let Some(repository) = &self.repository else {
            return;
        };

        match repository.load_icons().await {
            Ok(icons) => {
                tracing::debug!("Loaded {} cached favicons", icons.len());
                *self.cache.lock().await = icons;
            }
            Err(e) => tracing::warn!(error = %e, "Failed to load favicon cache"),
        }
    }

    pub async fn resolve(&self, page_url: &str) -> Option<String> {
        self.resolve_at(page_url, chrono::Utc::now().timestamp_millis())
            .await
    }

    /// Resolve as if the current time were `now_ms`. `None` means the caller
    /// should show the fallback glyph.
    pub async fn resolve_at(&self, page_url: &str, now_ms: i64) -> Option<String> {
        let origin = origin_of(page_url)?;

        if let Some(entry) = self.cache.lock().await.get(&origin) {
            if entry.is_fresh(now_ms, self.window_ms) {
                return Some(entry.icon_url.clone());
            }
        }

        let icon_url = icon_url_for(&origin);
        if let Err(e) = self.probe.probe(&icon_url).await {
            tracing::debug!(origin = %origin, error = %e, "Favicon probe failed");
            return None;
        }

        // Saved under the lock so a slower write never overwrites a newer map.
        let mut cache = self.cache.lock().await;
        cache.insert(
            origin,
            FaviconEntry {
                icon_url: icon_url.clone(),
                fetched_at: now_ms,
            },
        );
        if let Some(repository) = &self.repository {
            if let Err(e) = repository.save_icons(&cache).await {
                tracing::warn!(error = %e, "Failed to save favicon cache");
            }
        }

        Some(icon_url)
    }

    pub async fn cached(&self, origin: &str) -> Option<FaviconEntry> {
        self.cache.lock().await.get(origin).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingProbe {
        calls: AtomicUsize,
        unreachable: AtomicBool,
    }

    #[async_trait]
    impl FaviconProbe for CountingProbe {
        async fn probe(&self, _icon_url: &str) -> anyhow::Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.unreachable.load(Ordering::SeqCst) {
                anyhow::bail!("connection refused");
            }
            Ok(())
        }
    }

    #[derive(Default)]
    struct MemoryIcons {
        saved: std::sync::Mutex<Option<IconCache>>,
        slow_first_write: AtomicBool,
    }

    #[async_trait]
    impl IconCacheRepository for MemoryIcons {
        async fn load_icons(&self) -> anyhow::Result<IconCache> {
            Ok(self.saved.lock().unwrap().clone().unwrap_or_default())
        }

        async fn save_icons(&self, icons: &IconCache) -> anyhow::Result<()> {
            if icons.len() == 1 && self.slow_first_write.load(Ordering::SeqCst) {
                tokio::time::sleep(std::time::Duration::from_millis(50)).await;
            }
            *self.saved.lock().unwrap() = Some(icons.clone());
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_second_lookup_in_window_uses_cache() {
        let probe = Arc::new(CountingProbe::default());
        let resolver = FaviconResolver::new(probe.clone());

        let first = resolver.resolve_at("https://mail.example.com/inbox", 0).await;
        let second = resolver
            .resolve_at("https://mail.example.com/sent", 60_000)
            .await;

        assert_eq!(first.as_deref(), Some("https://mail.example.com/favicon.ico"));
        assert_eq!(second, first);
        assert_eq!(probe.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_stale_entry_is_refreshed() {
        let probe = Arc::new(CountingProbe::default());
        let resolver = FaviconResolver::new(probe.clone());

        resolver.resolve_at("https://x.com", 0).await;
        resolver.resolve_at("https://x.com", FRESHNESS_WINDOW_MS).await;

        assert_eq!(probe.calls.load(Ordering::SeqCst), 2);
        let entry = resolver.cached("https://x.com").await.unwrap();
        assert_eq!(entry.fetched_at, FRESHNESS_WINDOW_MS);
    }

    #[tokio::test]
    async fn test_failed_probe_does_not_cache() {
        let probe = Arc::new(CountingProbe::default());
        probe.unreachable.store(true, Ordering::SeqCst);
        let resolver = FaviconResolver::new(probe.clone());

        assert_eq!(resolver.resolve_at("https://down.example", 0).await, None);
        assert!(resolver.cached("https://down.example").await.is_none());
        assert_eq!(resolver.resolve_at("https://down.example", 1).await, None);
        assert_eq!(probe.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_cache_is_persisted_and_warmed() {
        let icons = Arc::new(MemoryIcons::default());
        let probe = Arc::new(CountingProbe::default());
        let resolver = FaviconResolver::new(probe.clone()).with_repository(icons.clone());
        resolver.resolve_at("http://localhost:8080/a", 5).await;

        let saved = icons.saved.lock().unwrap().clone().unwrap();
        assert_eq!(saved["http://localhost:8080"].fetched_at, 5);

        let restarted = FaviconResolver::new(probe.clone()).with_repository(icons);
        restarted.warm().await;
        restarted.resolve_at("http://localhost:8080/b", 10).await;
        assert_eq!(probe.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_concurrent_origins_are_all_persisted() {
        let icons = Arc::new(MemoryIcons::default());
        icons.slow_first_write.store(true, Ordering::SeqCst);
        let resolver =
            FaviconResolver::new(Arc::new(CountingProbe::default())).with_repository(icons.clone());

        let (a, b) = tokio::join!(
            resolver.resolve_at("http://a.lan/", 0),
            resolver.resolve_at("http://b.lan/", 0)
        );
        assert!(a.is_some() && b.is_some());

        let saved = icons.saved.lock().unwrap().clone().unwrap();
        assert!(saved.contains_key("http://a.lan"));
        assert!(saved.contains_key("http://b.lan"));
    }

    #[tokio::test]
    async fn test_unparseable_url_resolves_nothing() {
        let probe = Arc::new(CountingProbe::default());
        let resolver = FaviconResolver::new(probe.clone());
        assert_eq!(resolver.resolve_at("http://", 0).await, None);
        assert_eq!(probe.calls.load(Ordering::SeqCst), 0);
    }
}
