// Favicon domain model - origins, cache entries and the fallback glyph
use super::dashboard::normalize_url;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 24 hours.
pub const FRESHNESS_WINDOW_MS: i64 = 86_400_000;

/// Cached icon for one origin, stored under the origin key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaviconEntry {
    pub icon_url: String,
    pub fetched_at: i64,
}

impl FaviconEntry {
    /// Entries stamped in the future, e.g. by a skewed clock, are stale.
    pub fn is_fresh(&self, now_ms: i64, window_ms: i64) -> bool {
        let age = now_ms.saturating_sub(self.fetched_at);
        (0..window_ms).contains(&age)
    }
}

/// `origin -> entry`, the shape persisted under the icon cache key.
pub type IconCache = HashMap<String, FaviconEntry>;

/// Scheme, host and port of a page url. Scheme-relative urls are read as `http:`.
pub fn origin_of(page_url: &str) -> Option<String> {
    let page_url = page_url.trim();
    let absolute = if page_url.starts_with("//") {
        format!("http:{}", page_url)
    } else {
        normalize_url(page_url)
    };

    let origin = Url::parse(&absolute).ok()?.origin();
    origin.is_tuple().then(|| origin.ascii_serialization())
}

pub fn icon_url_for(origin: &str) -> String {
    format!("{}/favicon.ico", origin)
}

/// Uppercased first character of a display name, shown when no icon resolves.
pub fn fallback_glyph(name: &str) -> String {
    name.trim()
        .chars()
        .next()
        .map(|c| c.to_uppercase().collect())
        .unwrap_or_else(|| "?".to_string())
}
