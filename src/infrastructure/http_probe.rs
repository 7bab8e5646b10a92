// HTTP favicon probe
use crate::application::state_repository::FaviconProbe;
use anyhow::{Context, Result};
use async_trait::async_trait;

/// Any HTTP response counts as reachable; only transport failures are errors.
#[derive(Debug, Clone, Default)]
pub struct HttpFaviconProbe {
    client: reqwest::Client,
}

impl HttpFaviconProbe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl FaviconProbe for HttpFaviconProbe {
    async fn probe(&self, icon_url: &str) -> Result<()> {
        let response = self
            .client
            .get(icon_url)
            .send()
            .await
            .with_context(|| format!("Failed to reach {}", icon_url))?;

        tracing::debug!(icon_url, status = %response.status(), "Favicon probe answered");
        Ok(())
    }
}
