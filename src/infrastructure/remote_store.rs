// Remote-synced store - whole document exchanged with a persistence service
use crate::application::state_repository::StateRepository;
use crate::domain::dashboard::Document;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::StatusCode;

#[derive(Debug, Clone)]
pub struct RemoteStore {
    endpoint: String,
    client: reqwest::Client,
}

impl RemoteStore {
    /// `endpoint` is the document url, e.g. `http://localhost:8003/api/state`.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            client: reqwest::Client::new(),
        }
    }

    pub fn with_client(endpoint: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            endpoint: endpoint.into(),
            client,
        }
    }
}

#[async_trait]
impl<D: Document> StateRepository<D> for RemoteStore {
    async fn load(&self) -> Result<Option<D>> {
        let response = self
            .client
            .get(&self.endpoint)
            .header("Accept", "application/json")
            .send()
            .await
            .context("Failed to send request to persistence service")?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Persistence service load failed with status {}: {}", status, body);
        }

        let state = response
            .json::<D>()
            .await
            .context("Failed to parse persistence service document")?;

        Ok(Some(state))
    }

    async fn save(&self, state: &D) -> Result<()> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(state)
            .send()
            .await
            .context("Failed to send document to persistence service")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Persistence service rejected document with status {}: {}", status, body);
        }

        tracing::debug!(endpoint = %self.endpoint, "Document synced");
        Ok(())
    }
}
