use anyhow::{Context, Result, bail};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use crate::config::EmbeddingConfig;

/// Embedding client for an OpenAI-compatible `/embeddings` endpoint.
#[derive(Clone)]
pub struct EmbeddingClient {
    client: Client,
    config: EmbeddingConfig,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingItem>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingItem {
    embedding: Vec<f32>,
}

impl EmbeddingClient {
    #[must_use]
    pub fn with_shared_client(client: Client, config: EmbeddingConfig) -> Self {
        Self { client, config }
    }

    /// Embeds a batch of texts, preserving input order.
    pub async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let url = format!("{}/embeddings", self.config.base_url);

        let body = json!({
            "model": self.config.model,
            "input": texts,
        });

        let mut request = self.client.post(&url).json(&body);
        if !self.config.api_key.is_empty() {
            request = request.bearer_auth(&self.config.api_key);
        }

        let response = request.send().await.context("Embedding request failed")?;

        if !response.status().is_success() {
            bail!("Embedding endpoint returned status {}", response.status());
        }

        let parsed: EmbeddingResponse = response
            .json()
            .await
            .context("Failed to parse embedding response")?;

        if parsed.data.len() != texts.len() {
            bail!(
                "Embedding count mismatch: sent {} texts, got {} vectors",
                texts.len(),
                parsed.data.len()
            );
        }

        Ok(parsed.data.into_iter().map(|item| item.embedding).collect())
    }

    /// Embeds a single query string.
    pub async fn embed_one(&self, text: &str) -> Result<Vec<f32>> {
        let mut vectors = self.embed(&[text.to_string()]).await?;
        vectors
            .pop()
            .context("Embedding endpoint returned no vector")
    }
}
