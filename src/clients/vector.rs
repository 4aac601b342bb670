use anyhow::{Context, Result, bail};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info};

use crate::config::VectorConfig;

/// REST client for a Milvus-style vector database.
///
/// Holds connection settings only; every call is a stateless HTTP round-trip
/// against the `/v2/vectordb` surface. Constructed once at startup and
/// injected rather than held as process-global state.
#[derive(Clone)]
pub struct VectorClient {
    client: Client,
    config: VectorConfig,
}

/// One document chunk with its vector, as stored in a collection.
#[derive(Debug, Clone, Serialize)]
pub struct VectorRecord {
    pub id: String,
    pub text: String,
    pub source: String,
    pub vector: Vec<f32>,
}

/// A similarity-search hit: stored text plus its distance to the query.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchHit {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub distance: f32,
}

#[derive(Debug, Deserialize)]
struct MilvusResponse<T> {
    code: i32,
    #[serde(default)]
    message: Option<String>,
    data: Option<T>,
}

impl VectorClient {
    #[must_use]
    pub fn with_shared_client(client: Client, config: VectorConfig) -> Self {
        Self { client, config }
    }

    #[must_use]
    pub fn collection_name(&self) -> &str {
        &self.config.collection_name
    }

    async fn post<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: serde_json::Value,
    ) -> Result<Option<T>> {
        let url = format!("{}/v2/vectordb{}", self.config.base_url, path);

        let mut request = self.client.post(&url).json(&body);
        if !self.config.username.is_empty() {
            request = request.bearer_auth(format!(
                "{}:{}",
                self.config.username, self.config.password
            ));
        }

        let response = request.send().await.context("Vector store request failed")?;

        if !response.status().is_success() {
            bail!("Vector store returned status {}", response.status());
        }

        let parsed: MilvusResponse<T> = response
            .json()
            .await
            .context("Failed to parse vector store response")?;

        if parsed.code != 0 {
            bail!(
                "Vector store error {}: {}",
                parsed.code,
                parsed.message.unwrap_or_default()
            );
        }

        Ok(parsed.data)
    }

    /// Inserts a batch of records into the configured collection.
    pub async fn insert(&self, records: &[VectorRecord]) -> Result<usize> {
        if records.is_empty() {
            return Ok(0);
        }

        let body = json!({
            "dbName": self.config.db_name,
            "collectionName": self.config.collection_name,
            "data": records,
        });

        self.post::<serde_json::Value>("/entities/insert", body)
            .await?;

        info!(
            "Inserted {} vectors into collection {}",
            records.len(),
            self.config.collection_name
        );
        Ok(records.len())
    }

    /// Top-k similarity search against the configured collection.
    pub async fn search(&self, vector: &[f32], limit: usize) -> Result<Vec<SearchHit>> {
        let body = json!({
            "dbName": self.config.db_name,
            "collectionName": self.config.collection_name,
            "data": [vector],
            "limit": limit,
            "outputFields": ["text", "source"],
        });

        debug!(
            "Similarity search (k={}) on collection {}",
            limit, self.config.collection_name
        );

        let hits: Option<Vec<SearchHit>> = self.post("/entities/search", body).await?;
        Ok(hits.unwrap_or_default())
    }

    /// Deletes records matching a Milvus filter expression.
    pub async fn delete(&self, filter: &str) -> Result<()> {
        let body = json!({
            "dbName": self.config.db_name,
            "collectionName": self.config.collection_name,
            "filter": filter,
        });

        self.post::<serde_json::Value>("/entities/delete", body)
            .await?;

        info!(
            "Deleted vectors matching '{}' from collection {}",
            filter, self.config.collection_name
        );
        Ok(())
    }
}
