use std::sync::Arc;

use crate::auth::TokenService;
use crate::clients::{EmbeddingClient, LlmClient, VectorClient};
use crate::config::Config;
use crate::db::Store;
use crate::services::{
    AuthService, IngestService, SeaOrmAuthService, SeaOrmUserService, TextChunker, UserService,
};

/// Build a shared HTTP client with reasonable defaults for API calls.
/// This client is reused across all HTTP-based clients to enable
/// connection pooling and avoid socket exhaustion.
fn build_shared_http_client(timeout_seconds: u64) -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_seconds))
        .user_agent("Portrait/1.0")
        .pool_max_idle_per_host(10)
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build shared HTTP client: {e}"))
}

/// Explicitly constructed process state. Every external client lives here and
/// is injected into handlers; nothing is a class-level or global singleton.
pub struct SharedState {
    pub config: Config,

    pub store: Store,

    pub auth: Arc<dyn AuthService>,

    pub users: Arc<dyn UserService>,

    pub ingest: Arc<IngestService>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        let http_client = build_shared_http_client(config.llm.request_timeout_seconds)?;

        let embeddings =
            EmbeddingClient::with_shared_client(http_client.clone(), config.embedding.clone());

        let vector = config
            .vector
            .enabled
            .then(|| VectorClient::with_shared_client(http_client.clone(), config.vector.clone()));

        let llm = config
            .llm
            .enabled
            .then(|| LlmClient::with_shared_client(http_client.clone(), config.llm.clone()));

        let tokens = TokenService::new(
            config.auth.secret_key.clone(),
            config.auth.access_token_expire_minutes,
        );

        let auth = Arc::new(SeaOrmAuthService::new(store.clone(), tokens))
            as Arc<dyn AuthService + Send + Sync + 'static>;

        let users = Arc::new(SeaOrmUserService::new(store.clone()))
            as Arc<dyn UserService + Send + Sync + 'static>;

        let ingest = Arc::new(IngestService::new(
            http_client,
            embeddings,
            vector,
            llm,
            TextChunker::new(config.ingest.chunk_size, config.ingest.chunk_overlap),
            config.ingest.top_k,
        ));

        Ok(Self {
            config,
            store,
            auth,
            users,
            ingest,
        })
    }
}
