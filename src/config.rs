use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub server: ServerConfig,

    pub auth: AuthConfig,

    pub llm: LlmConfig,

    pub embedding: EmbeddingConfig,

    pub vector: VectorConfig,

    pub ingest: IngestConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            server: ServerConfig::default(),
            auth: AuthConfig::default(),
            llm: LlmConfig::default(),
            embedding: EmbeddingConfig::default(),
            vector: VectorConfig::default(),
            ingest: IngestConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub database_path: String,

    pub log_level: String,

    /// Number of tokio worker threads (default: 2)
    /// Set to 0 to use the number of CPU cores
    pub worker_threads: usize,

    /// Maximum database connections (default: 5)
    pub max_db_connections: u32,

    /// Minimum database connections (default: 1)
    pub min_db_connections: u32,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            database_path: "sqlite:data/portrait.db".to_string(),
            log_level: "info".to_string(),
            worker_threads: 2,
            max_db_connections: 5,
            min_db_connections: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,

    pub port: u16,

    pub cors_allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8003,
            cors_allowed_origins: vec!["*".to_string()],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Process-wide token signing secret. Must be set before startup;
    /// an empty secret is a fatal configuration error, not a per-call one.
    pub secret_key: String,

    /// Signing algorithm name. Only HS256 is supported.
    pub algorithm: String,

    /// Access token lifetime in minutes (default: 15)
    pub access_token_expire_minutes: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            secret_key: String::new(),
            algorithm: "HS256".to_string(),
            access_token_expire_minutes: 15,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub enabled: bool,

    pub model: String,

    /// Deployment flavour: "network", "ollama" or "vllm". A network
    /// deployment requires an API key; the local flavours do not.
    pub deployment_type: String,

    pub base_url: String,

    pub api_key: String,

    pub temperature: f32,

    pub max_tokens: u32,

    /// Request timeout in seconds (default: 60)
    pub request_timeout_seconds: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            model: "qwen3:32b".to_string(),
            deployment_type: "ollama".to_string(),
            base_url: "http://localhost:11434/v1".to_string(),
            api_key: String::new(),
            temperature: 0.5,
            max_tokens: 4096,
            request_timeout_seconds: 60,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub model: String,

    pub base_url: String,

    pub api_key: String,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model: "bge-m3".to_string(),
            base_url: "http://localhost:11434/v1".to_string(),
            api_key: String::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorConfig {
    pub enabled: bool,

    pub base_url: String,

    pub username: String,

    pub password: String,

    pub db_name: String,

    pub collection_name: String,
}

impl Default for VectorConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            base_url: "http://localhost:19530".to_string(),
            username: String::new(),
            password: String::new(),
            db_name: "default".to_string(),
            collection_name: "portrait_docs".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Chunk window in words (default: 1000)
    pub chunk_size: usize,

    /// Overlap between consecutive chunks in words (default: 200)
    pub chunk_overlap: usize,

    /// Default number of hits returned by similarity search
    pub top_k: usize,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 200,
            top_k: 4,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let paths = Self::config_paths();

        for path in &paths {
            if path.exists() {
                info!("Loading config from: {}", path.display());
                return Self::load_from_path(path);
            }
        }

        info!("No config file found, using defaults");
        Ok(Self::default())
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    fn config_paths() -> Vec<PathBuf> {
        vec![
            PathBuf::from("config.toml"),
            PathBuf::from("config/config.toml"),
        ]
    }

    pub fn validate(&self) -> Result<()> {
        if self.auth.secret_key.is_empty() {
            anyhow::bail!("auth.secret_key must be set before startup");
        }

        if self.auth.algorithm != "HS256" {
            anyhow::bail!(
                "Unsupported signing algorithm '{}' (only HS256)",
                self.auth.algorithm
            );
        }

        if self.auth.access_token_expire_minutes <= 0 {
            anyhow::bail!("auth.access_token_expire_minutes must be > 0");
        }

        if self.ingest.chunk_overlap >= self.ingest.chunk_size {
            anyhow::bail!("ingest.chunk_overlap must be smaller than ingest.chunk_size");
        }

        if self.vector.enabled && self.vector.base_url.is_empty() {
            anyhow::bail!("vector.base_url cannot be empty when enabled");
        }

        if self.llm.enabled
            && self.llm.deployment_type == "network"
            && self.llm.api_key.is_empty()
        {
            anyhow::bail!("llm.api_key is required for a network deployment");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> Config {
        let mut config = Config::default();
        config.auth.secret_key = "unit-test-secret-key-32-chars-ok".to_string();
        config
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.port, 8003);
        assert_eq!(config.auth.access_token_expire_minutes, 15);
        assert_eq!(config.ingest.chunk_size, 1000);
        assert!(!config.vector.enabled);
    }

    #[test]
    fn test_config_deserialization() {
        let toml_str = r#"
            [general]
            log_level = "debug"

            [auth]
            secret_key = "file-secret"
            access_token_expire_minutes = 30
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.log_level, "debug");
        assert_eq!(config.auth.access_token_expire_minutes, 30);

        assert_eq!(config.server.port, 8003);
    }

    #[test]
    fn test_validate_requires_secret() {
        let config = Config::default();
        assert!(config.validate().is_err());

        let config = valid_config();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_unknown_algorithm() {
        let mut config = valid_config();
        config.auth.algorithm = "RS256".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_chunking() {
        let mut config = valid_config();
        config.ingest.chunk_size = 100;
        config.ingest.chunk_overlap = 100;
        assert!(config.validate().is_err());
    }
}
