//! Retrieval-augmented content ingestion.
//!
//! Web page → plain text → overlapping word-window chunks → embeddings →
//! vector store. The ask path runs the same pipeline in reverse: embed the
//! question, pull the nearest chunks and hand them to the LLM as context.

use anyhow::Result;
use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::clients::llm::ChatMessage;
use crate::clients::vector::VectorRecord;
use crate::clients::{EmbeddingClient, LlmClient, VectorClient};

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("向量数据库未启用")]
    VectorDisabled,

    #[error("大模型未启用")]
    LlmDisabled,

    #[error("Failed to fetch url: {0}")]
    Fetch(String),

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Milvus insert error: {0}")]
    VectorInsert(String),

    #[error("Milvus similarity_search error: {0}")]
    VectorSearch(String),

    #[error("LLM error: {0}")]
    Llm(String),
}

impl IngestError {
    /// Taxonomy code carried in the error envelope.
    #[must_use]
    pub const fn code(&self) -> u16 {
        match self {
            Self::VectorDisabled | Self::VectorInsert(_) => 501,
            Self::VectorSearch(_) => 502,
            Self::LlmDisabled | Self::Llm(_) => 505,
            Self::Fetch(_) | Self::Embedding(_) => 999,
        }
    }
}

/// Splits text into overlapping word windows.
pub struct TextChunker {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl TextChunker {
    #[must_use]
    pub const fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self {
            chunk_size,
            chunk_overlap,
        }
    }

    #[must_use]
    pub fn chunk(&self, text: &str) -> Vec<String> {
        let words: Vec<&str> = text.split_whitespace().collect();
        if words.is_empty() {
            return Vec::new();
        }

        let step = self.chunk_size.saturating_sub(self.chunk_overlap).max(1);
        let mut chunks = Vec::new();

        for i in (0..words.len()).step_by(step) {
            let end = (i + self.chunk_size).min(words.len());
            chunks.push(words[i..end].join(" "));
            if end == words.len() {
                break;
            }
        }

        chunks
    }
}

#[derive(Debug, Serialize)]
pub struct AskResult {
    pub answer: String,
    pub sources: Vec<String>,
}

pub struct IngestService {
    http: reqwest::Client,
    embeddings: EmbeddingClient,
    vector: Option<VectorClient>,
    llm: Option<LlmClient>,
    chunker: TextChunker,
    top_k: usize,
}

impl IngestService {
    #[must_use]
    pub fn new(
        http: reqwest::Client,
        embeddings: EmbeddingClient,
        vector: Option<VectorClient>,
        llm: Option<LlmClient>,
        chunker: TextChunker,
        top_k: usize,
    ) -> Self {
        Self {
            http,
            embeddings,
            vector,
            llm,
            chunker,
            top_k,
        }
    }

    fn vector(&self) -> Result<&VectorClient, IngestError> {
        self.vector.as_ref().ok_or(IngestError::VectorDisabled)
    }

    /// Fetches a web page, chunks its text content and stores the embedded
    /// chunks. Returns the number of chunks inserted.
    pub async fn ingest_url(&self, url: &str) -> Result<usize, IngestError> {
        let vector = self.vector()?;

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| IngestError::Fetch(e.to_string()))?;

        if !response.status().is_success() {
            return Err(IngestError::Fetch(format!(
                "{} returned status {}",
                url,
                response.status()
            )));
        }

        let html = response
            .text()
            .await
            .map_err(|e| IngestError::Fetch(e.to_string()))?;

        let text = html2text::from_read(html.as_bytes(), 120)
            .map_err(|e| IngestError::Fetch(e.to_string()))?;

        let chunks = self.chunker.chunk(&text);
        if chunks.is_empty() {
            info!("No text content extracted from {}", url);
            return Ok(0);
        }

        let vectors = self
            .embeddings
            .embed(&chunks)
            .await
            .map_err(|e| IngestError::Embedding(e.to_string()))?;

        let records: Vec<VectorRecord> = chunks
            .into_iter()
            .zip(vectors)
            .map(|(text, vector)| VectorRecord {
                id: uuid::Uuid::new_v4().to_string(),
                text,
                source: url.to_string(),
                vector,
            })
            .collect();

        let inserted = vector
            .insert(&records)
            .await
            .map_err(|e| IngestError::VectorInsert(e.to_string()))?;

        info!("Ingested {} chunks from {}", inserted, url);
        Ok(inserted)
    }

    /// Answers a question from the ingested content: nearest chunks become
    /// the context of a single chat completion.
    pub async fn ask(&self, question: &str, top_k: Option<usize>) -> Result<AskResult, IngestError> {
        let vector = self.vector()?;
        let llm = self.llm.as_ref().ok_or(IngestError::LlmDisabled)?;

        let query_vector = self
            .embeddings
            .embed_one(question)
            .await
            .map_err(|e| IngestError::Embedding(e.to_string()))?;

        let hits = vector
            .search(&query_vector, top_k.unwrap_or(self.top_k))
            .await
            .map_err(|e| IngestError::VectorSearch(e.to_string()))?;

        let context = hits
            .iter()
            .map(|hit| hit.text.as_str())
            .collect::<Vec<_>>()
            .join("\n---\n");

        let mut sources: Vec<String> = hits
            .iter()
            .map(|hit| hit.source.clone())
            .filter(|s| !s.is_empty())
            .collect();
        sources.dedup();

        let messages = [
            ChatMessage::system(
                "You answer questions using only the provided context. \
                 If the context does not contain the answer, say so.",
            ),
            ChatMessage::user(format!("Context:\n{context}\n\nQuestion: {question}")),
        ];

        let answer = llm
            .chat(&messages)
            .await
            .map_err(|e| IngestError::Llm(e.to_string()))?;

        Ok(AskResult { answer, sources })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunker_splits_with_overlap() {
        let chunker = TextChunker::new(4, 2);
        let text = "one two three four five six seven eight";

        let chunks = chunker.chunk(text);
        assert_eq!(chunks[0], "one two three four");
        assert_eq!(chunks[1], "three four five six");
        assert_eq!(chunks.last().unwrap(), "seven eight");
    }

    #[test]
    fn test_chunker_short_input_single_chunk() {
        let chunker = TextChunker::new(100, 20);
        let chunks = chunker.chunk("just a few words");
        assert_eq!(chunks, vec!["just a few words".to_string()]);
    }

    #[test]
    fn test_chunker_empty_input() {
        let chunker = TextChunker::new(100, 20);
        assert!(chunker.chunk("   ").is_empty());
    }

    #[test]
    fn test_chunker_degenerate_overlap_still_advances() {
        let chunker = TextChunker::new(2, 2);
        let chunks = chunker.chunk("a b c d");
        assert!(chunks.len() <= 4, "step must advance even when overlap == size");
        assert_eq!(chunks[0], "a b");
    }

    #[test]
    fn test_ingest_error_codes() {
        assert_eq!(IngestError::VectorDisabled.code(), 501);
        assert_eq!(IngestError::VectorSearch(String::new()).code(), 502);
        assert_eq!(IngestError::LlmDisabled.code(), 505);
    }
}
