pub mod embedding;
pub mod llm;
pub mod vector;

pub use embedding::EmbeddingClient;
pub use llm::LlmClient;
pub use vector::VectorClient;
