mod document_loader;
mod embedding;
mod llm;
mod source_store;
mod vector_store;

pub use document_loader::{DirectoryLoader, DocumentLoader};
pub use embedding::EmbeddingService;
pub use llm::LlmService;
pub use source_store::SourceStore;
pub use vector_store::{VectorStore, VectorStoreProvider};
