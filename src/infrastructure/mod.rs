pub mod config;
pub mod embedding;
pub mod llm;
pub mod loader;
pub mod source_store;
pub mod vector_store;

pub use config::{AppConfig, ConflictPolicy, VectorBackend};
pub use embedding::OllamaEmbedding;
pub use llm::OllamaLlm;
pub use loader::{LoaderRegistry, PdfLoader, TextLoader};
pub use source_store::FsSourceStore;
pub use vector_store::{
    provider_from_config, InMemoryVectorStore, LocalVectorStore, MemoryStoreProvider,
    QdrantVectorStore,
};
