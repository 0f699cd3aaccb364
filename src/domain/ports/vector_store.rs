use std::sync::Arc;

use crate::domain::{errors::DomainError, DocumentChunk, Embedding, SearchResult};
use async_trait::async_trait;

/// Append-only similarity index over embedded chunks.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Persists a batch. Either the whole batch is stored or none of it is.
    async fn add(&self, entries: &[(DocumentChunk, Embedding)]) -> Result<(), DomainError>;

    /// Best matches first. An empty store yields an empty list.
    async fn search(&self, query: &Embedding, top_k: usize)
        -> Result<Vec<SearchResult>, DomainError>;

    async fn len(&self) -> Result<usize, DomainError>;
}

/// Opens handles over the configured index. Every ingestion writes through a
/// freshly opened handle, and readers are rebuilt from a new one afterwards.
#[async_trait]
pub trait VectorStoreProvider: Send + Sync {
    async fn open(&self) -> Result<Arc<dyn VectorStore>, DomainError>;
}
