use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;

use super::{InMemoryVectorStore, LocalVectorStore, QdrantVectorStore};
use crate::domain::{
    ports::{VectorStore, VectorStoreProvider},
    DomainError,
};
use crate::infrastructure::config::{VectorBackend, VectorStoreConfig};

pub struct LocalStoreProvider {
    dir: PathBuf,
}

impl LocalStoreProvider {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl VectorStoreProvider for LocalStoreProvider {
    async fn open(&self) -> Result<Arc<dyn VectorStore>, DomainError> {
        Ok(Arc::new(LocalVectorStore::open(&self.dir).await?))
    }
}

/// Hands out the same process-local store on every open.
#[derive(Default)]
pub struct MemoryStoreProvider {
    store: Arc<InMemoryVectorStore>,
}

impl MemoryStoreProvider {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VectorStoreProvider for MemoryStoreProvider {
    async fn open(&self) -> Result<Arc<dyn VectorStore>, DomainError> {
        Ok(self.store.clone())
    }
}

pub struct QdrantStoreProvider {
    url: String,
    collection: String,
    dimension: usize,
}

impl QdrantStoreProvider {
    pub fn new(url: impl Into<String>, collection: impl Into<String>, dimension: usize) -> Self {
        Self {
            url: url.into(),
            collection: collection.into(),
            dimension,
        }
    }
}

#[async_trait]
impl VectorStoreProvider for QdrantStoreProvider {
    async fn open(&self) -> Result<Arc<dyn VectorStore>, DomainError> {
        Ok(Arc::new(
            QdrantVectorStore::new(&self.url, &self.collection, self.dimension).await?,
        ))
    }
}

pub fn provider_from_config(
    config: &VectorStoreConfig,
    local_dir: impl Into<PathBuf>,
) -> Arc<dyn VectorStoreProvider> {
    match config.backend {
        VectorBackend::Local => Arc::new(LocalStoreProvider::new(local_dir)),
        VectorBackend::Memory => Arc::new(MemoryStoreProvider::new()),
        VectorBackend::Qdrant => Arc::new(QdrantStoreProvider::new(
            &config.qdrant_url,
            &config.collection,
            config.dimension,
        )),
    }
}
