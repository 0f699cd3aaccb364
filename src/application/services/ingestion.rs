use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use tracing::{info, instrument};

use super::RagService;
use crate::domain::{
    ports::{DirectoryLoader, EmbeddingService, VectorStore},
    DomainError, TextSplitter,
};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    pub files: usize,
    pub documents: usize,
    pub chunks: usize,
}

/// Load → split → embed → persist over a whole directory.
pub struct IngestionService {
    loader: Arc<dyn DirectoryLoader>,
    splitter: TextSplitter,
    embedding: Arc<dyn EmbeddingService>,
}

impl IngestionService {
    pub fn new(
        loader: Arc<dyn DirectoryLoader>,
        splitter: TextSplitter,
        embedding: Arc<dyn EmbeddingService>,
    ) -> Self {
        Self {
            loader,
            splitter,
            embedding,
        }
    }

    pub fn supports(&self, path: &Path) -> bool {
        self.loader.supports(path)
    }

    /// Re-ingests every file in `dir`. Files already indexed are indexed
    /// again; nothing is deduplicated.
    #[instrument(skip(self, store), fields(dir = %dir.display()))]
    pub async fn ingest_directory(
        &self,
        dir: &Path,
        store: Arc<dyn VectorStore>,
    ) -> Result<IngestReport, DomainError> {
        let documents = self.loader.load_directory(dir).await?;
        let chunks = self.splitter.split_documents(&documents);

        let rag = RagService::new(self.embedding.clone(), store, 0);
        rag.index_chunks(&chunks).await?;

        let report = IngestReport {
            files: documents
                .iter()
                .map(|d| d.metadata.source.as_str())
                .collect::<BTreeSet<_>>()
                .len(),
            documents: documents.len(),
            chunks: chunks.len(),
        };
        info!(
            files = report.files,
            documents = report.documents,
            chunks = report.chunks,
            "ingestion complete"
        );
        Ok(report)
    }
}
