use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;
use tracing::{debug, info};

use super::rank_by_similarity;
use crate::domain::{ports::VectorStore, DocumentChunk, DomainError, Embedding, SearchResult};

pub const INDEX_FILE: &str = "index.jsonl";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredEntry {
    chunk: DocumentChunk,
    embedding: Embedding,
}

/// Brute-force index persisted as JSON lines under a directory. The whole
/// file is loaded on open; each batch is appended with a single write.
pub struct LocalVectorStore {
    path: PathBuf,
    entries: RwLock<Vec<StoredEntry>>,
}

impl LocalVectorStore {
    pub async fn open(dir: &Path) -> Result<Self, DomainError> {
        tokio::fs::create_dir_all(dir).await?;
        let path = dir.join(INDEX_FILE);

        let entries = match tokio::fs::read_to_string(&path).await {
            Ok(content) => parse_entries(&content, &path)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };

        info!(path = %path.display(), entries = entries.len(), "opened local vector store");
        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }
}

fn parse_entries(content: &str, path: &Path) -> Result<Vec<StoredEntry>, DomainError> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            serde_json::from_str(line).map_err(|e| {
                DomainError::parse(format!("{}:{}: {e}", path.display(), i + 1))
            })
        })
        .collect()
}

#[async_trait]
impl VectorStore for LocalVectorStore {
    async fn add(&self, entries: &[(DocumentChunk, Embedding)]) -> Result<(), DomainError> {
        if entries.is_empty() {
            return Ok(());
        }

        let stored: Vec<StoredEntry> = entries
            .iter()
            .map(|(chunk, embedding)| StoredEntry {
                chunk: chunk.clone(),
                embedding: embedding.clone(),
            })
            .collect();

        let mut buf = String::new();
        for entry in &stored {
            let line = serde_json::to_string(entry)
                .map_err(|e| DomainError::internal(format!("failed to encode entry: {e}")))?;
            buf.push_str(&line);
            buf.push('\n');
        }

        let mut guard = self.entries.write().await;

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(buf.as_bytes()).await?;
        file.flush().await?;

        debug!(count = stored.len(), path = %self.path.display(), "appended entries");
        guard.extend(stored);
        Ok(())
    }

    async fn search(
        &self,
        query: &Embedding,
        top_k: usize,
    ) -> Result<Vec<SearchResult>, DomainError> {
        let entries = self.entries.read().await;
        Ok(rank_by_similarity(
            entries.iter().map(|e| (&e.chunk, &e.embedding)),
            query,
            top_k,
        ))
    }

    async fn len(&self) -> Result<usize, DomainError> {
        Ok(self.entries.read().await.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Document, SourceMetadata};

    fn entry(text: &str, vector: Vec<f32>) -> (DocumentChunk, Embedding) {
        let doc = Document::new(
            text,
            SourceMetadata::new("data/report.pdf", "application/pdf").with_page(2),
        );
        (DocumentChunk::new(&doc, text, 0), Embedding::new(vector))
    }

    #[tokio::test]
    async fn test_entries_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();

        let store = LocalVectorStore::open(dir.path()).await.unwrap();
        store
            .add(&[entry("alpha", vec![1.0, 0.0]), entry("beta", vec![0.0, 1.0])])
            .await
            .unwrap();
        drop(store);

        let reopened = LocalVectorStore::open(dir.path()).await.unwrap();
        assert_eq!(reopened.len().await.unwrap(), 2);

        let results = reopened
            .search(&Embedding::new(vec![0.0, 1.0]), 1)
            .await
            .unwrap();
        assert_eq!(results[0].chunk.content, "beta");
        assert_eq!(results[0].chunk.metadata.page, Some(2));
        assert!((results[0].score - 1.0).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_fresh_directory_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalVectorStore::open(&dir.path().join("index")).await.unwrap();

        assert_eq!(store.len().await.unwrap(), 0);
        assert!(store
            .search(&Embedding::new(vec![1.0]), 4)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_handles_do_not_share_memory() {
        let dir = tempfile::tempdir().unwrap();
        let reader = LocalVectorStore::open(dir.path()).await.unwrap();
        let writer = LocalVectorStore::open(dir.path()).await.unwrap();

        writer.add(&[entry("new", vec![1.0])]).await.unwrap();

        assert_eq!(reader.len().await.unwrap(), 0);
        let rebuilt = LocalVectorStore::open(dir.path()).await.unwrap();
        assert_eq!(rebuilt.len().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_corrupt_index_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(INDEX_FILE), "{not json}\n").unwrap();

        let err = LocalVectorStore::open(dir.path()).await.err().unwrap();
        assert!(matches!(err, DomainError::Parse(_)));
    }
}
