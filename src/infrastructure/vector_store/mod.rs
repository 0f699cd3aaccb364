mod in_memory;
mod local;
mod provider;
mod qdrant;

pub use in_memory::InMemoryVectorStore;
pub use local::{LocalVectorStore, INDEX_FILE};
pub use provider::{
    provider_from_config, LocalStoreProvider, MemoryStoreProvider, QdrantStoreProvider,
};
pub use qdrant::QdrantVectorStore;

use crate::domain::{DocumentChunk, Embedding, SearchResult};

/// Scores every entry against `query` and keeps the `top_k` best, highest
/// first. Ties keep insertion order.
pub(crate) fn rank_by_similarity<'a>(
    entries: impl Iterator<Item = (&'a DocumentChunk, &'a Embedding)>,
    query: &Embedding,
    top_k: usize,
) -> Vec<SearchResult> {
    let mut results: Vec<SearchResult> = entries
        .map(|(chunk, embedding)| SearchResult {
            chunk: chunk.clone(),
            score: query.cosine_similarity(embedding),
        })
        .collect();

    results.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    results.truncate(top_k);
    results
}
