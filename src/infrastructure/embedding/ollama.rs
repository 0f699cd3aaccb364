use async_trait::async_trait;
use rig::client::{EmbeddingsClient, ProviderClient};
use rig::embeddings::EmbeddingModel;
use rig::providers::ollama;
use tracing::instrument;

use crate::domain::{ports::EmbeddingService, DomainError, Embedding};

/// Embeddings from a model served by Ollama. The endpoint comes from
/// `OLLAMA_API_BASE_URL`.
pub struct OllamaEmbedding {
    client: ollama::Client,
    model: String,
}

impl OllamaEmbedding {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            client: ollama::Client::from_env(),
            model: model.into(),
        }
    }
}

#[async_trait]
impl EmbeddingService for OllamaEmbedding {
    #[instrument(skip(self, text), fields(model = %self.model))]
    async fn embed(&self, text: &str) -> Result<Embedding, DomainError> {
        let model = self.client.embedding_model(&self.model);
        let embedding = model
            .embed_text(text)
            .await
            .map_err(|e| DomainError::external(format!("embedding failed: {e}")))?;

        Ok(Embedding::from(embedding.vec))
    }

    #[instrument(skip(self, texts), fields(model = %self.model, count = texts.len()))]
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>, DomainError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let model = self.client.embedding_model(&self.model);
        let embeddings = model
            .embed_texts(texts.iter().map(|t| t.to_string()))
            .await
            .map_err(|e| DomainError::external(format!("embedding failed: {e}")))?;

        if embeddings.len() != texts.len() {
            return Err(DomainError::external(format!(
                "expected {} embeddings, got {}",
                texts.len(),
                embeddings.len()
            )));
        }

        Ok(embeddings
            .into_iter()
            .map(|e| Embedding::from(e.vec))
            .collect())
    }

    fn model(&self) -> &str {
        &self.model
    }
}
