//! Wires configuration into the application services.

use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use crate::application::{IngestionService, Workspace, WorkspaceSettings};
use crate::domain::{
    ports::{EmbeddingService, VectorStoreProvider},
    TextSplitter,
};
use crate::infrastructure::{
    provider_from_config, AppConfig, FsSourceStore, LoaderRegistry, OllamaEmbedding, OllamaLlm,
};

const OLLAMA_URL_VAR: &str = "OLLAMA_API_BASE_URL";

/// Points the Ollama client at `model.base_url` unless the environment
/// already names an endpoint. Call before any model client is built.
pub fn export_ollama_url(config: &AppConfig) {
    if std::env::var_os(OLLAMA_URL_VAR).is_none() {
        std::env::set_var(OLLAMA_URL_VAR, &config.model.base_url);
    }
}

pub fn vector_stores(config: &AppConfig) -> Arc<dyn VectorStoreProvider> {
    provider_from_config(&config.vector_store, &config.paths.vector_store)
}

pub fn ingestion_service(
    config: &AppConfig,
    embedding: Arc<dyn EmbeddingService>,
) -> anyhow::Result<IngestionService> {
    let splitter = TextSplitter::new(config.chunking).context("invalid chunking settings")?;
    Ok(IngestionService::new(
        Arc::new(LoaderRegistry::default()),
        splitter,
        embedding,
    ))
}

pub async fn build_workspace(config: &AppConfig) -> anyhow::Result<Workspace> {
    let embedding: Arc<dyn EmbeddingService> =
        Arc::new(OllamaEmbedding::new(config.model.embedding_model()));
    let llm = Arc::new(OllamaLlm::new(&config.model.name));

    let workspace = Workspace::open(
        Arc::new(FsSourceStore::new(&config.paths.data, config.upload.on_conflict)),
        ingestion_service(config, embedding.clone())?,
        vector_stores(config),
        embedding,
        llm,
        WorkspaceSettings {
            top_k: config.rag.top_k,
            prompt_template: config.prompts.answer.clone(),
            format: config.answer.format,
        },
    )
    .await
    .context("failed to open the vector store")?;

    info!(
        model = %config.model.name,
        embedding_model = %config.model.embedding_model(),
        backend = ?config.vector_store.backend,
        "workspace ready"
    );
    Ok(workspace)
}
