use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use docqa::bootstrap;
use docqa::domain::ports::EmbeddingService;
use docqa::infrastructure::{AppConfig, OllamaEmbedding};

/// Ingests everything in the data directory into the configured vector store
/// and exits.
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "docqa=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;
    bootstrap::export_ollama_url(&config);

    let embedding: Arc<dyn EmbeddingService> =
        Arc::new(OllamaEmbedding::new(config.model.embedding_model()));
    let ingestion = bootstrap::ingestion_service(&config, embedding)?;
    let store = bootstrap::vector_stores(&config)
        .open()
        .await
        .context("failed to open the vector store")?;

    let report = ingestion
        .ingest_directory(&config.paths.data, store)
        .await
        .with_context(|| format!("failed to ingest {}", config.paths.data.display()))?;

    info!(
        files = report.files,
        documents = report.documents,
        chunks = report.chunks,
        "documents processed and stored"
    );
    Ok(())
}
