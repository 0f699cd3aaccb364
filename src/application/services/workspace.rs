use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use tracing::{info, instrument};

use super::{IngestReport, IngestionService, QaService, RagService};
use crate::domain::{
    ports::{EmbeddingService, LlmService, SourceStore, VectorStoreProvider},
    Answer, AnswerFormat, Conversation, DomainError, SearchResult,
};

#[derive(Debug, Clone)]
pub struct WorkspaceSettings {
    pub top_k: usize,
    pub prompt_template: String,
    pub format: AnswerFormat,
}

#[derive(Debug, Clone, Serialize)]
pub struct Reply {
    pub answer: Answer,
    pub formatted: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct UploadOutcome {
    pub path: PathBuf,
    pub report: IngestReport,
}

/// The single user session: uploaded files, the answerer built over the
/// current index, and the conversation so far.
///
/// The answerer holds a store handle opened before the last ingestion, so it
/// is rebuilt from a fresh handle every time the index changes.
pub struct Workspace {
    sources: Arc<dyn SourceStore>,
    ingestion: IngestionService,
    stores: Arc<dyn VectorStoreProvider>,
    embedding: Arc<dyn EmbeddingService>,
    llm: Arc<dyn LlmService>,
    settings: WorkspaceSettings,
    qa: QaService,
    conversation: Conversation,
    notice: Option<String>,
}

impl Workspace {
    pub async fn open(
        sources: Arc<dyn SourceStore>,
        ingestion: IngestionService,
        stores: Arc<dyn VectorStoreProvider>,
        embedding: Arc<dyn EmbeddingService>,
        llm: Arc<dyn LlmService>,
        settings: WorkspaceSettings,
    ) -> Result<Self, DomainError> {
        let qa = build_answerer(&stores, &embedding, &llm, &settings).await?;
        Ok(Self {
            sources,
            ingestion,
            stores,
            embedding,
            llm,
            settings,
            qa,
            conversation: Conversation::new(),
            notice: None,
        })
    }

    /// Saves the file, re-ingests the whole data directory and rebuilds the
    /// answerer.
    #[instrument(skip(self, bytes), fields(bytes = bytes.len()))]
    pub async fn upload(&mut self, name: &str, bytes: &[u8]) -> Result<UploadOutcome, DomainError> {
        if !self.ingestion.supports(Path::new(name)) {
            return Err(DomainError::unsupported(format!(
                "{name}: only .pdf and .txt files can be uploaded"
            )));
        }

        let path = self.sources.save(name, bytes).await?;
        let report = self.ingest().await?;

        let stored_as = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| name.to_string());
        self.notice = Some(format!(
            "{stored_as} uploaded and processed. Ask your question."
        ));

        Ok(UploadOutcome { path, report })
    }

    pub async fn ingest(&mut self) -> Result<IngestReport, DomainError> {
        let store = self.stores.open().await?;
        let report = self
            .ingestion
            .ingest_directory(self.sources.root(), store)
            .await?;

        self.qa = build_answerer(&self.stores, &self.embedding, &self.llm, &self.settings).await?;
        Ok(report)
    }

    /// Asks with the text exactly as submitted; it is recorded verbatim.
    #[instrument(skip(self))]
    pub async fn ask(&mut self, question: &str) -> Result<Reply, DomainError> {
        if question.trim().is_empty() {
            return Err(DomainError::validation("question must not be empty"));
        }

        let answer = self.qa.answer(question).await?;
        let formatted = answer.render(self.settings.format);
        self.conversation.record_exchange(question, formatted.clone());

        info!(turns = self.conversation.len(), "answered question");
        Ok(Reply { answer, formatted })
    }

    pub async fn search(
        &self,
        query: &str,
        limit: Option<usize>,
    ) -> Result<Vec<SearchResult>, DomainError> {
        if query.trim().is_empty() {
            return Err(DomainError::validation("query must not be empty"));
        }
        self.qa
            .rag()
            .retrieve_top_k(query, limit.unwrap_or(self.settings.top_k))
            .await
    }

    pub async fn indexed_chunks(&self) -> Result<usize, DomainError> {
        self.qa.rag().vector_store().len().await
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// Returns the pending notice once, then clears it.
    pub fn take_notice(&mut self) -> Option<String> {
        self.notice.take()
    }
}

async fn build_answerer(
    stores: &Arc<dyn VectorStoreProvider>,
    embedding: &Arc<dyn EmbeddingService>,
    llm: &Arc<dyn LlmService>,
    settings: &WorkspaceSettings,
) -> Result<QaService, DomainError> {
    let store = stores.open().await?;
    let rag = RagService::new(embedding.clone(), store, settings.top_k);
    Ok(QaService::new(rag, llm.clone(), settings.prompt_template.clone()))
}
