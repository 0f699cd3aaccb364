use axum::{
    body::Bytes,
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::{error::ApiError, state::AppState};
use crate::application::{IngestReport, UploadOutcome};
use crate::domain::SearchResult;

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub file: String,
    pub report: IngestReport,
}

impl From<UploadOutcome> for UploadResponse {
    fn from(outcome: UploadOutcome) -> Self {
        Self {
            file: outcome
                .path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            report: outcome.report,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchDocumentsRequest {
    pub query: String,
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct SearchResultResponse {
    pub chunk_id: Uuid,
    pub document_id: Uuid,
    pub source: String,
    pub page: Option<usize>,
    pub content: String,
    pub score: f32,
}

impl From<SearchResult> for SearchResultResponse {
    fn from(result: SearchResult) -> Self {
        Self {
            chunk_id: result.chunk.id,
            document_id: result.chunk.document_id,
            source: result.chunk.metadata.source,
            page: result.chunk.metadata.page,
            content: result.chunk.content,
            score: result.score,
        }
    }
}

/// Pulls the first file field out of a multipart form.
pub(crate) async fn read_file_field(
    mut multipart: Multipart,
) -> Result<(String, Bytes), ApiError> {
    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.file_name().map(str::to_string) else {
            continue;
        };
        if name.is_empty() {
            continue;
        }
        let bytes = field.bytes().await?;
        return Ok((name, bytes));
    }

    Err(ApiError::new(
        StatusCode::BAD_REQUEST,
        "no file was included in the upload",
    ))
}

pub async fn upload_document(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let (name, bytes) = read_file_field(multipart).await?;

    let mut workspace = state.workspace.lock().await;
    let outcome = workspace.upload(&name, &bytes).await?;

    Ok(Json(outcome.into()))
}

pub async fn search_documents(
    State(state): State<AppState>,
    Json(request): Json<SearchDocumentsRequest>,
) -> Result<Json<Vec<SearchResultResponse>>, ApiError> {
    let workspace = state.workspace.lock().await;
    let results = workspace.search(&request.query, request.limit).await?;

    Ok(Json(results.into_iter().map(Into::into).collect()))
}
