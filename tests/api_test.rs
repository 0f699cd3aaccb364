use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use tower::ServiceExt;

use docqa::api::{create_router, AppState};
use docqa::application::{IngestionService, Workspace, WorkspaceSettings};
use docqa::domain::ports::{EmbeddingService, LlmService};
use docqa::domain::{AnswerFormat, DomainError, Embedding, SplitterConfig, TextSplitter};
use docqa::infrastructure::config::DEFAULT_ANSWER_PROMPT;
use docqa::infrastructure::{
    AppConfig, ConflictPolicy, FsSourceStore, LoaderRegistry, MemoryStoreProvider,
};

const BOUNDARY: &str = "docqa-test-boundary";

/// Letter frequencies; enough to make retrieval deterministic.
struct LetterEmbedding;

#[async_trait]
impl EmbeddingService for LetterEmbedding {
    async fn embed(&self, text: &str) -> Result<Embedding, DomainError> {
        let mut v = vec![0.0f32; 26];
        for c in text.chars().filter(char::is_ascii_alphabetic) {
            v[(c.to_ascii_lowercase() as u8 - b'a') as usize] += 1.0;
        }
        Ok(Embedding::new(v))
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>, DomainError> {
        let mut out = Vec::with_capacity(texts.len());
        for text in texts {
            out.push(self.embed(text).await?);
        }
        Ok(out)
    }

    fn model(&self) -> &str {
        "letters"
    }
}

struct CannedLlm {
    reply: Result<String, String>,
    prompts: Mutex<Vec<String>>,
}

#[async_trait]
impl LlmService for CannedLlm {
    async fn complete(&self, prompt: &str) -> Result<String, DomainError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.reply.clone().map_err(DomainError::external)
    }

    fn model(&self) -> &str {
        "canned"
    }
}

struct TestApp {
    router: Router,
    llm: Arc<CannedLlm>,
    _data: tempfile::TempDir,
}

async fn app_with(reply: Result<&str, &str>, format: AnswerFormat) -> TestApp {
    let data = tempfile::tempdir().unwrap();
    let embedding: Arc<dyn EmbeddingService> = Arc::new(LetterEmbedding);
    let llm = Arc::new(CannedLlm {
        reply: reply.map(str::to_string).map_err(str::to_string),
        prompts: Mutex::new(Vec::new()),
    });

    let workspace = Workspace::open(
        Arc::new(FsSourceStore::new(data.path(), ConflictPolicy::Overwrite)),
        IngestionService::new(
            Arc::new(LoaderRegistry::default()),
            TextSplitter::new(SplitterConfig::default()).unwrap(),
            embedding.clone(),
        ),
        Arc::new(MemoryStoreProvider::new()),
        embedding,
        llm.clone(),
        WorkspaceSettings {
            top_k: 4,
            prompt_template: DEFAULT_ANSWER_PROMPT.to_string(),
            format,
        },
    )
    .await
    .unwrap();

    TestApp {
        router: create_router(AppState::new(workspace, AppConfig::default())),
        llm,
        _data: data,
    }
}

async fn app() -> TestApp {
    app_with(Ok("It says hello."), AnswerFormat::Labeled).await
}

fn multipart(uri: &str, file_name: &str, content: &str) -> Request<Body> {
    let body = format!(
        "--{BOUNDARY}\r\n\
         Content-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\n\
         Content-Type: application/octet-stream\r\n\r\n\
         {content}\r\n\
         --{BOUNDARY}--\r\n"
    );
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

fn json_post(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}

fn form_post(uri: &str, body: &'static str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn send(app: &TestApp, req: Request<Body>) -> (StatusCode, Vec<u8>) {
    let resp = app.router.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec())
}

async fn send_json(app: &TestApp, req: Request<Body>) -> (StatusCode, serde_json::Value) {
    let (status, body) = send(app, req).await;
    (status, serde_json::from_slice(&body).unwrap())
}

async fn page(app: &TestApp) -> String {
    let (status, body) = send(app, get("/")).await;
    assert_eq!(status, StatusCode::OK);
    String::from_utf8(body).unwrap()
}

#[tokio::test]
async fn health_reports_version() {
    let app = app().await;
    let (status, json) = send_json(&app, get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn upload_then_chat_uses_document() {
    let app = app().await;

    let (status, json) = send_json(
        &app,
        multipart("/api/v1/documents", "hello.txt", "Hello world."),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["file"], "hello.txt");
    assert_eq!(json["report"]["chunks"], 1);

    let (status, json) = send_json(
        &app,
        json_post(
            "/api/v1/chat",
            serde_json::json!({ "message": "What does the document say?" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["query"], "What does the document say?");
    assert_eq!(json["response"], "It says hello.");
    assert_eq!(
        json["formatted"],
        "### Query:\nWhat does the document say?\n\n### Response:\nIt says hello."
    );

    let prompts = app.llm.prompts.lock().unwrap().clone();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("Hello world."));
}

#[tokio::test]
async fn history_lists_both_turns() {
    let app = app_with(Ok("Nothing yet."), AnswerFormat::Raw).await;

    send(
        &app,
        json_post("/api/v1/chat", serde_json::json!({ "message": "hi" })),
    )
    .await;
    let (status, json) = send_json(&app, get("/api/v1/history")).await;

    assert_eq!(status, StatusCode::OK);
    let messages = json["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0]["role"], "user");
    assert_eq!(messages[0]["content"], "hi");
    assert_eq!(messages[1]["role"], "assistant");
    assert_eq!(messages[1]["content"], "Nothing yet.");
}

#[tokio::test]
async fn search_returns_scored_chunks() {
    let app = app().await;
    send(&app, multipart("/api/v1/documents", "a.txt", "Hello world.")).await;

    let (status, json) = send_json(
        &app,
        json_post(
            "/api/v1/documents/search",
            serde_json::json!({ "query": "hello", "limit": 3 }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let hits = json.as_array().unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0]["content"], "Hello world.");
    assert!(hits[0]["source"].as_str().unwrap().ends_with("a.txt"));
    assert!(hits[0]["score"].as_f64().unwrap() > 0.0);
}

#[tokio::test]
async fn unsupported_upload_is_bad_request() {
    let app = app().await;

    let (status, json) = send_json(&app, multipart("/api/v1/documents", "notes.md", "# hi")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("notes.md"));
}

#[tokio::test]
async fn blank_chat_message_is_bad_request() {
    let app = app().await;

    let (status, _) = send_json(
        &app,
        json_post("/api/v1/chat", serde_json::json!({ "message": "  " })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(app.llm.prompts.lock().unwrap().is_empty());
}

#[tokio::test]
async fn model_failure_is_bad_gateway() {
    let app = app_with(Err("connection refused"), AnswerFormat::Labeled).await;

    let (status, json) = send_json(
        &app,
        json_post("/api/v1/chat", serde_json::json!({ "message": "hello?" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(json["error"].as_str().unwrap().contains("connection refused"));
}

#[tokio::test]
async fn page_chat_form_redirects_and_renders_history() {
    let app = app().await;

    let resp = app
        .router
        .clone()
        .oneshot(form_post("/chat", "message=Hi+%3Cthere%3E"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers()[header::LOCATION], "/");

    let html = page(&app).await;
    assert!(html.contains("Hi &lt;there&gt;"));
    assert!(html.contains("It says hello."));
}

#[tokio::test]
async fn page_empty_chat_message_is_ignored() {
    let app = app().await;

    let (status, _) = send(&app, form_post("/chat", "message=")).await;

    assert_eq!(status, StatusCode::SEE_OTHER);
    assert!(app.llm.prompts.lock().unwrap().is_empty());
    assert!(!page(&app).await.contains("class=\"user-message\""));
}

#[tokio::test]
async fn page_upload_shows_notice_once() {
    let app = app().await;

    let (status, _) = send(&app, multipart("/upload", "hello.txt", "Hello world.")).await;
    assert_eq!(status, StatusCode::SEE_OTHER);

    assert!(page(&app).await.contains("hello.txt uploaded and processed"));
    assert!(!page(&app).await.contains("class=\"notice\""));
}

#[tokio::test]
async fn page_upload_error_renders_html() {
    let app = app().await;

    let resp = app
        .router
        .clone()
        .oneshot(multipart("/upload", "slides.pptx", "binary"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let content_type = resp.headers()[header::CONTENT_TYPE].to_str().unwrap();
    assert!(content_type.starts_with("text/html"));
}
