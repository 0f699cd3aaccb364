use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::domain::{AnswerFormat, SplitterConfig};

pub const DEFAULT_CONFIG_PATH: &str = "docqa.yaml";

pub const DEFAULT_ANSWER_PROMPT: &str = "Use the following pieces of context to answer the question at the end. If you don't know the answer, just say that you don't know, don't try to make up an answer.

{context}

Question: {question}
Helpful Answer:";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub paths: PathsConfig,
    pub model: ModelConfig,
    pub vector_store: VectorStoreConfig,
    pub chunking: SplitterConfig,
    pub rag: RagConfig,
    pub upload: UploadConfig,
    pub answer: AnswerConfig,
    pub prompts: PromptsConfig,
    pub cors: CorsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub vector_store: PathBuf,
    pub data: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            vector_store: PathBuf::from("./chroma_db/"),
            data: PathBuf::from("./data/"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Generation model, and embedding model unless `embedding` is set.
    pub name: String,
    pub embedding: Option<String>,
    /// Ollama endpoint, used when `OLLAMA_API_BASE_URL` is not set.
    pub base_url: String,
}

impl ModelConfig {
    pub fn embedding_model(&self) -> &str {
        self.embedding.as_deref().unwrap_or(&self.name)
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            name: "deepseek-r1:1.5b".to_string(),
            embedding: None,
            base_url: "http://localhost:11434".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VectorBackend {
    #[default]
    Local,
    Memory,
    Qdrant,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorStoreConfig {
    pub backend: VectorBackend,
    pub qdrant_url: String,
    pub collection: String,
    pub dimension: usize,
}

impl Default for VectorStoreConfig {
    fn default() -> Self {
        Self {
            backend: VectorBackend::Local,
            qdrant_url: "http://localhost:6334".to_string(),
            collection: "documents".to_string(),
            dimension: 1536,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RagConfig {
    pub top_k: usize,
}

impl Default for RagConfig {
    fn default() -> Self {
        Self { top_k: 4 }
    }
}

/// What to do when an upload has the same name as an existing file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictPolicy {
    #[default]
    Overwrite,
    Reject,
    Rename,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    pub on_conflict: ConflictPolicy,
    pub max_bytes: usize,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            on_conflict: ConflictPolicy::Overwrite,
            max_bytes: 50 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnswerConfig {
    pub format: AnswerFormat,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptsConfig {
    pub answer: String,
}

impl Default for PromptsConfig {
    fn default() -> Self {
        Self {
            answer: DEFAULT_ANSWER_PROMPT.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl AppConfig {
    /// Reads the config file named by `DOCQA_CONFIG`, else `docqa.yaml`.
    pub fn from_env() -> anyhow::Result<Self> {
        let path = std::env::var("DOCQA_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.into());
        Self::load(Path::new(&path))
    }

    /// Loads YAML from `path` (defaults when the file is absent), applies env
    /// overrides and creates the data and vector store directories.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config file {}", path.display()))?;
            serde_yaml::from_str::<Self>(&content)
                .with_context(|| format!("failed to parse config file {}", path.display()))?
        } else {
            Self::default()
        };

        config.apply_env_overrides()?;
        config.ensure_directories()?;
        Ok(config)
    }

    fn apply_env_overrides(&mut self) -> anyhow::Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides from `lookup`, which maps a variable name to its value.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<()> {
        if let Some(v) = lookup("DOCQA_VECTOR_STORE_PATH") {
            self.paths.vector_store = v.into();
        }
        if let Some(v) = lookup("DOCQA_DATA_PATH") {
            self.paths.data = v.into();
        }
        if let Some(v) = lookup("DOCQA_MODEL") {
            self.model.name = v;
        }
        if let Some(v) = lookup("DOCQA_EMBEDDING_MODEL") {
            self.model.embedding = Some(v);
        }
        if let Some(v) = lookup("QDRANT_URL") {
            self.vector_store.qdrant_url = v;
        }
        if let Some(v) = lookup("SERVER_HOST") {
            self.server.host = v;
        }
        if let Some(v) = lookup("SERVER_PORT") {
            self.server.port = v.parse().context("SERVER_PORT is not a valid port")?;
        }
        Ok(())
    }

    pub fn ensure_directories(&self) -> anyhow::Result<()> {
        for dir in [&self.paths.vector_store, &self.paths.data] {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("failed to create directory {}", dir.display()))?;
        }
        Ok(())
    }
}
