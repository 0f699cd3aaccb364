//! Deterministic stand-ins for the model ports.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::{
    ports::{EmbeddingService, LlmService},
    DomainError, Embedding,
};

const BUCKETS: usize = 256;

/// Bag-of-words vectors: each lowercase word is hashed into a bucket.
pub struct KeywordEmbedding;

impl KeywordEmbedding {
    fn vectorize(text: &str) -> Embedding {
        let mut v = vec![0.0f32; BUCKETS];
        for word in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
        {
            let hash = word
                .to_lowercase()
                .bytes()
                .fold(0xcbf29ce484222325u64, |h, b| {
                    (h ^ u64::from(b)).wrapping_mul(0x100000001b3)
                });
            v[(hash % BUCKETS as u64) as usize] += 1.0;
        }
        Embedding::new(v)
    }
}

#[async_trait]
impl EmbeddingService for KeywordEmbedding {
    async fn embed(&self, text: &str) -> Result<Embedding, DomainError> {
        Ok(Self::vectorize(text))
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>, DomainError> {
        Ok(texts.iter().map(|t| Self::vectorize(t)).collect())
    }

    fn model(&self) -> &str {
        "keyword"
    }
}

/// Returns a fixed reply and remembers every prompt.
pub struct ScriptedLlm {
    reply: String,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedLlm {
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmService for ScriptedLlm {
    async fn complete(&self, prompt: &str) -> Result<String, DomainError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(self.reply.clone())
    }

    fn model(&self) -> &str {
        "scripted"
    }
}

pub struct FailingLlm;

#[async_trait]
impl LlmService for FailingLlm {
    async fn complete(&self, _prompt: &str) -> Result<String, DomainError> {
        Err(DomainError::external("model unavailable"))
    }

    fn model(&self) -> &str {
        "failing"
    }
}
