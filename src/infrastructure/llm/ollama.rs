use async_trait::async_trait;
use rig::client::{CompletionClient, ProviderClient};
use rig::completion::Prompt;
use rig::providers::ollama;

use crate::domain::{ports::LlmService, DomainError};

/// Single-shot completions from a model served by Ollama.
pub struct OllamaLlm {
    client: ollama::Client,
    model: String,
}

impl OllamaLlm {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            client: ollama::Client::from_env(),
            model: model.into(),
        }
    }
}

#[async_trait]
impl LlmService for OllamaLlm {
    async fn complete(&self, prompt: &str) -> Result<String, DomainError> {
        let agent = self.client.agent(&self.model).build();
        agent
            .prompt(prompt)
            .await
            .map_err(|e| DomainError::external(format!("generation failed: {e}")))
    }

    fn model(&self) -> &str {
        &self.model
    }
}
