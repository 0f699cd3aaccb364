use std::sync::Arc;

use tracing::{debug, instrument};

use super::RagService;
use crate::domain::{ports::LlmService, Answer, DomainError};

/// Retrieval QA with the "stuff" strategy: every retrieved chunk goes into a
/// single prompt.
#[derive(Clone)]
pub struct QaService {
    rag: RagService,
    llm: Arc<dyn LlmService>,
    prompt_template: String,
}

impl QaService {
    pub fn new(rag: RagService, llm: Arc<dyn LlmService>, prompt_template: impl Into<String>) -> Self {
        Self {
            rag,
            llm,
            prompt_template: prompt_template.into(),
        }
    }

    pub fn rag(&self) -> &RagService {
        &self.rag
    }

    #[instrument(skip(self), fields(model = self.llm.model()))]
    pub async fn answer(&self, query: &str) -> Result<Answer, DomainError> {
        let sources = self.rag.retrieve(query).await?;
        debug!(retrieved = sources.len(), "building prompt");

        let context = sources
            .iter()
            .map(|r| r.chunk.content.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");
        let prompt = render_prompt(&self.prompt_template, &context, query);

        let result = self.llm.complete(&prompt).await?;

        Ok(Answer {
            query: query.to_string(),
            result,
            sources,
        })
    }
}

/// Substitutes `{context}` and `{question}` in one pass, so placeholder text
/// inside the substituted values is left alone.
pub fn render_prompt(template: &str, context: &str, question: &str) -> String {
    const CONTEXT: &str = "{context}";
    const QUESTION: &str = "{question}";

    let mut out = String::with_capacity(template.len() + context.len() + question.len());
    let mut rest = template;

    loop {
        let next = [(CONTEXT, context), (QUESTION, question)]
            .into_iter()
            .filter_map(|(key, value)| rest.find(key).map(|pos| (pos, key, value)))
            .min_by_key(|(pos, _, _)| *pos);

        match next {
            Some((pos, key, value)) => {
                out.push_str(&rest[..pos]);
                out.push_str(value);
                rest = &rest[pos + key.len()..];
            }
            None => {
                out.push_str(rest);
                return out;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::{FailingLlm, KeywordEmbedding, ScriptedLlm};
    use crate::domain::{Document, DocumentChunk, SourceMetadata};
    use crate::infrastructure::config::DEFAULT_ANSWER_PROMPT;
    use crate::infrastructure::InMemoryVectorStore;

    fn rag() -> RagService {
        RagService::new(
            Arc::new(KeywordEmbedding),
            Arc::new(InMemoryVectorStore::new()),
            4,
        )
    }

    #[test]
    fn test_render_prompt() {
        let prompt = render_prompt("C={context} Q={question}", "ctx", "why?");
        assert_eq!(prompt, "C=ctx Q=why?");
    }

    #[test]
    fn test_render_prompt_ignores_placeholders_in_values() {
        let prompt = render_prompt("{context}|{question}", "{question}", "{context}");
        assert_eq!(prompt, "{question}|{context}");
    }

    #[tokio::test]
    async fn test_answer_includes_context() {
        let rag = rag();
        let doc = Document::new("Hello world.", SourceMetadata::new("hello.txt", "text/plain"));
        rag.index_chunks(&[DocumentChunk::new(&doc, "Hello world.", 0)])
            .await
            .unwrap();

        let llm = Arc::new(ScriptedLlm::new("It says hello."));
        let qa = QaService::new(rag, llm.clone(), DEFAULT_ANSWER_PROMPT);

        let answer = qa.answer("What does the document say?").await.unwrap();

        assert_eq!(answer.query, "What does the document say?");
        assert_eq!(answer.result, "It says hello.");
        assert_eq!(answer.sources.len(), 1);
        let prompts = llm.prompts();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("Hello world."));
        assert!(prompts[0].contains("Question: What does the document say?"));
    }

    #[tokio::test]
    async fn test_empty_store_still_asks_model() {
        let llm = Arc::new(ScriptedLlm::new("I don't know."));
        let qa = QaService::new(rag(), llm.clone(), "[{context}] {question}");

        let answer = qa.answer("anything?").await.unwrap();

        assert!(answer.sources.is_empty());
        assert_eq!(llm.prompts(), vec!["[] anything?".to_string()]);
    }

    #[tokio::test]
    async fn test_model_failure_propagates() {
        let qa = QaService::new(rag(), Arc::new(FailingLlm), DEFAULT_ANSWER_PROMPT);
        let err = qa.answer("hello?").await.unwrap_err();
        assert!(matches!(err, DomainError::ExternalService(_)));
    }
}
