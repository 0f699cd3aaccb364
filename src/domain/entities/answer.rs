use serde::{Deserialize, Serialize};

use super::SearchResult;

/// Output of one retrieval-augmented query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Answer {
    pub query: String,
    pub result: String,
    pub sources: Vec<SearchResult>,
}

impl Answer {
    pub fn render(&self, format: AnswerFormat) -> String {
        match format {
            AnswerFormat::Labeled => format!(
                "### Query:\n{}\n\n### Response:\n{}",
                self.query, self.result
            ),
            AnswerFormat::Raw => self.result.clone(),
        }
    }
}

/// How an answer is shown in the conversation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnswerFormat {
    #[default]
    Labeled,
    Raw,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answer() -> Answer {
        Answer {
            query: "What is it?".into(),
            result: "A test.".into(),
            sources: vec![],
        }
    }

    #[test]
    fn test_labeled_format() {
        assert_eq!(
            answer().render(AnswerFormat::Labeled),
            "### Query:\nWhat is it?\n\n### Response:\nA test."
        );
    }

    #[test]
    fn test_raw_format() {
        assert_eq!(answer().render(AnswerFormat::Raw), "A test.");
    }
}
