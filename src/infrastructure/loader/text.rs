use std::path::Path;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::{ports::DocumentLoader, Document, DomainError, SourceMetadata};

/// Reads a UTF-8 text file into a single document.
#[derive(Debug, Default)]
pub struct TextLoader;

#[async_trait]
impl DocumentLoader for TextLoader {
    async fn load(&self, path: &Path) -> Result<Vec<Document>, DomainError> {
        debug!(path = %path.display(), "loading text file");
        let content = tokio::fs::read_to_string(path).await?;

        Ok(vec![Document::new(
            content,
            SourceMetadata::new(path.display().to_string(), "text/plain"),
        )])
    }

    fn supported_extensions(&self) -> &[&str] {
        &["txt"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_text_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("notes.txt");
        std::fs::write(&file, "Hello world.").unwrap();

        let docs = TextLoader.load(&file).await.unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].content, "Hello world.");
        assert_eq!(docs[0].metadata.source, file.display().to_string());
        assert_eq!(docs[0].metadata.content_type, "text/plain");
        assert_eq!(docs[0].metadata.page, None);
    }

    #[tokio::test]
    async fn test_invalid_utf8_fails() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("binary.txt");
        std::fs::write(&file, [0xff, 0xfe, 0x00, 0xc3]).unwrap();

        assert!(matches!(
            TextLoader.load(&file).await,
            Err(DomainError::Io(_))
        ));
    }
}
