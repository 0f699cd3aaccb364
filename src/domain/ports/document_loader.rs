use std::path::Path;

use crate::domain::{errors::DomainError, Document};
use async_trait::async_trait;

#[async_trait]
pub trait DocumentLoader: Send + Sync {
    async fn load(&self, path: &Path) -> Result<Vec<Document>, DomainError>;
    /// Lowercase extensions without the leading dot.
    fn supported_extensions(&self) -> &[&str];
}

/// Loads every supported file in a directory.
#[async_trait]
pub trait DirectoryLoader: Send + Sync {
    async fn load_directory(&self, dir: &Path) -> Result<Vec<Document>, DomainError>;
    fn supports(&self, path: &Path) -> bool;
}
