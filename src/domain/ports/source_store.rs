use std::path::{Path, PathBuf};

use crate::domain::errors::DomainError;
use async_trait::async_trait;

/// Raw uploaded files, kept under their original names.
#[async_trait]
pub trait SourceStore: Send + Sync {
    /// Writes `bytes` under `name` and returns the path actually written.
    async fn save(&self, name: &str, bytes: &[u8]) -> Result<PathBuf, DomainError>;
    fn root(&self) -> &Path;
}
