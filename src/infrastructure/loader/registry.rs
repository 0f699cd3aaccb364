use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, instrument};

use super::{PdfLoader, TextLoader};
use crate::domain::{
    ports::{DirectoryLoader, DocumentLoader},
    Document, DomainError,
};

/// Dispatches files to loaders by extension.
pub struct LoaderRegistry {
    loaders: Vec<Arc<dyn DocumentLoader>>,
}

impl LoaderRegistry {
    pub fn new() -> Self {
        Self {
            loaders: Vec::new(),
        }
    }

    pub fn register(mut self, loader: Arc<dyn DocumentLoader>) -> Self {
        self.loaders.push(loader);
        self
    }

    pub fn loader_for(&self, path: &Path) -> Option<&Arc<dyn DocumentLoader>> {
        let ext = extension_of(path)?;
        self.loaders
            .iter()
            .find(|l| l.supported_extensions().contains(&ext.as_str()))
    }
}

#[async_trait]
impl DirectoryLoader for LoaderRegistry {
    /// Loads every supported file directly under `dir`, sorted by file name.
    /// Unsupported files are skipped; the first loader failure aborts.
    #[instrument(skip(self), fields(dir = %dir.display()))]
    async fn load_directory(&self, dir: &Path) -> Result<Vec<Document>, DomainError> {
        let mut documents = Vec::new();

        for path in list_files(dir).await? {
            match self.loader_for(&path) {
                Some(loader) => documents.extend(loader.load(&path).await?),
                None => debug!(path = %path.display(), "skipping unsupported file"),
            }
        }

        Ok(documents)
    }

    fn supports(&self, path: &Path) -> bool {
        self.loader_for(path).is_some()
    }
}

impl Default for LoaderRegistry {
    fn default() -> Self {
        Self::new()
            .register(Arc::new(PdfLoader))
            .register(Arc::new(TextLoader))
    }
}

async fn list_files(dir: &Path) -> Result<Vec<PathBuf>, DomainError> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut files = Vec::new();

    while let Some(entry) = entries.next_entry().await? {
        if entry.file_type().await?.is_file() {
            files.push(entry.path());
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
}
