use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{info, warn};

use crate::domain::{ports::SourceStore, DomainError};
use crate::infrastructure::config::ConflictPolicy;

/// Uploaded files kept verbatim in the data directory.
pub struct FsSourceStore {
    root: PathBuf,
    on_conflict: ConflictPolicy,
}

impl FsSourceStore {
    pub fn new(root: impl Into<PathBuf>, on_conflict: ConflictPolicy) -> Self {
        Self {
            root: root.into(),
            on_conflict,
        }
    }

    async fn resolve_target(&self, name: &str) -> Result<PathBuf, DomainError> {
        let target = self.root.join(name);
        if !tokio::fs::try_exists(&target).await? {
            return Ok(target);
        }

        match self.on_conflict {
            ConflictPolicy::Overwrite => {
                warn!(path = %target.display(), "overwriting existing upload");
                Ok(target)
            }
            ConflictPolicy::Reject => Err(DomainError::conflict(format!(
                "a file named {name} already exists"
            ))),
            ConflictPolicy::Rename => {
                let path = Path::new(name);
                let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or(name);
                let ext = path.extension().and_then(|e| e.to_str());

                let mut n = 1;
                loop {
                    let candidate = match ext {
                        Some(ext) => format!("{stem}-{n}.{ext}"),
                        None => format!("{stem}-{n}"),
                    };
                    let target = self.root.join(candidate);
                    if !tokio::fs::try_exists(&target).await? {
                        return Ok(target);
                    }
                    n += 1;
                }
            }
        }
    }
}

/// Reduces a client-supplied name to its final path component.
pub fn sanitize_file_name(name: &str) -> Result<String, DomainError> {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default().trim();

    if base.is_empty() || base == "." || base == ".." {
        return Err(DomainError::validation(format!("invalid file name: {name:?}")));
    }
    Ok(base.to_string())
}

#[async_trait]
impl SourceStore for FsSourceStore {
    async fn save(&self, name: &str, bytes: &[u8]) -> Result<PathBuf, DomainError> {
        let name = sanitize_file_name(name)?;
        tokio::fs::create_dir_all(&self.root).await?;

        let target = self.resolve_target(&name).await?;
        tokio::fs::write(&target, bytes).await?;

        info!(path = %target.display(), bytes = bytes.len(), "saved upload");
        Ok(target)
    }

    fn root(&self) -> &Path {
        &self.root
    }
}
