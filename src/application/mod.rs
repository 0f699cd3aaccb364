//! Application layer - Use cases and orchestration.
//!
//! Services depend on domain ports (traits) rather than concrete
//! implementations; the binaries wire the infrastructure in.

pub mod services;

#[cfg(test)]
pub(crate) mod testing;

pub use services::{
    IngestReport, IngestionService, QaService, RagService, Reply, UploadOutcome, Workspace,
    WorkspaceSettings,
};
