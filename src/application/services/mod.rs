mod ingestion;
mod qa;
mod rag;
mod workspace;

pub use ingestion::{IngestReport, IngestionService};
pub use qa::{render_prompt, QaService};
pub use rag::RagService;
pub use workspace::{Reply, UploadOutcome, Workspace, WorkspaceSettings};
