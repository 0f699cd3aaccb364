pub mod chunking;
pub mod entities;
pub mod errors;
pub mod ports;

pub use chunking::{SplitterConfig, TextSplitter};
pub use entities::*;
pub use errors::{DomainError, Result};
