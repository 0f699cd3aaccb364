mod answer;
mod conversation;
mod document;
mod embedding;

pub use answer::{Answer, AnswerFormat};
pub use conversation::{Conversation, Message, MessageRole};
pub use document::{Document, DocumentChunk, SearchResult, SourceMetadata};
pub use embedding::Embedding;
