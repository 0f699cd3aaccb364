mod pdf;
mod registry;
mod text;

pub use pdf::PdfLoader;
pub use registry::LoaderRegistry;
pub use text::TextLoader;
