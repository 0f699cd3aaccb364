use std::path::Path;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::{ports::DocumentLoader, Document, DomainError, SourceMetadata};

/// Extracts text from a PDF, one document per page.
#[derive(Debug, Default)]
pub struct PdfLoader;

#[async_trait]
impl DocumentLoader for PdfLoader {
    async fn load(&self, path: &Path) -> Result<Vec<Document>, DomainError> {
        debug!(path = %path.display(), "loading pdf");
        let bytes = tokio::fs::read(path).await?;

        let pages = tokio::task::spawn_blocking(move || extract_pages(&bytes))
            .await
            .map_err(|e| DomainError::internal(format!("PDF extraction task failed: {e}")))?
            .map_err(|e| DomainError::parse(format!("{}: {e}", path.display())))?;

        let source = path.display().to_string();
        Ok(pages
            .into_iter()
            .map(|(page, text)| {
                Document::new(
                    text,
                    SourceMetadata::new(source.clone(), "application/pdf").with_page(page),
                )
            })
            .collect())
    }

    fn supported_extensions(&self) -> &[&str] {
        &["pdf"]
    }
}

/// Page numbers are 1-based, in document order.
fn extract_pages(bytes: &[u8]) -> Result<Vec<(usize, String)>, lopdf::Error> {
    let doc = lopdf::Document::load_mem(bytes)?;

    doc.get_pages()
        .into_keys()
        .map(|page| doc.extract_text(&[page]).map(|text| (page as usize, text)))
        .collect()
}

/// Builds a single-page PDF showing `text` in a standard Type1 font.
#[cfg(test)]
pub(crate) fn one_page_pdf(text: &str) -> Vec<u8> {
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Object, Stream};

    let mut doc = lopdf::Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });
    let content = Content {
        operations: vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 24.into()]),
            Operation::new("Td", vec![72.into(), 700.into()]),
            Operation::new("Tj", vec![Object::string_literal(text)]),
            Operation::new("ET", vec![]),
        ],
    };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}
