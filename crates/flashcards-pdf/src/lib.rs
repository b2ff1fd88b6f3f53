use thiserror::Error;

#[derive(Error, Debug)]
pub enum PdfError {
    #[error("failed to open PDF: {0}")]
    OpenError(String),
    #[error("failed to extract text: {0}")]
    ExtractionError(String),
}

/// Trait for PDF text extraction backends.
///
/// The flashcard pipeline only needs the concatenated text of a document;
/// implementors decide how to get it. Extraction is blocking, so callers on
/// an async runtime should run it on a blocking thread.
pub trait TextExtractor: Send + Sync {
    /// Extract the full text content of an in-memory PDF.
    fn extract_text(&self, bytes: &[u8]) -> Result<String, PdfError>;
}

/// MuPDF-backed extractor.
#[cfg(feature = "pdf")]
#[derive(Debug, Clone, Copy, Default)]
pub struct MupdfExtractor;

#[cfg(feature = "pdf")]
impl TextExtractor for MupdfExtractor {
    fn extract_text(&self, bytes: &[u8]) -> Result<String, PdfError> {
        extract_text(bytes)
    }
}

/// Extract the text of every page of an in-memory PDF.
///
/// Page texts are joined with a single space in page order and the result is
/// trimmed. The MuPDF document lives only inside this call and is dropped on
/// both the success and the error path.
#[cfg(feature = "pdf")]
pub fn extract_text(bytes: &[u8]) -> Result<String, PdfError> {
    let doc = mupdf::Document::from_bytes(bytes, "application/pdf")
        .map_err(|e| PdfError::OpenError(e.to_string()))?;
    let page_count = doc
        .page_count()
        .map_err(|e| PdfError::OpenError(e.to_string()))?;

    let mut pages = Vec::with_capacity(page_count.max(0) as usize);
    for index in 0..page_count {
        let page = doc
            .load_page(index)
            .map_err(|e| PdfError::ExtractionError(format!("page {}: {}", index + 1, e)))?;
        let text = page
            .to_text_page(mupdf::TextPageFlags::empty())
            .and_then(|text_page| text_page.to_text())
            .map_err(|e| PdfError::ExtractionError(format!("page {}: {}", index + 1, e)))?;
        pages.push(text);
    }

    Ok(pages.join(" ").trim().to_string())
}
