//! Upload-to-flashcards pipeline.
//!
//! ```text
//! Upload ─ validate ─ extract (blocking) ─ non-empty? ─ chunk ─┬─ complete ─ parse ─┐
//!                                                            └──── first N chunks ◄─┘
//! ```
//!
//! Each step is terminal on failure. A completion failure discards every
//! flashcard gathered so far for the upload.

use std::sync::Arc;

use thiserror::Error;

use crate::chunk::split_text;
use crate::completion::{Completer, CompletionError};
use crate::parse::parse_flashcards;
use crate::{Config, Flashcard, PdfError, TextExtractor};

/// Error type for the pipeline. `Display` is the message shown to the user.
#[derive(Error, Debug)]
pub enum FlashcardError {
    #[error("Please upload a valid PDF file.")]
    InvalidUpload,
    #[error("Failed to read the PDF file.")]
    Extraction(#[source] PdfError),
    #[error("PDF has no readable text.")]
    NoText,
    #[error("{0}")]
    Completion(#[from] CompletionError),
}

/// An uploaded file, alive for a single request.
#[derive(Debug, Clone)]
pub struct Upload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(filename: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            filename: filename.into(),
            bytes: bytes.into(),
        }
    }

    /// Whether the declared filename ends in `.pdf`, ignoring case.
    pub fn has_pdf_extension(&self) -> bool {
        self.filename.to_lowercase().ends_with(".pdf")
    }
}

/// Require a present upload with a `.pdf` filename.
pub fn validate_upload(upload: Option<Upload>) -> Result<Upload, FlashcardError> {
    match upload {
        Some(upload) if upload.has_pdf_extension() => Ok(upload),
        _ => Err(FlashcardError::InvalidUpload),
    }
}

/// Extract the upload's text on a blocking thread.
///
/// The upload bytes are consumed; blank text is reported as
/// [`FlashcardError::NoText`].
pub async fn extract<E>(upload: Upload, extractor: Arc<E>) -> Result<String, FlashcardError>
where
    E: TextExtractor + ?Sized + 'static,
{
    let Upload { filename, bytes } = upload;
    let text = tokio::task::spawn_blocking(move || extractor.extract_text(&bytes))
        .await
        .unwrap_or_else(|e| Err(PdfError::ExtractionError(format!("task join error: {e}"))))
        .map_err(|e| {
            log::warn!("extraction failed for '{filename}': {e}");
            FlashcardError::Extraction(e)
        })?;

    if text.trim().is_empty() {
        return Err(FlashcardError::NoText);
    }
    log::debug!("extracted {} chars from '{filename}'", text.len());
    Ok(text)
}

/// Chunk `text` and collect flashcards from the first `config.max_chunks`
/// chunks, one completion call at a time.
///
/// Stops at the first failed completion; nothing collected before it is
/// returned.
pub async fn generate_flashcards<C>(
    text: &str,
    completer: &C,
    config: &Config,
) -> Result<Vec<Flashcard>, FlashcardError>
where
    C: Completer,
{
    let chunks = split_text(text, config.max_words_per_chunk);
    if chunks.len() > config.max_chunks {
        log::info!(
            "document has {} chunks; only the first {} are used",
            chunks.len(),
            config.max_chunks
        );
    }

    let mut flashcards = Vec::new();
    for (index, chunk) in chunks.iter().take(config.max_chunks).enumerate() {
        let raw = completer.complete(chunk).await?;
        let cards = parse_flashcards(&raw);
        if cards.is_empty() {
            log::warn!("chunk {}: completion contained no Q/A pairs", index + 1);
        }
        flashcards.extend(cards);
    }
    Ok(flashcards)
}

/// Run the whole pipeline for one upload.
pub async fn process_upload<E, C>(
    upload: Option<Upload>,
    extractor: Arc<E>,
    completer: &C,
    config: &Config,
) -> Result<Vec<Flashcard>, FlashcardError>
where
    E: TextExtractor + ?Sized + 'static,
    C: Completer,
{
    let upload = validate_upload(upload)?;
    let text = extract(upload, extractor).await?;
    generate_flashcards(&text, completer, config).await
}
