//! Résumé text extraction. The PDF parser is synchronous and CPU-bound, so it
//! runs on the blocking pool; the handler only ever sees plain text or an error.

use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("{0}")]
    Pdf(String),

    #[error("PDF parser aborted: {0}")]
    Aborted(#[from] tokio::task::JoinError),
}

/// Converts an uploaded document into plain text.
///
/// Carried in `AppState` as `Arc<dyn TextExtractor>`.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract_text(&self, bytes: &[u8]) -> Result<String, ExtractionError>;
}

/// `pdf-extract` backed extractor.
pub struct PdfTextExtractor;

#[async_trait]
impl TextExtractor for PdfTextExtractor {
    async fn extract_text(&self, bytes: &[u8]) -> Result<String, ExtractionError> {
        let owned = bytes.to_vec();
        // A panic inside the parser surfaces as a JoinError rather than taking the worker down.
        let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&owned))
            .await?
            .map_err(|e| ExtractionError::Pdf(e.to_string()))?;

        debug!("Extracted {} characters from PDF", text.chars().count());
        Ok(text)
    }
}
