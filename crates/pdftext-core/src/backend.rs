use std::path::Path;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("failed to open PDF: {0}")]
    OpenError(String),
    #[error("failed to extract text: {0}")]
    ExtractionError(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Trait for PDF text extraction backends.
///
/// Implementors provide the document-opening step; the batch loop
/// (discovery, skip/overwrite policy, output writing) lives in
/// [`crate::batch::BatchExtractor`].
pub trait PdfBackend: Send + Sync {
    /// Open the PDF at `path`, authenticating with `password` when the
    /// document is encrypted. `None` uses the library's default open path.
    fn open(&self, path: &Path, password: Option<&str>)
    -> Result<Box<dyn PdfDocument>, BackendError>;
}

/// An opened PDF document. Dropping the handle releases it.
pub trait PdfDocument {
    fn page_count(&self) -> Result<usize, BackendError>;

    /// Extract the text of the page at `index` (0-based).
    ///
    /// Returns `Ok(None)` when the page has no extractable text, e.g. a
    /// scanned image page.
    fn page_text(&self, index: usize) -> Result<Option<String>, BackendError>;
}
