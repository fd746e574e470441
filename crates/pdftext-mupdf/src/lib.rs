use std::path::Path;

use mupdf::{Document, TextPageFlags};

use pdftext_core::{BackendError, PdfBackend, PdfDocument};

/// MuPDF-based implementation of [`PdfBackend`].
///
/// This crate is the sole AGPL island. It isolates the mupdf dependency
/// (which is AGPL-3.0) so that the batch engine does not transitively
/// depend on it.
#[derive(Debug, Default, Clone, Copy)]
pub struct MupdfBackend;

impl MupdfBackend {
    pub fn new() -> Self {
        Self
    }
}

impl PdfBackend for MupdfBackend {
    fn open(
        &self,
        path: &Path,
        password: Option<&str>,
    ) -> Result<Box<dyn PdfDocument>, BackendError> {
        let path_str = path
            .to_str()
            .ok_or_else(|| BackendError::OpenError("invalid path encoding".into()))?;

        let mut document =
            Document::open(path_str).map_err(|e| BackendError::OpenError(e.to_string()))?;

        let needs_password = document
            .needs_password()
            .map_err(|e| BackendError::OpenError(e.to_string()))?;
        if needs_password {
            authenticate(&mut document, password)?;
        } else if password.is_some() {
            tracing::debug!(path = %path.display(), "document is not encrypted, ignoring password");
        }

        Ok(Box::new(MupdfDocument { document }))
    }
}

fn authenticate(document: &mut Document, password: Option<&str>) -> Result<(), BackendError> {
    // Owner-password-only PDFs accept the empty user password.
    let attempt = password.unwrap_or("");
    let accepted = document
        .authenticate(attempt)
        .map_err(|e| BackendError::OpenError(e.to_string()))?;
    match (accepted, password) {
        (true, _) => Ok(()),
        (false, Some(_)) => Err(BackendError::OpenError("incorrect password".into())),
        (false, None) => Err(BackendError::OpenError(
            "document is encrypted and no password was given".into(),
        )),
    }
}

struct MupdfDocument {
    document: Document,
}

impl PdfDocument for MupdfDocument {
    fn page_count(&self) -> Result<usize, BackendError> {
        let count = self
            .document
            .page_count()
            .map_err(|e| BackendError::ExtractionError(e.to_string()))?;
        checked_page_count(count)
    }

    fn page_text(&self, index: usize) -> Result<Option<String>, BackendError> {
        let page_no = i32::try_from(index)
            .map_err(|_| BackendError::ExtractionError(format!("page index {index} out of range")))?;
        let page = self
            .document
            .load_page(page_no)
            .map_err(|e| BackendError::ExtractionError(e.to_string()))?;
        let text_page = page
            .to_text_page(TextPageFlags::empty())
            .map_err(|e| BackendError::ExtractionError(e.to_string()))?;

        let mut lines = Vec::new();
        for block in text_page.blocks() {
            for line in block.lines() {
                let line_text: String = line
                    .chars()
                    .map(|c| c.char().unwrap_or('\u{FFFD}'))
                    .collect();
                lines.push(line_text);
            }
        }

        Ok(join_page_lines(lines))
    }
}

fn checked_page_count(count: i32) -> Result<usize, BackendError> {
    usize::try_from(count)
        .map_err(|_| BackendError::ExtractionError(format!("invalid page count {count}")))
}

/// Join extracted lines with `\n`. A page without a single character has no
/// text and yields `None`; whitespace-only text is still text.
fn join_page_lines(lines: Vec<String>) -> Option<String> {
    if lines.iter().all(String::is_empty) {
        return None;
    }
    Some(lines.join("\n"))
}
