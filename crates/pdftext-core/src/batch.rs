use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::ProgressEvent;
use crate::backend::{BackendError, PdfBackend};
use crate::discover::{discover_pdfs, output_path_for};

/// Why a single file failed. Recorded in its [`FileReport`]; never aborts the batch.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BatchError {
    #[error("failed to open PDF: {0}")]
    Open(String),
    #[error("failed to extract text: {0}")]
    Extraction(String),
    #[error("failed to write output: {0}")]
    Write(String),
}

impl BatchError {
    fn open(err: BackendError) -> Self {
        match err {
            BackendError::OpenError(msg) | BackendError::ExtractionError(msg) => Self::Open(msg),
            BackendError::Io(e) => Self::Open(e.to_string()),
        }
    }

    fn extraction(err: BackendError) -> Self {
        match err {
            BackendError::OpenError(msg) | BackendError::ExtractionError(msg) => {
                Self::Extraction(msg)
            }
            BackendError::Io(e) => Self::Extraction(e.to_string()),
        }
    }

    fn write(err: std::io::Error) -> Self {
        Self::Write(err.to_string())
    }
}

/// Outcome of processing one discovered PDF.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    Converted {
        pages: usize,
        pages_with_text: usize,
    },
    /// Output already existed and overwrite was off; the PDF was not opened.
    Skipped,
    Failed(BatchError),
}

#[derive(Debug, Clone)]
pub struct FileReport {
    pub input: PathBuf,
    pub output: PathBuf,
    pub outcome: FileOutcome,
}

/// Aggregate result of a batch run.
#[derive(Debug, Clone, Default)]
pub struct BatchSummary {
    pub found: usize,
    pub converted: usize,
    pub skipped: usize,
    pub failed: usize,
    /// One report per discovered file, in processing order.
    pub reports: Vec<FileReport>,
}

impl BatchSummary {
    fn record(&mut self, report: FileReport) {
        match report.outcome {
            FileOutcome::Converted { .. } => self.converted += 1,
            FileOutcome::Skipped => self.skipped += 1,
            FileOutcome::Failed(_) => self.failed += 1,
        }
        self.reports.push(report);
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }

    pub fn failures(&self) -> impl Iterator<Item = &FileReport> {
        self.reports
            .iter()
            .filter(|r| matches!(r.outcome, FileOutcome::Failed(_)))
    }
}

/// Run parameters shared by every file in the batch.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Replace existing `.txt` outputs instead of skipping them.
    pub overwrite: bool,
    /// Password tried on every encrypted PDF.
    pub password: Option<String>,
    /// Order each extension group by file name instead of directory order.
    pub sort: bool,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            overwrite: false,
            password: None,
            sort: true,
        }
    }
}

/// Converts every PDF in a directory into a `.txt` file, one file at a time.
pub struct BatchExtractor<'a> {
    backend: &'a dyn PdfBackend,
    options: BatchOptions,
}

impl<'a> BatchExtractor<'a> {
    pub fn new(backend: &'a dyn PdfBackend, options: BatchOptions) -> Self {
        Self { backend, options }
    }

    /// Process every PDF in `pdf_dir`, writing outputs into `txt_dir`.
    ///
    /// Per-file failures are logged and recorded in the returned summary.
    /// An unreadable `pdf_dir` is logged and yields an empty summary.
    pub fn run(
        &self,
        pdf_dir: &Path,
        txt_dir: &Path,
        progress: impl Fn(ProgressEvent),
    ) -> BatchSummary {
        let pdf_files = match discover_pdfs(pdf_dir, self.options.sort) {
            Ok(files) => files,
            Err(e) => {
                tracing::error!(dir = %pdf_dir.display(), error = %e, "Failed to read PDF directory");
                Vec::new()
            }
        };

        let total = pdf_files.len();
        tracing::info!("Found {} PDF files", total);
        progress(ProgressEvent::Started { total });

        let mut summary = BatchSummary {
            found: total,
            ..Default::default()
        };

        for (index, pdf_file) in pdf_files.into_iter().enumerate() {
            progress(ProgressEvent::Processing {
                index,
                total,
                path: pdf_file.clone(),
            });
            let report = self.process_file(&pdf_file, txt_dir);
            progress(ProgressEvent::Finished {
                index,
                total,
                report: Box::new(report.clone()),
            });
            summary.record(report);
        }

        progress(ProgressEvent::Completed {
            converted: summary.converted,
            skipped: summary.skipped,
            failed: summary.failed,
        });
        summary
    }

    /// Apply the skip/overwrite policy to one PDF and convert it if needed.
    pub fn process_file(&self, pdf_path: &Path, txt_dir: &Path) -> FileReport {
        let txt_path = output_path_for(pdf_path, txt_dir);

        let outcome = if !self.options.overwrite && txt_path.exists() {
            tracing::warn!("File {} already exists. Skipping...", txt_path.display());
            FileOutcome::Skipped
        } else {
            match self.convert(pdf_path, &txt_path) {
                Ok(outcome) => {
                    tracing::info!("Successfully processed {}", pdf_path.display());
                    outcome
                }
                Err(e) => {
                    tracing::error!("Failed to process {}: {}", pdf_path.display(), e);
                    FileOutcome::Failed(e)
                }
            }
        };

        FileReport {
            input: pdf_path.to_path_buf(),
            output: txt_path,
            outcome,
        }
    }

    /// Open the PDF, then stream each page's text into `txt_path`.
    ///
    /// The output is created only after the PDF opens. On a later error the
    /// partially written output is left in place.
    fn convert(&self, pdf_path: &Path, txt_path: &Path) -> Result<FileOutcome, BatchError> {
        let document = self
            .backend
            .open(pdf_path, self.options.password.as_deref())
            .map_err(BatchError::open)?;

        let mut writer = BufWriter::new(File::create(txt_path).map_err(BatchError::write)?);

        let pages = document.page_count().map_err(BatchError::extraction)?;
        let mut pages_with_text = 0;
        for index in 0..pages {
            let Some(text) = document.page_text(index).map_err(BatchError::extraction)? else {
                continue;
            };
            writer
                .write_all(text.as_bytes())
                .map_err(BatchError::write)?;
            writer.write_all(b"\n").map_err(BatchError::write)?;
            pages_with_text += 1;
        }
        writer.flush().map_err(BatchError::write)?;

        tracing::debug!(
            path = %pdf_path.display(),
            pages,
            pages_with_text,
            "extracted pages"
        );
        Ok(FileOutcome::Converted {
            pages,
            pages_with_text,
        })
    }
}
