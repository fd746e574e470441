use std::path::{Path, PathBuf};

pub mod backend;
pub mod batch;
pub mod config_file;
pub mod discover;

// Re-export for convenience
pub use backend::{BackendError, PdfBackend, PdfDocument};
pub use batch::{BatchError, BatchExtractor, BatchOptions, BatchSummary, FileOutcome, FileReport};
pub use config_file::{ConfigError, ConfigFile, load_config};
pub use discover::{discover_pdfs, output_path_for};

/// Progress events emitted during a batch run.
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// Discovery finished; `total` files will be processed.
    Started { total: usize },
    Processing {
        index: usize,
        total: usize,
        path: PathBuf,
    },
    Finished {
        index: usize,
        total: usize,
        report: Box<FileReport>,
    },
    Completed {
        converted: usize,
        skipped: usize,
        failed: usize,
    },
}

/// Convert every `*.pdf` / `*.PDF` in `pdf_dir` into a `.txt` file in `txt_dir`.
///
/// Existing outputs are skipped unless `overwrite` is set. `password` is
/// applied to every encrypted PDF. Individual failures never abort the run;
/// inspect the returned summary to detect them.
pub fn run(
    backend: &dyn PdfBackend,
    pdf_dir: &Path,
    txt_dir: &Path,
    overwrite: bool,
    password: Option<&str>,
) -> BatchSummary {
    let options = BatchOptions {
        overwrite,
        password: password.map(str::to_string),
        ..Default::default()
    };
    BatchExtractor::new(backend, options).run(pdf_dir, txt_dir, |_| {})
}
