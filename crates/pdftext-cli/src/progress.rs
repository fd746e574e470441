use std::io::Write;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use pdftext_core::ProgressEvent;
use tracing_subscriber::fmt::MakeWriter;

/// Progress bar for the batch, drawn on stderr. Hidden when `enabled` is false.
pub fn new_bar(enabled: bool) -> ProgressBar {
    if !enabled {
        return ProgressBar::hidden();
    }
    let style = ProgressStyle::with_template(
        "{spinner:.green} Processing PDF files [{bar:40.green/dim}] {pos}/{len} (eta {eta}) {msg}",
    )
    .unwrap_or_else(|_| ProgressStyle::default_bar())
    .progress_chars("=> ");
    let bar = ProgressBar::with_draw_target(Some(0), ProgressDrawTarget::stderr());
    bar.set_style(style);
    bar
}

pub fn update(bar: &ProgressBar, event: &ProgressEvent) {
    match event {
        ProgressEvent::Started { total } => bar.set_length(*total as u64),
        ProgressEvent::Processing { path, .. } => {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| path.display().to_string());
            bar.set_message(name);
        }
        ProgressEvent::Finished { .. } => bar.inc(1),
        ProgressEvent::Completed { .. } => bar.set_message(""),
    }
}

/// Log writer that hides the progress bar while a line is written, so log
/// output and the bar never overdraw each other on stderr.
#[derive(Clone)]
pub struct SuspendingWriter {
    bar: ProgressBar,
}

impl SuspendingWriter {
    pub fn new(bar: ProgressBar) -> Self {
        Self { bar }
    }
}

impl Write for SuspendingWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.bar.suspend(|| std::io::stderr().write(buf))
    }

    fn flush(&mut self) -> std::io::Result<()> {
        std::io::stderr().flush()
    }
}

impl<'a> MakeWriter<'a> for SuspendingWriter {
    type Writer = SuspendingWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
