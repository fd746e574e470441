use std::io::Write;

use owo_colors::OwoColorize;
use pdftext_core::{BatchSummary, FileOutcome};

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

/// Print the end-of-run summary, followed by one line per failed file.
pub fn print_summary(
    w: &mut dyn Write,
    summary: &BatchSummary,
    color: ColorMode,
) -> std::io::Result<()> {
    if summary.found == 0 {
        writeln!(w, "No PDF files found.")?;
        return Ok(());
    }

    if color.enabled() {
        writeln!(
            w,
            "{} {} converted, {} skipped, {} failed ({} found)",
            "Done:".bold(),
            summary.converted.to_string().green(),
            summary.skipped.to_string().yellow(),
            summary.failed.to_string().red(),
            summary.found
        )?;
    } else {
        writeln!(
            w,
            "Done: {} converted, {} skipped, {} failed ({} found)",
            summary.converted, summary.skipped, summary.failed, summary.found
        )?;
    }

    for report in summary.failures() {
        let FileOutcome::Failed(ref err) = report.outcome else {
            continue;
        };
        if color.enabled() {
            writeln!(w, "  {} {}: {}", "FAILED".red(), report.input.display(), err)?;
        } else {
            writeln!(w, "  FAILED {}: {}", report.input.display(), err)?;
        }
    }
    Ok(())
}
