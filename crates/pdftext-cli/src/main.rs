use std::io::IsTerminal;
use std::path::PathBuf;

use clap::Parser;
use pdftext_core::{BatchExtractor, BatchOptions, ConfigError, ConfigFile};
use pdftext_mupdf::MupdfBackend;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::util::SubscriberInitExt;

mod output;
mod progress;

use output::ColorMode;

/// Extract text from PDF files and save it as .txt files
#[derive(Parser, Debug)]
#[command(name = "pdftext", version, about, long_about = None)]
struct Cli {
    /// Directory containing the PDF files
    pdf_dir: PathBuf,

    /// Directory to save the .txt files
    txt_dir: PathBuf,

    /// Overwrite existing .txt files
    #[arg(short, long)]
    overwrite: bool,

    /// Skip existing .txt files even if the config file enables overwrite
    #[arg(long, conflicts_with = "overwrite")]
    no_overwrite: bool,

    /// Password for encrypted PDFs (falls back to PDFTEXT_PASSWORD)
    #[arg(short, long)]
    password: Option<String>,

    /// Keep directory order instead of sorting by file name
    #[arg(long)]
    no_sort: bool,

    /// Hide the progress bar
    #[arg(long)]
    no_progress: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Exit with a non-zero status if any file failed
    #[arg(long)]
    fail_on_error: bool,

    /// Log per-page details
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long)]
    quiet: bool,
}

/// Effective run settings after layering CLI flags > env vars > config file > defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Settings {
    overwrite: bool,
    password: Option<String>,
    sort: bool,
    progress: bool,
    color: bool,
    fail_on_error: bool,
    log_level: String,
}

impl Settings {
    fn resolve(cli: &Cli, env_password: Option<String>, config: &ConfigFile) -> Self {
        let log_level = if cli.verbose {
            "debug".to_string()
        } else if cli.quiet {
            "warn".to_string()
        } else {
            config.log_level().unwrap_or("info").to_string()
        };

        Self {
            overwrite: cli.overwrite
                || (!cli.no_overwrite && config.overwrite().unwrap_or(false)),
            password: cli.password.clone().or(env_password),
            sort: !cli.no_sort && config.sort().unwrap_or(true),
            progress: !cli.no_progress && config.progress().unwrap_or(true),
            color: !cli.no_color && config.color().unwrap_or(true),
            fail_on_error: cli.fail_on_error || config.fail_on_error().unwrap_or(false),
            log_level,
        }
    }

    fn batch_options(&self) -> BatchOptions {
        BatchOptions {
            overwrite: self.overwrite,
            password: self.password.clone(),
            sort: self.sort,
        }
    }
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let (config, config_errors) = pdftext_core::load_config();
    let settings = Settings::resolve(&cli, std::env::var("PDFTEXT_PASSWORD").ok(), &config);

    let bar = progress::new_bar(settings.progress);
    init_logging(&settings.log_level, bar.clone());
    report_config_errors(&config_errors);

    if !cli.pdf_dir.is_dir() {
        anyhow::bail!("PDF directory not found: {}", cli.pdf_dir.display());
    }
    if !cli.txt_dir.is_dir() {
        anyhow::bail!(
            "Output directory not found: {} (it must already exist)",
            cli.txt_dir.display()
        );
    }

    tracing::debug!(
        overwrite = settings.overwrite,
        sort = settings.sort,
        password = settings.password.is_some(),
        "starting batch"
    );

    let backend = MupdfBackend::new();
    let extractor = BatchExtractor::new(&backend, settings.batch_options());
    let summary = extractor.run(&cli.pdf_dir, &cli.txt_dir, |event| {
        progress::update(&bar, &event)
    });
    bar.finish_and_clear();

    let color = ColorMode(settings.color && std::io::stdout().is_terminal());
    output::print_summary(&mut std::io::stdout(), &summary, color)?;

    if settings.fail_on_error && summary.has_failures() {
        anyhow::bail!("{} of {} files failed", summary.failed, summary.found);
    }

    Ok(())
}

/// Install the global subscriber: `timestamp LEVEL message` on stderr.
/// `RUST_LOG` takes precedence over `level`.
fn init_logging(level: &str, bar: indicatif::ProgressBar) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    build_subscriber(filter, progress::SuspendingWriter::new(bar)).init();
}

fn build_subscriber<W>(
    filter: EnvFilter,
    writer: W,
) -> impl tracing::Subscriber + Send + Sync + 'static
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(writer)
        .finish()
}

/// Config files are loaded before the subscriber exists, so their errors
/// are logged here instead of at load time.
fn report_config_errors(errors: &[ConfigError]) {
    for err in errors {
        tracing::warn!("{}", err);
    }
}
