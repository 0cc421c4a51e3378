/// box-extract: static style-value extraction CLI
///
/// Extracts the values passed to matched components, calls and tagged
/// templates from TSX/JSX/TypeScript sources.
///
/// Modes:
/// - single: Extract one file
/// - dir: Extract a directory tree in parallel
use anyhow::{Context, Result};
use box_extractor::cli::{ExtractionConfig, OutputFormat, OutputWriter, ParallelExtractor};
use box_extractor::MatcherConfig;
use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "box-extract")]
#[command(about = "Static extraction of style values from TSX/JSX sources", long_about = None)]
#[command(version)]
struct Cli {
    /// Also write logs to a daily-rolling file in this directory
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract a single file
    Single {
        /// Path to source file
        #[arg(short, long)]
        file: PathBuf,

        /// Matcher configuration (TOML)
        #[arg(short, long)]
        config: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "json")]
        output: OutputFormatArg,
    },

    /// Extract every supported file under a directory (parallel)
    Dir {
        /// Directory to scan recursively
        #[arg(short, long)]
        directory: PathBuf,

        /// Matcher configuration (TOML)
        #[arg(short, long)]
        config: PathBuf,

        /// Number of parallel threads (defaults to CPU count)
        #[arg(short, long)]
        threads: Option<usize>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "ndjson")]
        output: OutputFormatArg,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormatArg {
    /// Standard JSON array (pretty-printed)
    Json,
    /// Newline-delimited JSON (streaming)
    Ndjson,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Json => OutputFormat::Json,
            OutputFormatArg::Ndjson => OutputFormat::Ndjson,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let _log_guard = init_logging(cli.log_dir.as_deref())?;

    match cli.command {
        Commands::Single {
            file,
            config,
            output,
        } => extract_single_file(&file, &config, output.into()),
        Commands::Dir {
            directory,
            config,
            threads,
            output,
        } => extract_directory(&directory, &config, threads, output.into()),
    }
}

/// stderr logging, plus a rolling file layer when `log_dir` is given
///
/// The returned guard must live until exit so buffered file logs are flushed.
fn init_logging(log_dir: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("box_extractor=warn"))?;
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let Some(log_dir) = log_dir else {
        tracing_subscriber::registry()
            .with(filter)
            .with(stderr_layer)
            .init();
        return Ok(None);
    };

    fs::create_dir_all(log_dir)
        .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;
    let (file_writer, guard) = non_blocking(rolling::daily(log_dir, "box-extract.log"));

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(
            fmt::layer()
                .with_writer(file_writer)
                .with_target(true)
                .with_ansi(false)
                .with_file(true)
                .with_line_number(true),
        )
        .init();
    Ok(Some(guard))
}

fn load_extractor(config: &Path, threads: Option<usize>) -> Result<ParallelExtractor> {
    let matchers = MatcherConfig::load(config)
        .and_then(|config| config.compile())
        .with_context(|| format!("Failed to load matcher config {}", config.display()))?;
    let config = ExtractionConfig {
        num_threads: threads.unwrap_or_else(num_cpus::get),
    };
    Ok(ParallelExtractor::new(config, matchers))
}

fn extract_single_file(file: &Path, config: &Path, format: OutputFormat) -> Result<()> {
    let extractor = load_extractor(config, Some(1))?;
    let extraction = extractor
        .extract_file(file)
        .with_context(|| format!("Failed to extract {}", file.display()))?;

    let mut writer = OutputWriter::stdout(format);
    writer.write_record(&extraction)?;
    writer.finish()?;
    Ok(())
}

fn extract_directory(
    directory: &Path,
    config: &Path,
    threads: Option<usize>,
    format: OutputFormat,
) -> Result<()> {
    let extractor = load_extractor(config, threads)?;
    let extractions = extractor.extract_directory(directory)?;
    info!(
        "Extracted {} files under {}",
        extractions.len(),
        directory.display()
    );

    let mut writer = OutputWriter::stdout(format);
    writer.write_batch(&extractions)?;
    writer.finish()?;
    Ok(())
}
