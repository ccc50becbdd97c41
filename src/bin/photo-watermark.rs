use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use photo_watermark::{result_lines, BatchSummary, ProcessOptions, ProcessResult, WatermarkEngine};

#[derive(Parser)]
#[command(
    name = "photo-watermark",
    about = "Batch-apply a logo watermark, picking placement and light/dark variant per photo",
    version,
    after_help = "Example: photo-watermark -i photos -o marked -w white.png -b black.png\n\n\
                  A file that fails to load or save is reported and skipped; the rest of the\n\
                  batch still runs. Exit status is 1 if the watermark files are missing or if\n\
                  any file failed, 0 otherwise."
)]
struct Cli {
    /// Input folder (or a single image file)
    #[arg(short, long)]
    input: PathBuf,

    /// Output folder; created if missing
    #[arg(short, long)]
    output: PathBuf,

    /// Watermark used on dark regions
    #[arg(short, long, alias = "white_watermark", default_value = "white_watermark.png")]
    white_watermark: PathBuf,

    /// Watermark used on bright regions
    #[arg(short, long, alias = "black_watermark", default_value = "black_watermark.png")]
    black_watermark: PathBuf,

    /// JPEG output quality (1-100)
    #[arg(short = 'q', long, default_value_t = photo_watermark::DEFAULT_QUALITY,
          value_parser = clap::value_parser!(u8).range(1..=100))]
    quality: u8,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all non-error output
    #[arg(long)]
    quiet: bool,
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Warning: failed to install logger: {e}");
    }

    let opts = ProcessOptions {
        quality: cli.quality,
        verbose: cli.verbose,
        quiet: cli.quiet,
    };

    let engine = match WatermarkEngine::from_files(&cli.white_watermark, &cli.black_watermark) {
        Ok(e) => e,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };

    let input_path = cli.input.as_path();
    if !input_path.exists() {
        eprintln!("Error: Input path does not exist: {}", input_path.display());
        process::exit(1);
    }

    let results = if input_path.is_dir() {
        engine.process_directory(input_path, &cli.output, &opts)
    } else {
        vec![process_single(&engine, input_path, &cli.output, &opts)]
    };

    for r in &results {
        if opts.quiet && r.success {
            continue;
        }
        for line in result_lines(r, opts.verbose) {
            eprintln!("{line}");
        }
    }

    let summary = BatchSummary::from_results(&results);
    if !opts.quiet {
        eprintln!();
        eprintln!("{}", summary.line());
    }

    if summary.failed > 0 {
        process::exit(1);
    }
}

/// Watermark one file into `output_dir`, keeping its file name.
fn process_single(
    engine: &WatermarkEngine,
    input: &Path,
    output_dir: &Path,
    opts: &ProcessOptions,
) -> ProcessResult {
    let output = match input.file_name() {
        Some(name) => output_dir.join(name),
        None => output_dir.to_path_buf(),
    };
    engine.process_file(input, &output, opts)
}
