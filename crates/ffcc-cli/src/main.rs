//! ffcc - White balance images with Fast Fourier Color Constancy
//!
//! Loads a pretrained filter/bias model and corrects one image, reports the
//! estimated illuminant, or processes a whole directory in parallel.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "ffcc")]
#[command(author, version, about = "White balance with Fast Fourier Color Constancy")]
#[command(long_about = "
Estimates the scene illuminant from a log-chrominance histogram and removes
the color cast. Models are JSON files with 256x256 matrices `f` (filter) and
`b` (bias).

Examples:
  ffcc enhance photo.jpg -m model.json -o photo_wb.png
  ffcc estimate photo.jpg -m model.json --json
  ffcc estimate photo.jpg -m model.json --response response.png
  ffcc batch -i 'shots/*.jpg' -m model.json -o corrected/
  ffcc -j 4 batch -i 'shots/*.tif' -m model.json -o out/
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Number of threads (0 = auto)
    #[arg(short = 'j', long, global = true, default_value = "0")]
    threads: usize,
}

#[derive(Subcommand)]
enum Commands {
    /// Correct the white balance of an image
    #[command(visible_alias = "e")]
    Enhance(EnhanceArgs),

    /// Print the estimated illuminant without writing an image
    #[command(visible_alias = "est")]
    Estimate(EstimateArgs),

    /// White balance every image matching a glob pattern
    Batch(BatchArgs),
}

#[derive(Args)]
struct EnhanceArgs {
    /// Input image
    input: PathBuf,

    /// Model file (JSON with `f` and `b`)
    #[arg(short, long)]
    model: PathBuf,

    /// Output image (8-bit)
    #[arg(short, long)]
    output: PathBuf,
}

#[derive(Args)]
struct EstimateArgs {
    /// Input image
    input: PathBuf,

    /// Model file (JSON with `f` and `b`)
    #[arg(short, long)]
    model: PathBuf,

    /// Machine-readable output (JSON)
    #[arg(long)]
    json: bool,

    /// Write the filter response as an 8-bit grayscale image
    #[arg(long)]
    response: Option<PathBuf>,
}

#[derive(Args)]
struct BatchArgs {
    /// Input pattern (glob, e.g. "shots/*.jpg")
    #[arg(short, long)]
    input: String,

    /// Model file (JSON with `f` and `b`)
    #[arg(short, long)]
    model: PathBuf,

    /// Output directory
    #[arg(short, long = "output")]
    output_dir: PathBuf,

    /// Output extension (defaults to the input's)
    #[arg(short, long)]
    format: Option<String>,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Configure thread pool
    if cli.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(cli.threads)
            .build_global()
            .context("Failed to configure thread pool")?;
    }

    match cli.command {
        Commands::Enhance(args) => commands::enhance::run(args, cli.verbose),
        Commands::Estimate(args) => commands::estimate::run(args, cli.verbose),
        Commands::Batch(args) => commands::batch::run(args, cli.verbose),
    }
}
