//! Batch processing command

use crate::BatchArgs;
use anyhow::{Context, Result, bail};
use ffcc_ops::Enhancer;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info, trace, warn};

pub fn run(args: BatchArgs, verbose: bool) -> Result<()> {
    trace!(pattern = %args.input, "batch::run");

    let files = collect_inputs(&args.input)?;

    if files.is_empty() {
        bail!("No files match pattern: {}", args.input);
    }

    info!(files = files.len(), pattern = %args.input, "Starting batch processing");

    if verbose {
        println!("Found {} files matching '{}'", files.len(), args.input);
    }

    let model = super::load_model(&args.model)?;
    // images run in parallel, so each histogram stays serial
    let enhancer = Enhancer::new(&model);

    std::fs::create_dir_all(&args.output_dir)
        .with_context(|| format!("Failed to create: {}", args.output_dir.display()))?;

    let results: Vec<Result<()>> = files
        .par_iter()
        .map(|input| process_file(input, &args.output_dir, args.format.as_deref(), &enhancer))
        .collect();

    // Report results
    let mut success = 0;
    let mut failed = 0;
    for r in results {
        match r {
            Ok(()) => success += 1,
            Err(e) => {
                failed += 1;
                eprintln!("Error: {:#}", e);
            }
        }
    }

    info!(success = success, failed = failed, "Batch processing complete");
    println!("Processed: {} success, {} failed", success, failed);

    if failed > 0 {
        bail!("{} files failed", failed);
    }

    Ok(())
}

/// Expands a glob pattern. Entries that cannot be read are logged and skipped.
fn collect_inputs(pattern: &str) -> Result<Vec<PathBuf>> {
    let files = glob::glob(pattern)
        .with_context(|| format!("Invalid pattern: {}", pattern))?
        .filter_map(|entry| match entry {
            Ok(path) => Some(path),
            Err(e) => {
                warn!(path = %e.path().display(), error = %e.error(), "Skipping unreadable path");
                None
            }
        })
        .collect();
    Ok(files)
}

fn process_file(input: &Path, output_dir: &Path, format: Option<&str>, enhancer: &Enhancer) -> Result<()> {
    let output = output_path(input, output_dir, format)?;
    let image = super::load_image(input)?;
    let corrected = image
        .enhance(enhancer)
        .with_context(|| format!("Failed to enhance: {}", input.display()))?;
    super::save_image(&output, &corrected)?;
    debug!(input = %input.display(), output = %output.display(), "Processed");
    Ok(())
}

/// Output file: same stem in `output_dir`, extension from `format` or the input.
fn output_path(input: &Path, output_dir: &Path, format: Option<&str>) -> Result<PathBuf> {
    let stem = input
        .file_stem()
        .with_context(|| format!("No file name: {}", input.display()))?;
    let ext = match format {
        Some(f) => f.trim_start_matches('.').to_string(),
        None => input
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_else(|| "png".to_string()),
    };
    Ok(output_dir.join(stem).with_extension(ext))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ffcc_core::{Image, Model};

    #[test]
    fn test_output_path() {
        let out = Path::new("out");
        assert_eq!(output_path(Path::new("in/a.jpg"), out, None).unwrap(), out.join("a.jpg"));
        assert_eq!(output_path(Path::new("in/a.jpg"), out, Some(".png")).unwrap(), out.join("a.png"));
        assert_eq!(output_path(Path::new("in/raw"), out, None).unwrap(), out.join("raw.png"));
    }

    #[test]
    fn test_collect_inputs() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.png", "a.png", "notes.txt"] {
            std::fs::write(dir.path().join(name), b"").unwrap();
        }
        let pattern = format!("{}/*.png", dir.path().display());
        let files = collect_inputs(&pattern).unwrap();
        assert_eq!(files, vec![dir.path().join("a.png"), dir.path().join("b.png")]);

        assert!(collect_inputs("[unclosed").is_err());
    }

    #[test]
    fn test_process_file_writes_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("warm.png");
        let pixels = (0..16u8).map(|i| [20 + i, 40 + 2 * i, 80 + 4 * i]).collect();
        super::super::save_image(&input, &Image::from_pixels(4, 4, pixels).unwrap()).unwrap();

        let out_dir = dir.path().join("out");
        std::fs::create_dir_all(&out_dir).unwrap();
        let enhancer = Enhancer::new(&Model::identity());
        process_file(&input, &out_dir, None, &enhancer).unwrap();

        let written = image::open(out_dir.join("warm.png")).unwrap().to_rgb8();
        assert_eq!(written.dimensions(), (4, 4));
    }
}
