//! Enhance command

use crate::EnhanceArgs;
use anyhow::{Context, Result};
use ffcc_ops::Enhancer;
use tracing::{info, trace};

pub fn run(args: EnhanceArgs, verbose: bool) -> Result<()> {
    trace!(input = %args.input.display(), model = %args.model.display(), "enhance::run");

    let model = super::load_model(&args.model)?;
    let image = super::load_image(&args.input)?;

    if verbose {
        println!("Enhancing {} ({}x{})", args.input.display(), image.width(), image.height());
    }

    let enhancer = Enhancer::new(&model).with_parallel(true);
    let estimate = image
        .estimate(&enhancer)
        .with_context(|| format!("Failed to estimate illuminant: {}", args.input.display()))?;
    let output = image
        .correct(&enhancer, &estimate)
        .with_context(|| format!("Failed to enhance: {}", args.input.display()))?;

    if estimate.is_degenerate() {
        info!(input = %args.input.display(), "No usable pixels, illuminant taken from model bias");
    }

    super::save_image(&args.output, &output)?;

    info!(
        input = %args.input.display(),
        output = %args.output.display(),
        u = estimate.chromaticity().u,
        v = estimate.chromaticity().v,
        "White balance applied"
    );

    if verbose {
        println!("Done.");
    }

    Ok(())
}
