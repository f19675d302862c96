use anyhow::{Context, Result};
use burn_ndarray::NdArray;
use clap::Parser;
use std::path::PathBuf;

type Backend = NdArray<f32>;

#[derive(Parser)]
#[command(name = "residu")]
#[command(about = "Compute the raw and Gaussian-smoothed residue of two DICOM scans")]
struct Cli {
    /// Directory holding exactly two .dcm scan files
    input_dir: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let device = Default::default();

    residu::run::<Backend>(&cli.input_dir, &device)
        .with_context(|| format!("residue pipeline failed for {:?}", cli.input_dir))?;

    Ok(())
}
