//! Discovery, validation, residue computation and persistence.

use crate::error::{PipelineError, Result};
use burn::tensor::backend::Backend;
use residu_core::{residue, same_position};
use residu_io::{write_jpeg, SmoothedScan};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Subdirectory of the input directory that receives the residual images.
const OUTPUT_DIR: &str = "residues";

/// Output file name for the raw residue.
const RAW_RESIDUE_FILE: &str = "unfiltered_residu.jpeg";

/// Output file name for the smoothed residue.
const SMOOTHED_RESIDUE_FILE: &str = "filtered_residu.jpeg";

/// List the scan files of `input_dir`, non-recursively.
///
/// Only entries with a `dcm` extension count. Paths are sorted
/// lexicographically so that which scan is treated as first, and with it the
/// sign of the residue, does not depend on filesystem enumeration order.
pub fn discover_scan_files(input_dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(input_dir).map_err(|e| PipelineError::Io {
        path: input_dir.to_path_buf(),
        source: e,
    })?;

    let mut paths: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "dcm"))
        .collect();
    paths.sort();

    Ok(paths)
}

/// Run the residue pipeline over `input_dir`.
///
/// Discovers the scan files, checks that there are exactly two, loads them
/// with the default smoothing sigma, checks that their patient-space
/// positions differ, computes the raw and smoothed residues, and writes
/// both as grayscale JPEG files under `input_dir/residues`. Reruns overwrite
/// the previous output.
///
/// Any violation aborts the run before later stages execute; output already
/// written when a write fails is left on disk.
pub fn run<B: Backend>(input_dir: &Path, device: &B::Device) -> Result<()> {
    let paths = discover_scan_files(input_dir)?;
    debug!("discovered {} scan file(s) in {:?}", paths.len(), input_dir);

    // Count check happens on the path list, before any decode work
    if paths.len() != 2 {
        return Err(PipelineError::IncorrectImageCount(paths.len()));
    }

    let first = SmoothedScan::<B>::open(&paths[0], device)?;
    let second = SmoothedScan::<B>::open(&paths[1], device)?;
    debug!(
        "loaded {:?} at {} and {:?} at {}",
        paths[0],
        first.position(),
        paths[1],
        second.position()
    );

    if same_position(&first.position(), &second.position()) {
        return Err(PipelineError::DuplicatePosition(first.position()));
    }

    let raw_residue = residue(first.raw().clone(), second.raw().clone())?;
    let smoothed_residue = residue(first.smoothed().clone(), second.smoothed().clone())?;

    let output_dir = input_dir.join(OUTPUT_DIR);
    // Idempotent, and tolerates another process creating it concurrently
    fs::create_dir_all(&output_dir).map_err(|e| PipelineError::Io {
        path: output_dir.clone(),
        source: e,
    })?;

    write_jpeg(&output_dir.join(RAW_RESIDUE_FILE), &raw_residue)?;
    write_jpeg(&output_dir.join(SMOOTHED_RESIDUE_FILE), &smoothed_residue)?;
    info!("residual images written to {:?}", output_dir);

    Ok(())
}
