//! Residue pipeline over a directory of two DICOM scans.
//!
//! The pipeline loads exactly two scan slices from a directory, validates
//! that they sit at different patient-space positions, subtracts them both
//! raw and Gaussian-smoothed, and writes the two residual images as JPEG
//! files under a `residues/` subdirectory of the input.

pub mod error;
pub mod pipeline;

pub use error::PipelineError;
pub use pipeline::run;
