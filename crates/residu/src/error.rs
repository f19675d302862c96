//! Error types for pipeline runs.

use residu_core::{CoreError, Position};
use residu_io::{DecodeError, EncodeError};
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for a pipeline run.
///
/// Every variant is fatal to the run: there is no retry, no partial-success
/// reporting, and no cleanup of output written before a later failure.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The input directory does not hold exactly two scan files.
    #[error("incorrect number of images: expected exactly 2 .dcm files, found {0}")]
    IncorrectImageCount(usize),

    /// Both scans sit at the same patient-space position, so they are not a
    /// valid pair.
    #[error("the DICOM files appear to be the same: both at position {0}")]
    DuplicatePosition(Position),

    /// A scan file could not be decoded.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// Residue computation failed (shape mismatch between the two grids).
    #[error(transparent)]
    Residue(#[from] CoreError),

    /// A residual image could not be encoded.
    #[error(transparent)]
    Encode(#[from] EncodeError),

    /// Directory listing or output-directory creation failed.
    #[error("failed to access {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for pipeline runs.
pub type Result<T> = std::result::Result<T, PipelineError>;
