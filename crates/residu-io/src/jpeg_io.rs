use burn::tensor::backend::Backend;
use burn::tensor::Tensor;
use image::GrayImage;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// A grid could not be encoded as a raster image.
#[derive(Error, Debug)]
pub enum EncodeError {
    /// The tensor backend refused to hand out the grid values.
    #[error("failed to read grid values from the tensor backend: {0}")]
    Grid(String),

    /// The image codec or the filesystem rejected the write.
    #[error("failed to write image {path:?}")]
    Write {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// Write a floating-point grid as an 8-bit grayscale JPEG.
///
/// Residue values may be negative and are not bounded to a displayable
/// range, so the grid is rescaled into 0..=255 with a min/max normalization
/// before encoding (normalization math runs in f64). A constant grid maps to
/// all-zero pixels. An existing file at `path` is overwritten.
pub fn write_jpeg<B: Backend>(path: &Path, grid: &Tensor<B, 2>) -> Result<(), EncodeError> {
    let [rows, columns] = grid.dims();
    let values = grid
        .clone()
        .into_data()
        .to_vec::<f32>()
        .map_err(|e| EncodeError::Grid(format!("{e:?}")))?;

    let min = values.iter().fold(f64::INFINITY, |m, &v| m.min(v as f64));
    let max = values.iter().fold(f64::NEG_INFINITY, |m, &v| m.max(v as f64));
    let range = max - min;

    let buffer: Vec<u8> = if range > 0.0 {
        values
            .iter()
            .map(|&v| ((v as f64 - min) / range * 255.0).round() as u8)
            .collect()
    } else {
        vec![0; rows * columns]
    };

    let image = GrayImage::from_raw(columns as u32, rows as u32, buffer)
        .ok_or_else(|| EncodeError::Grid("pixel buffer does not match grid dimensions".into()))?;

    image.save(path).map_err(|e| EncodeError::Write {
        path: path.to_path_buf(),
        source: e,
    })
}
