use burn::tensor::backend::Backend;
use burn::tensor::{Shape, Tensor, TensorData};
use dicom::dictionary_std::tags;
use dicom::object::{open_file, FileDicomObject, InMemDicomObject};
use dicom::pixeldata::{ConvertOptions, ModalityLutOption, PixelDecoder};
use residu_core::filter::gaussian::DEFAULT_SIGMA;
use residu_core::filter::rotate::{quarter_turns_for_degrees, DEFAULT_ROTATION_DEGREES};
use residu_core::{rotate_quarter_turns, GaussianFilter, Position};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// A scan file could not be decoded into a usable record.
#[derive(Error, Debug)]
pub enum DecodeError {
    /// The file could not be opened or parsed as a DICOM object.
    #[error("failed to open DICOM file {path:?}")]
    Open {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The pixel data attribute is missing or could not be decoded.
    #[error("failed to decode pixel data in {path:?}")]
    PixelData {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The pixel data is not a single-frame grayscale grid.
    #[error("{path:?} is not a single-frame grayscale image: {rows}x{columns} with {samples} samples")]
    UnsupportedLayout {
        path: PathBuf,
        rows: u32,
        columns: u32,
        samples: usize,
    },

    /// ImagePositionPatient is absent, non-numeric, or has fewer than three
    /// components.
    #[error("missing or invalid ImagePositionPatient in {path:?}")]
    MissingPosition { path: PathBuf },
}

/// A scan slice decoded together with its Gaussian-smoothed counterpart.
///
/// Both grids share the native image shape; pixel samples are converted to
/// the backend float element as stored, without applying the modality LUT.
/// Records are immutable once constructed.
#[derive(Debug, Clone)]
pub struct SmoothedScan<B: Backend> {
    raw: Tensor<B, 2>,
    smoothed: Tensor<B, 2>,
    position: Position,
}

impl<B: Backend> SmoothedScan<B> {
    /// Open a scan file and smooth it with the default sigma of 3 grid cells.
    pub fn open<P: AsRef<Path>>(path: P, device: &B::Device) -> Result<Self, DecodeError> {
        Self::open_with_sigma(path, DEFAULT_SIGMA, device)
    }

    /// Open a scan file and smooth it with the given sigma (in grid cells).
    pub fn open_with_sigma<P: AsRef<Path>>(
        path: P,
        sigma: f64,
        device: &B::Device,
    ) -> Result<Self, DecodeError> {
        let slice = decode_slice(path.as_ref())?;
        let position = slice.position;
        let raw = slice.into_tensor::<B>(device);
        let smoothed = GaussianFilter::new(sigma).apply(raw.clone());

        Ok(Self {
            raw,
            smoothed,
            position,
        })
    }

    /// The pixel grid as stored in the file.
    pub fn raw(&self) -> &Tensor<B, 2> {
        &self.raw
    }

    /// The Gaussian-smoothed pixel grid, same shape as `raw`.
    pub fn smoothed(&self) -> &Tensor<B, 2> {
        &self.smoothed
    }

    /// Position of the scan plane in patient space.
    pub fn position(&self) -> Position {
        self.position
    }
}

/// A scan slice decoded together with a rotated counterpart.
///
/// The rotation is counter-clockwise by whole quarter turns, 180 degrees by
/// default; angles not divisible by 90 truncate toward the lower multiple.
#[derive(Debug, Clone)]
pub struct RotatedScan<B: Backend> {
    raw: Tensor<B, 2>,
    rotated: Tensor<B, 2>,
    position: Position,
}

impl<B: Backend> RotatedScan<B> {
    /// Open a scan file and rotate it by the default 180 degrees.
    pub fn open<P: AsRef<Path>>(path: P, device: &B::Device) -> Result<Self, DecodeError> {
        Self::open_with_angle(path, DEFAULT_ROTATION_DEGREES, device)
    }

    /// Open a scan file and rotate it by the given angle in degrees.
    pub fn open_with_angle<P: AsRef<Path>>(
        path: P,
        degrees: i32,
        device: &B::Device,
    ) -> Result<Self, DecodeError> {
        let slice = decode_slice(path.as_ref())?;
        let position = slice.position;
        let raw = slice.into_tensor::<B>(device);
        let rotated = rotate_quarter_turns(raw.clone(), quarter_turns_for_degrees(degrees));

        Ok(Self {
            raw,
            rotated,
            position,
        })
    }

    /// The pixel grid as stored in the file.
    pub fn raw(&self) -> &Tensor<B, 2> {
        &self.raw
    }

    /// The rotated pixel grid; width and height swap on odd quarter-turn counts.
    pub fn rotated(&self) -> &Tensor<B, 2> {
        &self.rotated
    }

    /// Position of the scan plane in patient space.
    pub fn position(&self) -> Position {
        self.position
    }
}

/// A decoded slice before tensor conversion.
struct DecodedSlice {
    pixels: Vec<f32>,
    rows: usize,
    columns: usize,
    position: Position,
}

impl DecodedSlice {
    fn into_tensor<B: Backend>(self, device: &B::Device) -> Tensor<B, 2> {
        let data = TensorData::new(self.pixels, Shape::new([self.rows, self.columns]));
        Tensor::from_data(data, device)
    }
}

fn decode_slice(path: &Path) -> Result<DecodedSlice, DecodeError> {
    let obj = open_file(path).map_err(|e| DecodeError::Open {
        path: path.to_path_buf(),
        source: Box::new(e),
    })?;

    let position = get_f64_vec(&obj, tags::IMAGE_POSITION_PATIENT)
        .and_then(|v| Position::from_slice(&v))
        .ok_or_else(|| DecodeError::MissingPosition {
            path: path.to_path_buf(),
        })?;

    let decoded = obj.decode_pixel_data().map_err(|e| DecodeError::PixelData {
        path: path.to_path_buf(),
        source: Box::new(e),
    })?;
    let rows = decoded.rows() as usize;
    let columns = decoded.columns() as usize;

    // Stored values, no modality LUT: the residue is defined over the raw
    // sample domain.
    let options = ConvertOptions::new().with_modality_lut(ModalityLutOption::None);
    let pixels = decoded
        .to_vec_with_options::<f32>(&options)
        .map_err(|e| DecodeError::PixelData {
            path: path.to_path_buf(),
            source: Box::new(e),
        })?;

    if pixels.len() != rows * columns {
        return Err(DecodeError::UnsupportedLayout {
            path: path.to_path_buf(),
            rows: rows as u32,
            columns: columns as u32,
            samples: pixels.len(),
        });
    }

    Ok(DecodedSlice {
        pixels,
        rows,
        columns,
        position,
    })
}

fn get_f64_vec(obj: &FileDicomObject<InMemDicomObject>, tag: dicom::core::Tag) -> Option<Vec<f64>> {
    obj.element(tag).ok()?.to_multi_float64().ok()
}
