pub mod dicom_io;
pub mod jpeg_io;

pub use dicom_io::{DecodeError, RotatedScan, SmoothedScan};
pub use jpeg_io::{write_jpeg, EncodeError};
