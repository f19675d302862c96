//! Image plane position in patient space.
//!
//! The position identifies where a scan slice lies in the patient coordinate
//! system, taken from the first three components of the DICOM
//! ImagePositionPatient attribute.

use nalgebra::Point3;
use std::fmt;

/// Position of a scan plane in patient space.
///
/// This is a thin wrapper around nalgebra's `Point3<f64>` to provide
/// domain-specific semantics while keeping nalgebra's operations available.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position(pub Point3<f64>);

impl Position {
    /// Create a new position from patient-space coordinates.
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self(Point3::new(x, y, z))
    }

    /// Create a position from the first three components of a coordinate
    /// slice, or `None` if fewer than three components are present.
    pub fn from_slice(coords: &[f64]) -> Option<Self> {
        if coords.len() < 3 {
            return None;
        }
        Some(Self::new(coords[0], coords[1], coords[2]))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.0.x, self.0.y, self.0.z)
    }
}

/// Check whether two scan planes share the same position.
///
/// Comparison is exact, component-wise floating-point equality. This is
/// brittle against representation differences but matches the decoded DICOM
/// attribute values, so two slices of the same series at the same location
/// compare equal and distinct slice locations compare unequal.
pub fn same_position(a: &Position, b: &Position) -> bool {
    a == b
}
