//! Element-wise residue between two grids.

use crate::error::{CoreError, Result};
use burn::tensor::backend::Backend;
use burn::tensor::Tensor;

/// Compute the element-wise signed residue `first - second`.
///
/// Values stay in the backend's float domain, so the result may be negative.
/// The two grids must have the same shape; a disagreement fails with
/// [`CoreError::ShapeMismatch`] before any arithmetic happens.
pub fn residue<B: Backend>(first: Tensor<B, 2>, second: Tensor<B, 2>) -> Result<Tensor<B, 2>> {
    if first.dims() != second.dims() {
        return Err(CoreError::ShapeMismatch {
            expected: first.dims().to_vec(),
            actual: second.dims().to_vec(),
        });
    }
    Ok(first.sub(second))
}
