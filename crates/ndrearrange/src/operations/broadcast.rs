//! Broadcasting: replicate data along new or unit-length axes.
//!
//! ```text
//! broadcast(tensor, shape, axes)
//!     → validate axis map against both shapes
//!     → allocate output with target shape
//!     → broadcast_into(output, tensor, axes)
//! ```

use crate::backend::{BroadcastBackend, GenericBackend};
use crate::error::TensorError;
use crate::scalar::Scalar;
use crate::strides::checked_len;
use crate::tensor::DenseTensor;

/// Broadcast `tensor` into a new tensor of shape `shape`.
///
/// `axes[i]` says where axis `i` of the result comes from: `Some(j)` reads
/// source axis `j` (same length, or length 1 and repeated), `None` is a new
/// axis along which the data is copied. Every source axis must be used
/// exactly once.
///
/// # Errors
///
/// Returns `TensorError::InvalidBroadcast` if the map does not fit the shapes,
/// or `TensorError::SizeOverflow` if `shape` has more than `usize::MAX` elements.
///
/// # Examples
///
/// ```
/// use ndrearrange::DenseTensor;
/// use ndrearrange::operations::broadcast;
///
/// let t: DenseTensor<f64> = DenseTensor::from_vec(vec![1.0, 2.0], &[2]).unwrap();
/// let b = broadcast(&t, &[2, 3], &[Some(0), None]).unwrap();
/// assert_eq!(b.data(), &[1.0, 1.0, 1.0, 2.0, 2.0, 2.0]);
/// ```
pub fn broadcast<T: Scalar>(
    tensor: &DenseTensor<T>,
    shape: &[usize],
    axes: &[Option<usize>],
) -> Result<DenseTensor<T>, TensorError> {
    validate_axis_map(tensor.shape(), shape, axes)?;
    if checked_len(shape).is_none() {
        return Err(TensorError::SizeOverflow {
            shape: shape.to_vec(),
        });
    }

    let mut result = DenseTensor::zeros(shape);
    GenericBackend::broadcast_into(&mut result, tensor, axes);

    Ok(result)
}

fn validate_axis_map(
    from: &[usize],
    to: &[usize],
    axes: &[Option<usize>],
) -> Result<(), TensorError> {
    let invalid = || TensorError::InvalidBroadcast {
        from: from.to_vec(),
        to: to.to_vec(),
        axes: axes.to_vec(),
    };
    if axes.len() != to.len() {
        return Err(invalid());
    }

    let mut seen = vec![false; from.len()];
    for (&target, axis) in to.iter().zip(axes.iter()) {
        let Some(j) = *axis else { continue };
        if j >= from.len() || seen[j] || (from[j] != target && from[j] != 1) {
            return Err(invalid());
        }
        seen[j] = true;
    }
    if seen.iter().all(|&s| s) {
        Ok(())
    } else {
        Err(invalid())
    }
}
