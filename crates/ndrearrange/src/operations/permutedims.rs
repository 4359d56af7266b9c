//! Axis permutation.
//!
//! ```text
//! permutedims(tensor, perm)
//!     → validate permutation
//!     → allocate output with permuted shape
//!     → permutedims_into(output, tensor, perm)
//! ```

use crate::backend::{GenericBackend, PermutationBackend};
use crate::error::TensorError;
use crate::scalar::Scalar;
use crate::tensor::DenseTensor;

/// Permute the dimensions of a DenseTensor, returning a new DenseTensor.
///
/// `perm[i]` gives the source dimension for the i-th dimension of the result.
///
/// # Errors
///
/// Returns error if `perm` is not a valid permutation of `0..ndim`.
///
/// # Examples
///
/// ```
/// use ndrearrange::DenseTensor;
/// use ndrearrange::operations::permutedims;
///
/// let t: DenseTensor<f64> = DenseTensor::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3]).unwrap();
/// let t2 = permutedims(&t, &[1, 0]).unwrap();
/// assert_eq!(t2.shape(), &[3, 2]);
/// assert_eq!(t2.data(), &[1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);
/// ```
pub fn permutedims<T: Scalar>(
    tensor: &DenseTensor<T>,
    perm: &[usize],
) -> Result<DenseTensor<T>, TensorError> {
    validate_permutation(perm, tensor.ndim())?;

    let new_shape: Vec<usize> = perm.iter().map(|&p| tensor.shape()[p]).collect();
    let mut result = DenseTensor::zeros(&new_shape);
    permutedims_into(&mut result, tensor, perm);

    Ok(result)
}

/// Permute DenseTensor dimensions into an existing output tensor.
///
/// # Panics
///
/// Panics if dest shape doesn't match the permuted src shape.
pub fn permutedims_into<T: Scalar>(
    dest: &mut DenseTensor<T>,
    src: &DenseTensor<T>,
    perm: &[usize],
) {
    GenericBackend::permute_into(dest, src, perm);
}

/// Whether `perm` leaves every axis in place.
pub fn is_identity(perm: &[usize]) -> bool {
    perm.iter().enumerate().all(|(i, &p)| i == p)
}

/// Validate that perm is a valid permutation of 0..ndim.
fn validate_permutation(perm: &[usize], ndim: usize) -> Result<(), TensorError> {
    let invalid = || TensorError::InvalidPermutation {
        perm: perm.to_vec(),
        ndim,
    };
    if perm.len() != ndim {
        return Err(invalid());
    }

    let mut seen = vec![false; ndim];
    for &p in perm {
        if p >= ndim || seen[p] {
            return Err(invalid());
        }
        seen[p] = true;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scalar::c64;

    #[test]
    fn test_permutedims_transpose_c64() {
        let data: Vec<c64> = (1..=6).map(|x| c64::new(x as f64, -(x as f64))).collect();
        let t: DenseTensor<c64> = DenseTensor::from_vec(data, &[2, 3]).unwrap();

        let t2 = permutedims(&t, &[1, 0]).unwrap();
        assert_eq!(t2.shape(), &[3, 2]);
        for i in 0..2 {
            for j in 0..3 {
                assert_eq!(t.get(&[i, j]), t2.get(&[j, i]));
            }
        }
    }

    #[test]
    fn test_permutedims_identity() {
        let t: DenseTensor<f64> =
            DenseTensor::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3]).unwrap();
        let t2 = permutedims(&t, &[0, 1]).unwrap();
        assert_eq!(t.data(), t2.data());
        assert!(is_identity(&[0, 1, 2]));
        assert!(!is_identity(&[1, 0]));
        assert!(is_identity(&[]));
    }

    #[test]
    fn test_permutedims_invalid() {
        let t: DenseTensor<f64> = DenseTensor::zeros(&[2, 3]);

        assert!(permutedims(&t, &[0]).is_err());
        assert!(permutedims(&t, &[0, 1, 2]).is_err());
        assert!(permutedims(&t, &[0, 2]).is_err());
        assert_eq!(
            permutedims(&t, &[0, 0]),
            Err(TensorError::InvalidPermutation {
                perm: vec![0, 0],
                ndim: 2
            })
        );
    }

    #[test]
    fn test_permutedims_scalar() {
        let t: DenseTensor<f64> = DenseTensor::from_vec(vec![7.0], &[]).unwrap();
        let t2 = permutedims(&t, &[]).unwrap();
        assert_eq!(t2.data(), &[7.0]);
    }
}
