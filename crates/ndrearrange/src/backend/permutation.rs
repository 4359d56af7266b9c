//! Permutation backend trait.

use crate::scalar::Scalar;
use crate::tensor::DenseTensor;

/// Backend trait for DenseTensor permutation.
pub trait PermutationBackend {
    /// Permute `src` into `dest`.
    ///
    /// `perm[i]` gives the source dimension for the i-th dimension of `dest`.
    ///
    /// # Panics
    ///
    /// Panics if `dest` does not have the permuted shape of `src`.
    fn permute_into<ElT: Scalar>(
        dest: &mut DenseTensor<ElT>,
        src: &DenseTensor<ElT>,
        perm: &[usize],
    );
}
