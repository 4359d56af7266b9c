//! Broadcast backend trait.

use crate::scalar::Scalar;
use crate::tensor::DenseTensor;

/// Backend trait for replicating a DenseTensor along new or unit axes.
pub trait BroadcastBackend {
    /// Fill `dest` from `src`.
    ///
    /// `axes[i]` is `Some(j)` when axis `i` of `dest` is read from axis `j` of
    /// `src` (either the same length, or length 1 and repeated), and `None`
    /// when axis `i` is new and every position along it gets the same data.
    ///
    /// # Panics
    ///
    /// Panics if `axes` does not match the rank of `dest`.
    fn broadcast_into<ElT: Scalar>(
        dest: &mut DenseTensor<ElT>,
        src: &DenseTensor<ElT>,
        axes: &[Option<usize>],
    );
}
