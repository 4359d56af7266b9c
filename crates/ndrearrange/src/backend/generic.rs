//! Generic (naive loop-based) backend implementation.

use crate::backend::{BroadcastBackend, PermutationBackend};
use crate::scalar::Scalar;
use crate::strides::{cartesian_to_linear, linear_to_cartesian_into};
use crate::tensor::DenseTensor;

/// Generic backend using naive index-mapping loops.
pub struct GenericBackend;

impl PermutationBackend for GenericBackend {
    fn permute_into<ElT: Scalar>(
        dest: &mut DenseTensor<ElT>,
        src: &DenseTensor<ElT>,
        perm: &[usize],
    ) {
        assert_eq!(perm.len(), dest.ndim(), "permutation rank must match dest");
        let old_shape = src.shape();
        // Copy strides to avoid borrow conflict with data_mut()
        let new_strides: Vec<usize> = dest.strides().to_vec();
        let src_data = src.data();
        let dest_data = dest.data_mut();

        let mut old_indices = vec![0; old_shape.len()];
        let mut new_indices = vec![0; perm.len()];
        for (linear_old, &value) in src_data.iter().enumerate() {
            linear_to_cartesian_into(linear_old, old_shape, &mut old_indices);

            // new_indices[i] = old_indices[perm[i]]
            for (slot, &p) in new_indices.iter_mut().zip(perm.iter()) {
                *slot = old_indices[p];
            }

            dest_data[cartesian_to_linear(&new_indices, &new_strides)] = value;
        }
    }
}

impl BroadcastBackend for GenericBackend {
    fn broadcast_into<ElT: Scalar>(
        dest: &mut DenseTensor<ElT>,
        src: &DenseTensor<ElT>,
        axes: &[Option<usize>],
    ) {
        assert_eq!(axes.len(), dest.ndim(), "axis map rank must match dest");
        let new_shape: Vec<usize> = dest.shape().to_vec();
        let src_shape = src.shape();
        let src_strides = src.strides();
        let src_data = src.data();
        let dest_data = dest.data_mut();

        let mut new_indices = vec![0; new_shape.len()];
        let mut old_indices = vec![0; src_shape.len()];
        for (linear_new, slot) in dest_data.iter_mut().enumerate() {
            linear_to_cartesian_into(linear_new, &new_shape, &mut new_indices);

            for (&idx, axis) in new_indices.iter().zip(axes.iter()) {
                if let Some(j) = *axis {
                    // Unit source axes are repeated.
                    old_indices[j] = if src_shape[j] == 1 { 0 } else { idx };
                }
            }

            *slot = src_data[cartesian_to_linear(&old_indices, src_strides)];
        }
    }
}
