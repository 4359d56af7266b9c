//! Stride computation utilities.
//!
//! Uses row-major (C) order: the last axis varies fastest. This is what gives
//! a merged group `(h w)` its usual meaning, with index `i_h * w + i_w`.

/// Compute row-major strides from shape.
///
/// For shape [d0, d1, d2], returns strides [d1*d2, d2, 1].
///
/// # Examples
///
/// ```
/// use ndrearrange::strides::compute_strides;
///
/// assert_eq!(compute_strides(&[3, 4, 5]), vec![20, 5, 1]);
/// assert_eq!(compute_strides(&[2, 3]), vec![3, 1]);
/// assert_eq!(compute_strides(&[5]), vec![1]);
/// assert_eq!(compute_strides(&[]), vec![]);
/// ```
pub fn compute_strides(shape: &[usize]) -> Vec<usize> {
    let mut strides = vec![0; shape.len()];
    let mut stride = 1;

    for (slot, &dim) in strides.iter_mut().zip(shape.iter()).rev() {
        *slot = stride;
        stride *= dim;
    }

    strides
}

/// Number of elements in `shape`, or `None` if it does not fit in `usize`.
///
/// ```
/// use ndrearrange::strides::checked_len;
///
/// assert_eq!(checked_len(&[3, 4, 5]), Some(60));
/// assert_eq!(checked_len(&[]), Some(1));
/// assert_eq!(checked_len(&[usize::MAX, 2]), None);
/// ```
pub fn checked_len(shape: &[usize]) -> Option<usize> {
    shape.iter().try_fold(1usize, |acc, &dim| acc.checked_mul(dim))
}

/// Convert cartesian indices to a linear index.
#[inline]
pub fn cartesian_to_linear(indices: &[usize], strides: &[usize]) -> usize {
    indices
        .iter()
        .zip(strides.iter())
        .map(|(&idx, &stride)| idx * stride)
        .sum()
}

/// Convert a linear index to cartesian indices for a row-major shape.
pub fn linear_to_cartesian(linear: usize, shape: &[usize]) -> Vec<usize> {
    let mut indices = vec![0; shape.len()];
    linear_to_cartesian_into(linear, shape, &mut indices);
    indices
}

/// Like [`linear_to_cartesian`], writing into a caller-owned buffer.
///
/// Used by the backend loops to avoid one allocation per element.
#[inline]
pub fn linear_to_cartesian_into(mut linear: usize, shape: &[usize], out: &mut [usize]) {
    debug_assert_eq!(shape.len(), out.len());
    for (slot, &dim) in out.iter_mut().zip(shape.iter()).rev() {
        *slot = linear % dim;
        linear /= dim;
    }
}
