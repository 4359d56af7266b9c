//! N-dimensional dense tensor.
//!
//! This is the array substrate the rearrange pipeline runs on: it exposes
//! shape introspection, `reshape`, `permutedims` and `broadcast`, and nothing
//! about the pipeline itself lives here.

use crate::error::{RearrangeError, TensorError};
use crate::hints::Hints;
use crate::scalar::Scalar;
use crate::storage::Dense;
use crate::strides::{cartesian_to_linear, checked_len, compute_strides, linear_to_cartesian};

/// An n-dimensional tensor with dense row-major storage.
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor<ElT: Scalar> {
    storage: Dense<ElT>,
    shape: Vec<usize>,
    strides: Vec<usize>,
}

/// Type alias for dense tensors.
pub type DenseTensor<ElT> = Tensor<ElT>;

impl<ElT: Scalar> Tensor<ElT> {
    /// Create a new tensor with the given shape, zero-initialized.
    ///
    /// # Examples
    ///
    /// ```
    /// use ndrearrange::Tensor;
    ///
    /// let t: Tensor<f64> = Tensor::zeros(&[2, 3, 4]);
    /// assert_eq!(t.shape(), &[2, 3, 4]);
    /// assert_eq!(t.len(), 24);
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if the element count of `shape` overflows `usize`.
    pub fn zeros(shape: &[usize]) -> Self {
        let len = element_count(shape);
        Self {
            storage: Dense::zeros(len),
            shape: shape.to_vec(),
            strides: compute_strides(shape),
        }
    }

    /// Create tensor from data and shape.
    ///
    /// Data is expected in row-major order.
    ///
    /// # Errors
    ///
    /// Returns `TensorError::ShapeMismatch` if data length doesn't match shape,
    /// or `TensorError::SizeOverflow` if the shape's element count overflows.
    ///
    /// # Examples
    ///
    /// ```
    /// use ndrearrange::{DenseTensor, Tensor};
    ///
    /// let t: DenseTensor<f64> = Tensor::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3]).unwrap();
    /// assert_eq!(t.get(&[0, 0]), Some(&1.0));
    /// assert_eq!(t.get(&[0, 1]), Some(&2.0)); // Row-major: last index is fastest
    /// assert_eq!(t.get(&[1, 0]), Some(&4.0));
    /// ```
    pub fn from_vec(data: Vec<ElT>, shape: &[usize]) -> Result<Self, TensorError> {
        let expected_len = checked_len(shape).ok_or_else(|| TensorError::SizeOverflow {
            shape: shape.to_vec(),
        })?;
        if data.len() != expected_len {
            return Err(TensorError::ShapeMismatch {
                expected: expected_len,
                actual: data.len(),
            });
        }
        Ok(Self {
            storage: Dense::from_vec(data),
            shape: shape.to_vec(),
            strides: compute_strides(shape),
        })
    }

    /// Create a tensor whose element at each index is `f(index)`.
    ///
    /// ```
    /// use ndrearrange::Tensor;
    ///
    /// let t: Tensor<f64> = Tensor::from_fn(&[2, 3], |idx| (10 * idx[0] + idx[1]) as f64);
    /// assert_eq!(t.data(), &[0.0, 1.0, 2.0, 10.0, 11.0, 12.0]);
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if the element count of `shape` overflows `usize`.
    pub fn from_fn(shape: &[usize], mut f: impl FnMut(&[usize]) -> ElT) -> Self {
        let len = element_count(shape);
        let data = (0..len)
            .map(|linear| f(&linear_to_cartesian(linear, shape)))
            .collect();
        Self {
            storage: Dense::from_vec(data),
            shape: shape.to_vec(),
            strides: compute_strides(shape),
        }
    }

    /// Get the shape of the tensor.
    #[inline]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Get the rank (number of dimensions).
    #[inline]
    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// Get total number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    /// Check if tensor has zero elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    /// Get strides.
    #[inline]
    pub fn strides(&self) -> &[usize] {
        &self.strides
    }

    /// Get underlying data as slice.
    #[inline]
    pub fn data(&self) -> &[ElT] {
        self.storage.as_slice()
    }

    /// Get underlying data as mutable slice.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [ElT] {
        self.storage.as_mut_slice()
    }

    /// Consume the tensor and return its row-major data.
    pub fn into_vec(self) -> Vec<ElT> {
        self.storage.into_vec()
    }

    /// Get element by linear index.
    #[inline]
    pub fn get_linear(&self, i: usize) -> Option<&ElT> {
        self.storage.as_slice().get(i)
    }

    /// Get element by cartesian indices.
    ///
    /// Returns `None` if indices are out of bounds or wrong number of indices.
    pub fn get(&self, indices: &[usize]) -> Option<&ElT> {
        if !self.in_bounds(indices) {
            return None;
        }
        self.get_linear(cartesian_to_linear(indices, &self.strides))
    }

    /// Set element by cartesian indices.
    ///
    /// # Errors
    ///
    /// Returns error if indices are out of bounds or wrong number of indices.
    pub fn set(&mut self, indices: &[usize], value: ElT) -> Result<(), TensorError> {
        if indices.len() != self.ndim() {
            return Err(TensorError::WrongNumberOfIndices {
                expected: self.ndim(),
                actual: indices.len(),
            });
        }
        for (&idx, &dim) in indices.iter().zip(self.shape.iter()) {
            if idx >= dim {
                return Err(TensorError::IndexOutOfBounds {
                    index: idx,
                    dim_size: dim,
                });
            }
        }
        let linear = cartesian_to_linear(indices, &self.strides);
        self.storage.as_mut_slice()[linear] = value;
        Ok(())
    }

    fn in_bounds(&self, indices: &[usize]) -> bool {
        indices.len() == self.ndim()
            && indices
                .iter()
                .zip(self.shape.iter())
                .all(|(&idx, &dim)| idx < dim)
    }

    /// Reshape the tensor to a new shape (zero-copy view).
    ///
    /// The result shares storage with `self` until either side is written.
    ///
    /// # Errors
    ///
    /// Returns `TensorError::ShapeMismatch` if the element count changes, or
    /// `TensorError::SizeOverflow` if the new shape's element count overflows.
    ///
    /// # Example
    ///
    /// ```
    /// use ndrearrange::Tensor;
    ///
    /// let t = Tensor::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3]).unwrap();
    /// let t3x2 = t.reshape(&[3, 2]).unwrap();
    /// assert_eq!(t3x2.shape(), &[3, 2]);
    /// assert!(t.shares_storage_with(&t3x2));
    /// ```
    pub fn reshape(&self, new_shape: &[usize]) -> Result<Self, TensorError> {
        self.view().into_reshape(new_shape)
    }

    /// Reshape by value, reusing the buffer.
    pub fn into_reshape(self, new_shape: &[usize]) -> Result<Self, TensorError> {
        let new_len = checked_len(new_shape).ok_or_else(|| TensorError::SizeOverflow {
            shape: new_shape.to_vec(),
        })?;
        if self.len() != new_len {
            return Err(TensorError::ShapeMismatch {
                expected: self.len(),
                actual: new_len,
            });
        }
        Ok(Self {
            storage: self.storage,
            shape: new_shape.to_vec(),
            strides: compute_strides(new_shape),
        })
    }

    fn view(&self) -> Self {
        Self {
            storage: self.storage.view(),
            shape: self.shape.clone(),
            strides: self.strides.clone(),
        }
    }

    /// Check if this tensor shares storage with another tensor.
    pub fn shares_storage_with(&self, other: &Self) -> bool {
        self.storage.shares_storage_with(&other.storage)
    }

    /// Check if this tensor's storage is shared with other tensors.
    pub fn is_view(&self) -> bool {
        self.storage.is_shared()
    }

    /// Permute the dimensions of the tensor.
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
    /// use ndrearrange::Tensor;
    ///
    /// let t = Tensor::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3]).unwrap();
    /// let t2 = t.permutedims(&[1, 0]).unwrap();
    /// assert_eq!(t2.shape(), &[3, 2]);
    /// assert_eq!(t.get(&[0, 2]), t2.get(&[2, 0]));
    /// ```
    pub fn permutedims(&self, perm: &[usize]) -> Result<Self, TensorError> {
        crate::operations::permutedims(self, perm)
    }

    /// Broadcast into `shape`, see [`operations::broadcast`](crate::operations::broadcast).
    pub fn broadcast(&self, shape: &[usize], axes: &[Option<usize>]) -> Result<Self, TensorError> {
        crate::operations::broadcast(self, shape, axes)
    }

    /// Rearrange axes according to a pattern, see [`rearrange`](crate::rearrange).
    ///
    /// ```
    /// use ndrearrange::{Hints, Tensor};
    ///
    /// let t: Tensor<f64> = Tensor::zeros(&[12, 10]);
    /// let hints = Hints::new().with("h", 3).with("w", 4);
    /// let out = t.rearrange("(h w) c -> h w c", &hints).unwrap();
    /// assert_eq!(out.shape(), &[3, 4, 10]);
    /// ```
    pub fn rearrange(&self, pattern: &str, hints: &Hints) -> Result<Self, RearrangeError> {
        crate::operations::rearrange(self, pattern, hints)
    }
}

fn element_count(shape: &[usize]) -> usize {
    match checked_len(shape) {
        Some(len) => len,
        None => panic!("element count of shape {shape:?} overflows usize"),
    }
}
