//! Dense storage for tensor data.

use std::sync::Arc;

use crate::scalar::Scalar;

/// Dense storage: a contiguous, reference-counted array in row-major order.
///
/// Cloning or taking a [`view`](Dense::view) shares the buffer. The first
/// mutable access on a shared buffer copies it (copy-on-write), so a
/// reshaped view never aliases writes back into the tensor it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Dense<ElT: Scalar> {
    data: Arc<Vec<ElT>>,
}

impl<ElT: Scalar> Dense<ElT> {
    /// Create dense storage with given length, zero-initialized.
    pub fn zeros(len: usize) -> Self {
        Self::from_vec(vec![ElT::zero(); len])
    }

    /// Create dense storage from existing vector (takes ownership).
    pub fn from_vec(data: Vec<ElT>) -> Self {
        Self {
            data: Arc::new(data),
        }
    }

    /// Another handle on the same buffer.
    #[inline]
    pub fn view(&self) -> Self {
        Self {
            data: Arc::clone(&self.data),
        }
    }

    /// Length of storage.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if storage is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get immutable slice of data.
    #[inline]
    pub fn as_slice(&self) -> &[ElT] {
        &self.data
    }

    /// Get mutable slice of data, detaching from other views first.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [ElT] {
        Arc::make_mut(&mut self.data).as_mut_slice()
    }

    /// Consume the storage, copying only if the buffer is still shared.
    pub fn into_vec(self) -> Vec<ElT> {
        Arc::try_unwrap(self.data).unwrap_or_else(|shared| (*shared).clone())
    }

    /// Whether both handles point at the same buffer.
    #[inline]
    pub fn shares_storage_with(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }

    /// Whether other handles on this buffer exist.
    #[inline]
    pub fn is_shared(&self) -> bool {
        Arc::strong_count(&self.data) > 1
    }
}
