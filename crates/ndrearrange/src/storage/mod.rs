//! Storage types for tensor data.
//!
//! Storage is always a flat vector; shape and strides live on the
//! [`Tensor`](crate::Tensor) wrapper, so a reshape only swaps the wrapper.

mod dense;

pub use dense::Dense;
