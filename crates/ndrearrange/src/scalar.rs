//! Element types that can be stored in a tensor and moved by rearrange.

use faer_traits::ComplexField;
use std::fmt::Debug;

pub use faer::{c32, c64};

/// Trait for scalar types supported by ndrearrange.
///
/// Wraps faer's `ComplexField` so the same element types faer accepts
/// can be stored and moved.
pub trait Scalar: ComplexField + Copy + Debug + Default + PartialEq + Send + Sync + 'static {
    /// Returns the additive identity (zero).
    fn zero() -> Self {
        Self::default()
    }
}

impl Scalar for f32 {}
impl Scalar for f64 {}
impl Scalar for c32 {}
impl Scalar for c64 {}
