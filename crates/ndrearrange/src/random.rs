//! Random tensor construction.
//!
//! Mostly used to feed arbitrary data through rearrange round-trips.

use rand::Rng;
use rand::distr::StandardUniform;
use rand_distr::StandardNormal;

use crate::scalar::{Scalar, c32, c64};
use crate::tensor::Tensor;

/// Element types that can be sampled at random.
pub trait RandomScalar: Scalar {
    /// Sample from the uniform distribution on [0, 1) (per component).
    fn sample_uniform<R: Rng>(rng: &mut R) -> Self;

    /// Sample from the standard normal distribution.
    ///
    /// Complex values use independent N(0, 1/2) parts so that `E|z|^2 = 1`.
    fn sample_normal<R: Rng>(rng: &mut R) -> Self;
}

macro_rules! impl_random_real {
    ($($t:ty),*) => {$(
        impl RandomScalar for $t {
            fn sample_uniform<R: Rng>(rng: &mut R) -> Self {
                rng.sample(StandardUniform)
            }

            fn sample_normal<R: Rng>(rng: &mut R) -> Self {
                rng.sample(StandardNormal)
            }
        }
    )*};
}

macro_rules! impl_random_complex {
    ($($t:ty => $re:ty),*) => {$(
        impl RandomScalar for $t {
            fn sample_uniform<R: Rng>(rng: &mut R) -> Self {
                <$t>::new(rng.sample(StandardUniform), rng.sample(StandardUniform))
            }

            fn sample_normal<R: Rng>(rng: &mut R) -> Self {
                let scale = std::f64::consts::FRAC_1_SQRT_2 as $re;
                <$t>::new(
                    rng.sample::<$re, _>(StandardNormal) * scale,
                    rng.sample::<$re, _>(StandardNormal) * scale,
                )
            }
        }
    )*};
}

impl_random_real!(f32, f64);
impl_random_complex!(c32 => f32, c64 => f64);

impl<ElT: RandomScalar> Tensor<ElT> {
    /// Create a tensor with uniform random values in [0, 1).
    pub fn random(shape: &[usize]) -> Self {
        Self::random_with_rng(shape, &mut rand::rng())
    }

    /// Create a tensor with uniform random values using a specific RNG.
    ///
    /// ```
    /// use ndrearrange::Tensor;
    /// use rand::SeedableRng;
    /// use rand::rngs::StdRng;
    ///
    /// let t1: Tensor<f64> = Tensor::random_with_rng(&[2, 3], &mut StdRng::seed_from_u64(42));
    /// let t2: Tensor<f64> = Tensor::random_with_rng(&[2, 3], &mut StdRng::seed_from_u64(42));
    /// assert_eq!(t1, t2);
    /// ```
    pub fn random_with_rng<R: Rng>(shape: &[usize], rng: &mut R) -> Self {
        Self::from_fn(shape, |_| ElT::sample_uniform(&mut *rng))
    }

    /// Create a tensor with standard normal random values.
    pub fn randn(shape: &[usize]) -> Self {
        Self::randn_with_rng(shape, &mut rand::rng())
    }

    /// Create a tensor with standard normal random values using a specific RNG.
    pub fn randn_with_rng<R: Rng>(shape: &[usize], rng: &mut R) -> Self {
        Self::from_fn(shape, |_| ElT::sample_normal(&mut *rng))
    }
}
