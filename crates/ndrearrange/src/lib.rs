//! ndrearrange - axis-pattern rearrangement for dense n-dimensional tensors.
//!
//! A pattern such as `"(h w) c -> h w c"` names the axes of a tensor on the
//! left of `->` and the desired layout on the right. Axes can be reordered,
//! merged into a parenthesized group, split out of one, dropped when they
//! have length 1, or introduced as new axes along which the data is repeated.
//!
//! # Architecture
//!
//! ```text
//! pattern     Pattern::parse           string   → input/output AxisTokens
//! resolve     resolve_input_lengths    shape    → AxisLengths
//!             output_shape             lengths  → target shape
//! operations  RearrangePlan::execute   flatten → squeeze → permute → broadcast → reshape
//! tensor      DenseTensor              row-major storage with reshape/permutedims/broadcast
//! ```
//!
//! # Example
//!
//! ```
//! use ndrearrange::{DenseTensor, Hints, rearrange};
//!
//! // 2x3 matrix, row-major
//! let x: DenseTensor<f64> = DenseTensor::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3]).unwrap();
//!
//! let t = rearrange(&x, "a b -> b a", &Hints::new()).unwrap();
//! assert_eq!(t.shape(), &[3, 2]);
//! assert_eq!(t.data(), &[1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);
//!
//! let flat = rearrange(&x, "a b -> (a b)", &Hints::new()).unwrap();
//! assert_eq!(flat.shape(), &[6]);
//!
//! let split = rearrange(&flat, "(a b) -> b a", &Hints::new().with("a", 2)).unwrap();
//! assert_eq!(split, t);
//! ```

pub mod backend;
pub mod error;
pub mod hints;
pub mod operations;
pub mod pattern;
pub mod random;
pub mod resolve;
pub mod scalar;
pub mod storage;
pub mod strides;
pub mod tensor;

pub use error::{AxisError, PatternError, RearrangeError, ShapeError, TensorError};
pub use hints::Hints;
pub use operations::{RearrangePlan, rearrange};
pub use pattern::{AxisLeaf, AxisToken, Pattern};
pub use resolve::AxisLengths;
pub use scalar::{Scalar, c32, c64};
pub use storage::Dense;
pub use tensor::{DenseTensor, Tensor};
