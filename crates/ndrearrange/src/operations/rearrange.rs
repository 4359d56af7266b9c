//! Pattern-driven axis rearrangement.
//!
//! ```text
//! rearrange(tensor, pattern, hints)
//!     → Pattern::parse
//!     → resolve_input_lengths / output_shape
//!     → RearrangePlan::new
//!     → RearrangePlan::execute
//!         flatten    reshape to input leaves (groups expanded)
//!         squeeze    drop unit leaves absent from the output
//!         permute    reorder shared leaves into output order
//!         broadcast  materialize output-only leaves (skipped if none)
//!         reshape    merge leaves into the output shape
//! ```

use crate::error::{AxisError, RearrangeError, ShapeError};
use crate::hints::Hints;
use crate::operations::{broadcast, is_identity, permutedims};
use crate::pattern::{AxisLeaf, Pattern};
use crate::resolve::{AxisLengths, output_leaf_length, output_shape, resolve_input_lengths};
use crate::scalar::Scalar;
use crate::strides::checked_len;
use crate::tensor::DenseTensor;

/// Rearrange the axes of `tensor` according to `pattern`.
///
/// Splits, merges, reorders and repeats axes. `hints` supplies lengths the
/// shape cannot determine: how to split an input group, and the length of
/// axes that only appear in the output. The input tensor is not modified.
///
/// # Errors
///
/// - [`RearrangeError::Pattern`]: malformed pattern or hint name.
/// - [`RearrangeError::Shape`]: the pattern does not fit `tensor.shape()`.
/// - [`RearrangeError::Axis`]: an axis length cannot be determined.
///
/// # Examples
///
/// ```
/// use ndrearrange::{DenseTensor, Hints, rearrange};
///
/// let x: DenseTensor<f64> = DenseTensor::zeros(&[12, 10]);
/// let hints = Hints::new().with("h", 3).with("w", 4);
/// let y = rearrange(&x, "(h w) c -> h w c", &hints).unwrap();
/// assert_eq!(y.shape(), &[3, 4, 10]);
///
/// // Output-only axes are repeated.
/// let x: DenseTensor<f64> = DenseTensor::from_vec(vec![1.0, 2.0], &[2]).unwrap();
/// let y = rearrange(&x, "a -> a r", &Hints::new().with("r", 2)).unwrap();
/// assert_eq!(y.data(), &[1.0, 1.0, 2.0, 2.0]);
/// ```
pub fn rearrange<T: Scalar>(
    tensor: &DenseTensor<T>,
    pattern: &str,
    hints: &Hints,
) -> Result<DenseTensor<T>, RearrangeError> {
    Pattern::parse(pattern)?.apply(tensor, hints)
}

impl Pattern {
    /// Apply this pattern to `tensor`; see [`rearrange`].
    pub fn apply<T: Scalar>(
        &self,
        tensor: &DenseTensor<T>,
        hints: &Hints,
    ) -> Result<DenseTensor<T>, RearrangeError> {
        self.plan(tensor.shape(), hints)?.execute(tensor)
    }

    /// The shape [`apply`](Self::apply) would produce, without moving data.
    ///
    /// ```
    /// use ndrearrange::Hints;
    /// use ndrearrange::pattern::Pattern;
    ///
    /// let p = Pattern::parse("a b c -> (a b) c").unwrap();
    /// assert_eq!(p.output_shape(&[3, 4, 5], &Hints::new()).unwrap(), vec![12, 5]);
    /// ```
    pub fn output_shape(
        &self,
        shape: &[usize],
        hints: &Hints,
    ) -> Result<Vec<usize>, RearrangeError> {
        let lengths = resolve_input_lengths(shape, self.input(), hints)?;
        output_shape(self.output(), &lengths, hints)
    }

    /// Resolve this pattern against a concrete input shape.
    pub fn plan(&self, shape: &[usize], hints: &Hints) -> Result<RearrangePlan, RearrangeError> {
        let lengths = resolve_input_lengths(shape, self.input(), hints)?;
        let target = output_shape(self.output(), &lengths, hints)?;
        RearrangePlan::new(self, shape, &lengths, hints, target)
    }
}

/// The concrete shapes and axis maps for one rearrange.
///
/// A plan depends only on the pattern, the input shape and the hints, so it
/// can be reused for every tensor of that shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RearrangePlan {
    input_shape: Vec<usize>,
    flat_shape: Vec<usize>,
    squeezed_shape: Vec<usize>,
    perm: Vec<usize>,
    /// `(shape, axis map)` when output-only axes must be materialized.
    broadcast: Option<(Vec<usize>, Vec<Option<usize>>)>,
    output_shape: Vec<usize>,
}

impl RearrangePlan {
    fn new(
        pattern: &Pattern,
        input_shape: &[usize],
        lengths: &AxisLengths,
        hints: &Hints,
        output_shape: Vec<usize>,
    ) -> Result<Self, RearrangeError> {
        let input_leaves = pattern.input_leaves();
        let output_leaves = pattern.output_leaves();

        let mut flat_shape = Vec::with_capacity(input_leaves.len());
        let mut kept: Vec<(&str, usize)> = Vec::new();
        for leaf in &input_leaves {
            let length = match leaf {
                AxisLeaf::Literal(n) => *n,
                AxisLeaf::Named(name) => lengths.get(name).ok_or_else(|| missing_axis(name))?,
            };
            flat_shape.push(length);

            match leaf.name() {
                Some(name) if output_leaves.iter().any(|o| o.name() == Some(name)) => {
                    kept.push((name, length));
                }
                _ if length == 1 => {}
                _ => {
                    return Err(ShapeError::DroppedAxis {
                        axis: leaf.to_string(),
                        length,
                    }
                    .into());
                }
            }
        }
        let squeezed_shape: Vec<usize> = kept.iter().map(|&(_, len)| len).collect();

        // Walk output leaves: shared names give the permutation, the rest
        // become broadcast axes.
        let mut perm = Vec::with_capacity(kept.len());
        let mut expanded_shape = Vec::with_capacity(output_leaves.len());
        let mut axes = Vec::with_capacity(output_leaves.len());
        for leaf in &output_leaves {
            let source = leaf
                .name()
                .and_then(|name| kept.iter().position(|&(k, _)| k == name));
            match source {
                Some(pos) => {
                    axes.push(Some(perm.len()));
                    perm.push(pos);
                    expanded_shape.push(kept[pos].1);
                }
                None => {
                    axes.push(None);
                    let length = output_leaf_length(leaf, lengths, hints)
                        .ok_or_else(|| missing_axis(&leaf.to_string()))?;
                    expanded_shape.push(length);
                }
            }
        }
        let broadcast = axes
            .iter()
            .any(Option::is_none)
            .then(|| (expanded_shape.clone(), axes));

        let overflow = || ShapeError::LengthOverflow {
            axis: pattern.to_string(),
        };
        let expected = checked_len(&output_shape).ok_or_else(overflow)?;
        let actual = checked_len(&expanded_shape).ok_or_else(overflow)?;
        if expected != actual {
            return Err(ShapeError::ElementCountMismatch {
                shape: output_shape,
                expected,
                actual,
            }
            .into());
        }

        let plan = Self {
            input_shape: input_shape.to_vec(),
            flat_shape,
            squeezed_shape,
            perm,
            broadcast,
            output_shape,
        };
        log::debug!("rearrange {pattern}: {plan:?}");
        Ok(plan)
    }

    /// Shape of the tensors this plan applies to.
    pub fn input_shape(&self) -> &[usize] {
        &self.input_shape
    }

    /// Shape of the result.
    pub fn output_shape(&self) -> &[usize] {
        &self.output_shape
    }

    /// Permutation applied to the squeezed leaves.
    pub fn permutation(&self) -> &[usize] {
        &self.perm
    }

    /// Whether the plan replicates data along output-only axes.
    pub fn broadcasts(&self) -> bool {
        self.broadcast.is_some()
    }

    /// Run the plan on `tensor`.
    ///
    /// # Errors
    ///
    /// `ShapeError::PlanMismatch` if `tensor` does not have
    /// [`input_shape`](Self::input_shape).
    pub fn execute<T: Scalar>(
        &self,
        tensor: &DenseTensor<T>,
    ) -> Result<DenseTensor<T>, RearrangeError> {
        if tensor.shape() != self.input_shape.as_slice() {
            return Err(ShapeError::PlanMismatch {
                expected: self.input_shape.clone(),
                actual: tensor.shape().to_vec(),
            }
            .into());
        }

        let flat = tensor.reshape(&self.flat_shape)?;
        log::trace!("flatten {:?} -> {:?}", tensor.shape(), self.flat_shape);

        let squeezed = flat.into_reshape(&self.squeezed_shape)?;

        let permuted = if is_identity(&self.perm) {
            squeezed
        } else {
            log::trace!("permute {:?} by {:?}", self.squeezed_shape, self.perm);
            permutedims(&squeezed, &self.perm)?
        };

        let expanded = match &self.broadcast {
            Some((shape, axes)) => {
                log::trace!("broadcast {:?} -> {:?} via {:?}", permuted.shape(), shape, axes);
                broadcast(&permuted, shape, axes)?
            }
            None => permuted,
        };

        Ok(expanded.into_reshape(&self.output_shape)?)
    }
}

fn missing_axis(name: &str) -> RearrangeError {
    AxisError::UnknownOutputAxis {
        name: name.to_string(),
    }
    .into()
}
