//! Axis-length resolution.
//!
//! ```text
//! resolve_input_lengths(shape, input, hints)  -> AxisLengths
//! output_shape(output, lengths, hints)        -> Vec<usize>
//! ```
//!
//! An input group binds exactly one tensor dimension. Its members take their
//! lengths from hints (literals carry their own), and at most one member may
//! be left for inference by exact division. Hinted lengths are always
//! checked against the dimension they describe.

use std::collections::BTreeMap;

use crate::error::{AxisError, RearrangeError, ShapeError};
use crate::hints::Hints;
use crate::pattern::{AxisLeaf, AxisToken};
use crate::strides::checked_len;

/// Resolved axis lengths for one call, keyed by axis name and by the
/// display form of each input group (e.g. `"(h w)"`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AxisLengths {
    lengths: BTreeMap<String, usize>,
}

impl AxisLengths {
    pub fn get(&self, key: &str) -> Option<usize> {
        self.lengths.get(key).copied()
    }

    fn insert(&mut self, key: impl Into<String>, length: usize) {
        self.lengths.insert(key.into(), length);
    }
}

/// Bind the tensor's shape to the input side of a pattern.
///
/// # Errors
///
/// - `ShapeError::RankMismatch` if the input side does not name exactly
///   `shape.len()` dimensions.
/// - `ShapeError::LengthMismatch` if a hint or literal disagrees with the
///   dimension it binds.
/// - `ShapeError::IndivisibleGroup` if a group's known members do not divide
///   its dimension.
/// - `ShapeError::LengthOverflow` if the hinted members of a group multiply
///   past `usize::MAX`.
/// - `AxisError::UnderdeterminedGroup` if a group has two or more members
///   with no hint.
/// - `PatternError::InvalidHintName` or `AxisError::NonPositiveHint` from
///   [`Hints::validate`].
///
/// # Example
///
/// ```
/// use ndrearrange::Hints;
/// use ndrearrange::pattern::Pattern;
/// use ndrearrange::resolve::resolve_input_lengths;
///
/// let p = Pattern::parse("(h w) c -> h w c").unwrap();
/// let lengths = resolve_input_lengths(&[12, 10], p.input(), &Hints::new().with("h", 3)).unwrap();
/// assert_eq!(lengths.get("w"), Some(4));
/// assert_eq!(lengths.get("(h w)"), Some(12));
/// assert_eq!(lengths.get("c"), Some(10));
/// ```
pub fn resolve_input_lengths(
    shape: &[usize],
    input: &[AxisToken],
    hints: &Hints,
) -> Result<AxisLengths, RearrangeError> {
    hints.validate()?;
    if input.len() != shape.len() {
        return Err(ShapeError::RankMismatch {
            pattern: display_side(input),
            expected: input.len(),
            shape: shape.to_vec(),
        }
        .into());
    }

    let mut lengths = AxisLengths::default();
    for (dim, (token, &actual)) in input.iter().zip(shape.iter()).enumerate() {
        match token {
            AxisToken::Simple(name) => {
                if let Some(hinted) = hints.get(name).filter(|&h| h != actual) {
                    return Err(ShapeError::LengthMismatch {
                        axis: name.clone(),
                        length: hinted,
                        dim,
                        actual,
                    }
                    .into());
                }
                lengths.insert(name.as_str(), actual);
            }
            AxisToken::Literal(n) => {
                if *n != actual {
                    return Err(ShapeError::LengthMismatch {
                        axis: n.to_string(),
                        length: *n,
                        dim,
                        actual,
                    }
                    .into());
                }
            }
            AxisToken::Group(members) => {
                resolve_group(token, members, dim, actual, hints, &mut lengths)?;
            }
        }
        log::trace!("dimension {dim} ({actual}) bound to {token}");
    }

    log::debug!("resolved input lengths {lengths:?}");
    Ok(lengths)
}

fn resolve_group(
    token: &AxisToken,
    members: &[AxisLeaf],
    dim: usize,
    actual: usize,
    hints: &Hints,
    lengths: &mut AxisLengths,
) -> Result<(), RearrangeError> {
    let overflow = || ShapeError::LengthOverflow {
        axis: token.to_string(),
    };
    let mut known: usize = 1;
    let mut unknown: Vec<&str> = Vec::new();
    for member in members {
        let length = match member {
            AxisLeaf::Literal(n) => *n,
            AxisLeaf::Named(name) => match hints.get(name) {
                Some(hinted) => {
                    lengths.insert(name.as_str(), hinted);
                    hinted
                }
                None => {
                    unknown.push(name.as_str());
                    continue;
                }
            },
        };
        known = known.checked_mul(length).ok_or_else(overflow)?;
    }

    match unknown.as_slice() {
        [] if known != actual => Err(ShapeError::LengthMismatch {
            axis: token.to_string(),
            length: known,
            dim,
            actual,
        }
        .into()),
        [] => {
            lengths.insert(token.to_string(), actual);
            Ok(())
        }
        [_] if actual.checked_rem(known) != Some(0) => Err(ShapeError::IndivisibleGroup {
            group: token.to_string(),
            dim,
            actual,
            known,
        }
        .into()),
        [name] => {
            lengths.insert(*name, actual / known);
            lengths.insert(token.to_string(), actual);
            Ok(())
        }
        _ => Err(AxisError::UnderdeterminedGroup {
            group: token.to_string(),
            unknown: unknown.iter().map(|name| name.to_string()).collect(),
        }
        .into()),
    }
}

/// Length of one output leaf: hints first, then the input-derived lengths.
pub(crate) fn output_leaf_length(
    leaf: &AxisLeaf,
    lengths: &AxisLengths,
    hints: &Hints,
) -> Option<usize> {
    match leaf {
        AxisLeaf::Literal(n) => Some(*n),
        AxisLeaf::Named(name) => hints.get(name).or_else(|| lengths.get(name)),
    }
}

/// Compute the result shape of the output side.
///
/// # Errors
///
/// - `AxisError::UnresolvedGroupMember` for a group member neither hinted
///   nor bound by the input.
/// - `AxisError::UnknownOutputAxis` for a standalone axis neither hinted nor
///   bound by the input.
/// - `ShapeError::LengthOverflow` if a group length or the total element
///   count does not fit in `usize`.
pub fn output_shape(
    output: &[AxisToken],
    lengths: &AxisLengths,
    hints: &Hints,
) -> Result<Vec<usize>, RearrangeError> {
    hints.validate()?;
    let shape = output
        .iter()
        .map(|token| output_length(token, lengths, hints))
        .collect::<Result<Vec<_>, _>>()?;

    if checked_len(&shape).is_none() {
        return Err(ShapeError::LengthOverflow {
            axis: display_side(output),
        }
        .into());
    }
    Ok(shape)
}

fn output_length(
    token: &AxisToken,
    lengths: &AxisLengths,
    hints: &Hints,
) -> Result<usize, RearrangeError> {
    match token {
        AxisToken::Group(members) => {
            let mut product: usize = 1;
            for member in members {
                let len = output_leaf_length(member, lengths, hints).ok_or_else(|| {
                    AxisError::UnresolvedGroupMember {
                        name: member.to_string(),
                        group: token.to_string(),
                    }
                })?;
                product = product
                    .checked_mul(len)
                    .ok_or_else(|| ShapeError::LengthOverflow {
                        axis: token.to_string(),
                    })?;
            }
            Ok(product)
        }
        // Carried forward from the input, else a new axis sized by its hint.
        AxisToken::Simple(name) => lengths
            .get(name)
            .or_else(|| hints.get(name))
            .ok_or_else(|| AxisError::UnknownOutputAxis { name: name.clone() }.into()),
        AxisToken::Literal(n) => Ok(*n),
    }
}

fn display_side(tokens: &[AxisToken]) -> String {
    tokens
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}
