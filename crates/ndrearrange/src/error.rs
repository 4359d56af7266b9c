//! Error types for ndrearrange.
//!
//! Two layers:
//!
//! ```text
//! TensorError      - failures of the dense tensor substrate (reshape, permute, broadcast)
//! RearrangeError   - failures of a rearrange call
//! ├── Pattern(PatternError)  - malformed pattern string or hint name
//! ├── Shape(ShapeError)      - pattern does not fit the tensor's shape
//! ├── Axis(AxisError)        - an axis length cannot be determined
//! └── Tensor(TensorError)    - substrate failure surfaced during execution
//! ```

use thiserror::Error;

/// Errors that can occur in tensor operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TensorError {
    /// Shape mismatch between data length and expected size.
    #[error("shape mismatch: expected {expected} elements, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    /// Index out of bounds.
    #[error("index out of bounds: index {index} is out of range for dimension {dim_size}")]
    IndexOutOfBounds { index: usize, dim_size: usize },

    /// Wrong number of indices provided.
    #[error("wrong number of indices: expected {expected}, got {actual}")]
    WrongNumberOfIndices { expected: usize, actual: usize },

    /// Invalid permutation.
    #[error("invalid permutation {perm:?} for tensor with {ndim} dimensions")]
    InvalidPermutation { perm: Vec<usize>, ndim: usize },

    /// The element count of a shape does not fit in `usize`.
    #[error("element count of shape {shape:?} overflows usize")]
    SizeOverflow { shape: Vec<usize> },

    /// Source axes cannot be broadcast into the target shape.
    #[error("cannot broadcast shape {from:?} to {to:?} with axis map {axes:?}")]
    InvalidBroadcast {
        from: Vec<usize>,
        to: Vec<usize>,
        axes: Vec<Option<usize>>,
    },
}

/// Malformed pattern strings and hint names.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    /// The pattern must contain exactly one `->`.
    #[error("pattern must contain exactly one '->' separator, found {found}")]
    SeparatorCount { found: usize },

    /// A character that starts neither an identifier, a literal, nor a group.
    #[error("unexpected character {found:?} at offset {offset} in {side:?}")]
    UnexpectedChar {
        found: char,
        offset: usize,
        side: String,
    },

    /// An opening parenthesis without its closing one.
    #[error("unclosed '(' at offset {offset} in {side:?}")]
    UnclosedGroup { offset: usize, side: String },

    /// A closing parenthesis without an opening one.
    #[error("unmatched ')' at offset {offset} in {side:?}")]
    UnmatchedClose { offset: usize, side: String },

    /// Groups cannot contain groups.
    #[error("nested group at offset {offset} in {side:?}")]
    NestedGroup { offset: usize, side: String },

    /// Numeric literal axes must be positive integers.
    #[error("invalid literal axis {literal:?}: expected a positive integer")]
    InvalidLiteral { literal: String },

    /// Each name may bind at most one axis per side.
    #[error("axis {name:?} appears more than once on the {side} side")]
    DuplicateAxis { name: String, side: &'static str },

    /// A hint key that is not a valid axis identifier.
    #[error("hint name {name:?} is not a valid axis identifier")]
    InvalidHintName { name: String },
}

/// The pattern is well-formed but does not fit the tensor's shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeError {
    /// The pattern's input side names a different number of dimensions.
    #[error("pattern input {pattern:?} expects {expected} dimensions, tensor has shape {shape:?}")]
    RankMismatch {
        pattern: String,
        expected: usize,
        shape: Vec<usize>,
    },

    /// A hinted or literal length disagrees with the tensor dimension it binds.
    #[error("axis {axis:?} has length {length} but dimension {dim} of the tensor is {actual}")]
    LengthMismatch {
        axis: String,
        length: usize,
        dim: usize,
        actual: usize,
    },

    /// The known members of a group do not divide the merged dimension.
    #[error("group {group:?} cannot split dimension {dim} of length {actual} (known product {known})")]
    IndivisibleGroup {
        group: String,
        dim: usize,
        actual: usize,
        known: usize,
    },

    /// A product of axis lengths does not fit in `usize`.
    #[error("length of {axis:?} overflows usize")]
    LengthOverflow { axis: String },

    /// An input axis missing from the output can only be dropped when it has length 1.
    #[error("input axis {axis:?} of length {length} does not appear in the output")]
    DroppedAxis { axis: String, length: usize },

    /// A plan was executed on a tensor of a different shape than it was built for.
    #[error("plan was built for shape {expected:?}, got {actual:?}")]
    PlanMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    /// Final reshape would change the element count.
    #[error("cannot reshape {actual} elements into output shape {shape:?} ({expected} elements)")]
    ElementCountMismatch {
        shape: Vec<usize>,
        expected: usize,
        actual: usize,
    },
}

/// An axis length cannot be determined from the tensor or the hints.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AxisError {
    /// An output axis not present in the input and not hinted.
    #[error("unknown axis {name:?} in output")]
    UnknownOutputAxis { name: String },

    /// A member of an output group with no known length.
    #[error("axis {name:?} of output group {group:?} has no known length")]
    UnresolvedGroupMember { name: String, group: String },

    /// An input group with more than one unhinted member.
    #[error("input group {group:?} has unresolved members {unknown:?}; provide hints for all but one")]
    UnderdeterminedGroup { group: String, unknown: Vec<String> },

    /// Hinted lengths must be positive.
    #[error("hint for axis {name:?} must be positive, got {length}")]
    NonPositiveHint { name: String, length: usize },
}

/// Error returned by [`rearrange`](crate::rearrange) and [`Pattern`](crate::Pattern).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RearrangeError {
    #[error(transparent)]
    Pattern(#[from] PatternError),

    #[error(transparent)]
    Shape(#[from] ShapeError),

    #[error(transparent)]
    Axis(#[from] AxisError),

    #[error(transparent)]
    Tensor(#[from] TensorError),
}

impl RearrangeError {
    /// True for malformed pattern strings or hint names.
    pub fn is_pattern_error(&self) -> bool {
        matches!(self, Self::Pattern(_))
    }

    /// True when the pattern does not fit the tensor's shape.
    pub fn is_shape_error(&self) -> bool {
        matches!(self, Self::Shape(_))
    }

    /// True when an axis length could not be determined.
    pub fn is_axis_error(&self) -> bool {
        matches!(self, Self::Axis(_))
    }
}
