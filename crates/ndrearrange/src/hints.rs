//! User-supplied axis lengths.

use std::collections::BTreeMap;

use crate::error::{AxisError, PatternError, RearrangeError};
use crate::pattern::is_identifier;

/// Axis lengths the tensor's shape cannot provide on its own: how to split a
/// merged dimension, or how long a new (repeated) axis should be.
///
/// Hints are plain data; they are checked by [`Hints::validate`], which every
/// rearrange entry point calls before resolving anything.
///
/// ```
/// use ndrearrange::Hints;
///
/// let hints = Hints::new().with("h", 3).with("w", 4);
/// assert_eq!(hints.get("h"), Some(3));
///
/// let same: Hints = [("h", 3), ("w", 4)].into_iter().collect();
/// assert_eq!(hints, same);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hints {
    lengths: BTreeMap<String, usize>,
}

impl Hints {
    /// No hints.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`insert`](Self::insert).
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, length: usize) -> Self {
        self.insert(name, length);
        self
    }

    /// Set the length for `name`, returning the previous one.
    pub fn insert(&mut self, name: impl Into<String>, length: usize) -> Option<usize> {
        self.lengths.insert(name.into(), length)
    }

    pub fn get(&self, name: &str) -> Option<usize> {
        self.lengths.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.lengths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lengths.is_empty()
    }

    /// Iterate over `(name, length)` in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.lengths.iter().map(|(name, &len)| (name.as_str(), len))
    }

    /// Check every name is an identifier and every length is positive.
    ///
    /// # Errors
    ///
    /// `PatternError::InvalidHintName` or `AxisError::NonPositiveHint`.
    pub fn validate(&self) -> Result<(), RearrangeError> {
        for (name, length) in self.iter() {
            if !is_identifier(name) {
                return Err(PatternError::InvalidHintName {
                    name: name.to_string(),
                }
                .into());
            }
            if length == 0 {
                return Err(AxisError::NonPositiveHint {
                    name: name.to_string(),
                    length,
                }
                .into());
            }
        }
        Ok(())
    }
}

impl<S: Into<String>> FromIterator<(S, usize)> for Hints {
    fn from_iter<I: IntoIterator<Item = (S, usize)>>(iter: I) -> Self {
        let mut hints = Self::new();
        hints.extend(iter);
        hints
    }
}

impl<S: Into<String>> Extend<(S, usize)> for Hints {
    fn extend<I: IntoIterator<Item = (S, usize)>>(&mut self, iter: I) {
        for (name, length) in iter {
            self.insert(name, length);
        }
    }
}
