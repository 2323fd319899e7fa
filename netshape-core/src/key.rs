//! Node identity derived from coordinate text.

use std::{borrow::Borrow, fmt};

use geo::Coord;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Canonical identity of a graph node.
///
/// Two coordinates map to the same node iff their keys are
/// character-identical. This is a textual rule, not a numeric tolerance:
/// `-0.0` and `0.0` produce different keys, and two numerically equal values
/// reached through different arithmetic may format differently.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use netshape_core::{NodeKeyStrategy, TextualKey};
///
/// let key = TextualKey.key_for(Coord { x: 120.5, y: 14.0 });
/// assert_eq!(key.as_str(), "(120.5, 14.0)");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct NodeKey(String);

impl NodeKey {
    /// Wrap pre-formatted key text.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Borrow the key text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the key, returning its text.
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for NodeKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for NodeKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NodeKey {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

/// Derives a [`NodeKey`] from a coordinate.
///
/// Readers are generic over the strategy so a tolerance-based identity can be
/// swapped in without touching the graph model. Closures of type
/// `Fn(Coord<f64>) -> NodeKey` implement the trait.
pub trait NodeKeyStrategy {
    /// Return the identity of `coord`.
    fn key_for(&self, coord: Coord<f64>) -> NodeKey;
}

/// Default strategy: the coordinate pair formatted as `(x, y)`.
///
/// Each ordinate uses Rust's shortest round-trip float formatting, so `1`
/// becomes `1.0` and `120.90432974785224` is kept digit for digit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextualKey;

impl NodeKeyStrategy for TextualKey {
    fn key_for(&self, coord: Coord<f64>) -> NodeKey {
        NodeKey(format!("({:?}, {:?})", coord.x, coord.y))
    }
}

impl<F> NodeKeyStrategy for F
where
    F: Fn(Coord<f64>) -> NodeKey,
{
    fn key_for(&self, coord: Coord<f64>) -> NodeKey {
        self(coord)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1.0, 2.0, "(1.0, 2.0)")]
    #[case(120.90432974785224, 14.391880515315119, "(120.90432974785224, 14.391880515315119)")]
    #[case(-0.5, 0.25, "(-0.5, 0.25)")]
    fn formats_coordinates_as_text(#[case] x: f64, #[case] y: f64, #[case] expected: &str) {
        assert_eq!(TextualKey.key_for(Coord { x, y }).as_str(), expected);
    }

    #[rstest]
    fn signed_zero_is_a_distinct_key() {
        let positive = TextualKey.key_for(Coord { x: 0.0, y: 1.0 });
        let negative = TextualKey.key_for(Coord { x: -0.0, y: 1.0 });
        assert_ne!(positive, negative);
    }

    #[rstest]
    fn closures_act_as_strategies() {
        let rounded = |coord: Coord<f64>| NodeKey::new(format!("{:.1}/{:.1}", coord.x, coord.y));
        let key = rounded.key_for(Coord { x: 1.04, y: 2.0 });
        assert_eq!(key.as_str(), "1.0/2.0");
    }
}
