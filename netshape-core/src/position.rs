use std::collections::HashMap;

use geo::Coord;

use crate::NodeKey;

/// Raw coordinate of every node discovered by a read, for layout and
/// plotting.
///
/// The index is built alongside a [`FeatureGraph`](crate::FeatureGraph) but
/// is not linked to it: nodes added to the graph later are not reflected
/// here.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PositionIndex {
    positions: HashMap<NodeKey, Coord<f64>>,
}

impl PositionIndex {
    /// Create an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `coord` for `key` unless the key is already present.
    ///
    /// Returns `true` when the entry was added.
    pub fn insert_if_absent(&mut self, key: NodeKey, coord: Coord<f64>) -> bool {
        if self.positions.contains_key(&key) {
            return false;
        }
        self.positions.insert(key, coord);
        true
    }

    /// Coordinate recorded for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Coord<f64>> {
        self.positions.get(key).copied()
    }

    /// Whether `key` has a recorded position.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.positions.contains_key(key)
    }

    /// Number of distinct keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether no position was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Iterate over keys and coordinates in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&NodeKey, Coord<f64>)> + '_ {
        self.positions.iter().map(|(key, coord)| (key, *coord))
    }
}
