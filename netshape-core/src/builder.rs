//! Feature-to-graph identity rules.
//!
//! The first feature fixes the graph's mode. Point features become nodes
//! keyed by their coordinate; segment features become edges between the
//! nodes keyed by their two endpoints, so segments sharing an endpoint text
//! share a node.

use thiserror::Error;

use crate::{
    FeatureGeometry, FeatureGraph, FeatureRecord, GeometryKind, NodeKeyStrategy, PositionIndex,
    TextualKey,
};

/// Errors raised while building a graph from features.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// No feature was pushed, so the mode is unknown.
    #[error("no features were supplied; the geometry type cannot be determined")]
    Empty,
    /// A feature's kind differs from the mode fixed by the first feature.
    #[error("feature {index} is a {found} but the layer holds {expected} features")]
    GeometryMismatch {
        /// Zero-based position of the offending feature.
        index: usize,
        /// Mode chosen from the first feature.
        expected: GeometryKind,
        /// Kind of the offending feature.
        found: GeometryKind,
    },
}

/// Incrementally maps features onto a [`FeatureGraph`] and [`PositionIndex`].
///
/// Point collisions are last-write-wins: a later point with the same key
/// replaces the earlier record on the shared node.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use netshape_core::{FeatureRecord, GraphBuilder, Properties};
///
/// # fn main() -> Result<(), netshape_core::BuildError> {
/// let mut builder = GraphBuilder::new();
/// let origin = Coord { x: 0.0, y: 0.0 };
/// builder.push(FeatureRecord::segment(origin, Coord { x: 1.0, y: 0.0 }, Properties::new()))?;
/// builder.push(FeatureRecord::segment(origin, Coord { x: 0.0, y: 1.0 }, Properties::new()))?;
/// let (graph, positions) = builder.finish()?;
/// assert_eq!(graph.node_count(), 3);
/// assert_eq!(positions.len(), 3);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct GraphBuilder<K = TextualKey> {
    strategy: K,
    mode: Option<GeometryKind>,
    pushed: usize,
    graph: FeatureGraph,
    positions: PositionIndex,
}

impl GraphBuilder<TextualKey> {
    /// Builder using [`TextualKey`] identity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_strategy(TextualKey)
    }
}

impl Default for GraphBuilder<TextualKey> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: NodeKeyStrategy> GraphBuilder<K> {
    /// Builder using a custom key strategy.
    #[must_use]
    pub fn with_strategy(strategy: K) -> Self {
        Self {
            strategy,
            mode: None,
            pushed: 0,
            graph: FeatureGraph::new(),
            positions: PositionIndex::new(),
        }
    }

    /// Mode fixed by the first feature, if any.
    #[must_use]
    pub const fn mode(&self) -> Option<GeometryKind> {
        self.mode
    }

    /// Number of features accepted so far.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.pushed
    }

    /// Whether no feature was accepted yet.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.pushed == 0
    }

    /// Map one feature onto the graph.
    ///
    /// Returns the record displaced when a point lands on an existing key.
    ///
    /// # Errors
    /// Returns [`BuildError::GeometryMismatch`] when the feature's kind
    /// differs from the mode; the graph is left unchanged.
    pub fn push(&mut self, record: FeatureRecord) -> Result<Option<FeatureRecord>, BuildError> {
        let expected = *self.mode.get_or_insert(record.kind());
        if record.kind() != expected {
            return Err(BuildError::GeometryMismatch {
                index: self.pushed,
                expected,
                found: record.kind(),
            });
        }

        let geometry = *record.geometry();
        let displaced = match geometry {
            FeatureGeometry::Point(point) => {
                let key = self.strategy.key_for(point.0);
                self.positions.insert_if_absent(key.clone(), point.0);
                self.graph.upsert_node(key, record)
            }
            FeatureGeometry::LineString(line) => {
                let source = self.strategy.key_for(line.start);
                self.positions.insert_if_absent(source.clone(), line.start);
                let target = self.strategy.key_for(line.end);
                self.positions.insert_if_absent(target.clone(), line.end);
                self.graph.add_edge(source, target, record);
                None
            }
        };
        self.pushed += 1;
        Ok(displaced)
    }

    /// Return the completed graph and position index.
    ///
    /// # Errors
    /// Returns [`BuildError::Empty`] when no feature was pushed.
    pub fn finish(self) -> Result<(FeatureGraph, PositionIndex), BuildError> {
        if self.mode.is_none() {
            return Err(BuildError::Empty);
        }
        Ok((self.graph, self.positions))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{NodeKey, Properties, PropertyValue};
    use geo::Coord;
    use rstest::rstest;

    fn tagged(label: &str) -> Properties {
        Properties::from([("label".to_owned(), PropertyValue::from(label))])
    }

    fn segment(from: (f64, f64), to: (f64, f64)) -> FeatureRecord {
        FeatureRecord::segment(
            Coord { x: from.0, y: from.1 },
            Coord { x: to.0, y: to.1 },
            Properties::new(),
        )
    }

    #[rstest]
    fn segments_sharing_an_endpoint_share_a_node() {
        let mut builder = GraphBuilder::new();
        builder.push(segment((0.0, 0.0), (1.0, 0.0))).expect("first segment");
        builder.push(segment((1.0, 0.0), (2.0, 0.0))).expect("second segment");
        let (graph, positions) = builder.finish().expect("graph built");

        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.degree("(1.0, 0.0)"), 2);
        assert_eq!(positions.get("(2.0, 0.0)"), Some(Coord { x: 2.0, y: 0.0 }));
        assert!(graph.nodes().all(|node| node.record().is_none()));
    }

    #[rstest]
    fn duplicate_segments_become_parallel_edges() {
        let mut builder = GraphBuilder::new();
        builder.push(segment((0.0, 0.0), (1.0, 1.0))).expect("segment");
        builder.push(segment((1.0, 1.0), (0.0, 0.0))).expect("reversed segment");
        let (graph, _) = builder.finish().expect("graph built");
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 2);
    }

    #[rstest]
    fn colliding_points_keep_the_last_record() {
        let mut builder = GraphBuilder::new();
        let spot = Coord { x: 5.0, y: 5.0 };
        let first = builder.push(FeatureRecord::point(spot, tagged("first"))).expect("first");
        assert!(first.is_none());
        let displaced = builder
            .push(FeatureRecord::point(spot, tagged("last")))
            .expect("last")
            .expect("first record displaced");
        assert_eq!(displaced.property("label"), Some(&PropertyValue::from("first")));
        let (graph, positions) = builder.finish().expect("graph built");

        assert_eq!(graph.node_count(), 1);
        assert_eq!(positions.len(), 1);
        let node = graph.node("(5.0, 5.0)").expect("merged node");
        let label = node.record().and_then(|record| record.property("label"));
        assert_eq!(label, Some(&PropertyValue::from("last")));
    }

    #[rstest]
    fn mixed_geometry_is_rejected() {
        let mut builder = GraphBuilder::new();
        builder
            .push(FeatureRecord::point(Coord { x: 0.0, y: 0.0 }, Properties::new()))
            .expect("point fixes the mode");
        let err = builder
            .push(segment((0.0, 0.0), (1.0, 1.0)))
            .expect_err("segment after point");
        assert_eq!(
            err,
            BuildError::GeometryMismatch {
                index: 1,
                expected: GeometryKind::Point,
                found: GeometryKind::LineString,
            }
        );
        let (graph, _) = builder.finish().expect("earlier features kept");
        assert_eq!(graph.edge_count(), 0);
    }

    #[rstest]
    fn empty_input_has_no_mode() {
        let builder = GraphBuilder::new();
        assert_eq!(builder.finish().expect_err("empty"), BuildError::Empty);
    }

    #[rstest]
    fn custom_strategies_change_identity() {
        let by_row = |coord: Coord<f64>| NodeKey::new(format!("row {}", coord.y));
        let mut builder = GraphBuilder::with_strategy(by_row);
        builder.push(segment((0.0, 1.0), (5.0, 2.0))).expect("segment");
        builder.push(segment((9.0, 1.0), (3.0, 3.0))).expect("segment");
        let (graph, _) = builder.finish().expect("graph built");
        assert_eq!(graph.node_count(), 3);
        assert!(graph.contains_node("row 1"));
    }
}
