//! Undirected multigraph keyed by coordinate identity.

use std::collections::HashMap;

use petgraph::graph::{EdgeIndex, NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;

use crate::{FeatureRecord, NodeKey};

/// A graph node: its key and, in point mode, the feature it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphNode {
    key: NodeKey,
    record: Option<FeatureRecord>,
}

impl GraphNode {
    /// The node's identity.
    #[must_use]
    pub const fn key(&self) -> &NodeKey {
        &self.key
    }

    /// The attached feature. Nodes created as segment endpoints carry none.
    #[must_use]
    pub const fn record(&self) -> Option<&FeatureRecord> {
        self.record.as_ref()
    }
}

/// Borrowed view of one edge.
#[derive(Debug, Clone, Copy)]
pub struct GraphEdge<'a> {
    /// Key of the node the segment starts at.
    pub source: &'a NodeKey,
    /// Key of the node the segment ends at.
    pub target: &'a NodeKey,
    /// The segment feature.
    pub record: &'a FeatureRecord,
}

/// Undirected multigraph of features.
///
/// Nodes are unique per [`NodeKey`]; adding a known key returns the existing
/// node. Parallel edges are kept, each with its own record. Nodes and edges
/// iterate in insertion order.
///
/// # Examples
/// ```
/// use netshape_core::{FeatureGraph, FeatureRecord, NodeKey, Properties};
/// use geo::Coord;
///
/// let mut graph = FeatureGraph::new();
/// let a = Coord { x: 0.0, y: 0.0 };
/// let b = Coord { x: 1.0, y: 0.0 };
/// graph.add_edge(
///     NodeKey::from("a"),
///     NodeKey::from("b"),
///     FeatureRecord::segment(a, b, Properties::new()),
/// );
/// graph.add_edge(
///     NodeKey::from("a"),
///     NodeKey::from("b"),
///     FeatureRecord::segment(a, b, Properties::new()),
/// );
/// assert_eq!(graph.node_count(), 2);
/// assert_eq!(graph.edge_count(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct FeatureGraph {
    graph: UnGraph<GraphNode, FeatureRecord>,
    index: HashMap<NodeKey, NodeIndex>,
}

impl FeatureGraph {
    /// Create an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Ensure a node exists for `key`, returning its index.
    pub fn add_node(&mut self, key: NodeKey) -> NodeIndex {
        if let Some(existing) = self.index.get(&key) {
            return *existing;
        }
        let index = self.graph.add_node(GraphNode {
            key: key.clone(),
            record: None,
        });
        self.index.insert(key, index);
        index
    }

    /// Attach `record` to the node for `key`, creating the node if needed.
    ///
    /// The last write wins: a record already attached is replaced and
    /// returned.
    pub fn upsert_node(&mut self, key: NodeKey, record: FeatureRecord) -> Option<FeatureRecord> {
        let index = self.add_node(key);
        self.graph
            .node_weight_mut(index)
            .and_then(|node| node.record.replace(record))
    }

    /// Connect the nodes for `source` and `target`, creating them as needed.
    pub fn add_edge(
        &mut self,
        source: NodeKey,
        target: NodeKey,
        record: FeatureRecord,
    ) -> EdgeIndex {
        let from = self.add_node(source);
        let to = self.add_node(target);
        self.graph.add_edge(from, to, record)
    }

    /// Index of the node for `key`.
    #[must_use]
    pub fn node_index(&self, key: &str) -> Option<NodeIndex> {
        self.index.get(key).copied()
    }

    /// Whether a node exists for `key`.
    #[must_use]
    pub fn contains_node(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// The node for `key`.
    #[must_use]
    pub fn node(&self, key: &str) -> Option<&GraphNode> {
        self.node_index(key)
            .and_then(|index| self.graph.node_weight(index))
    }

    /// All nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &GraphNode> + '_ {
        self.graph.node_weights()
    }

    /// All edges in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = GraphEdge<'_>> + '_ {
        self.graph.edge_references().filter_map(|edge| {
            let source = self.graph.node_weight(edge.source())?;
            let target = self.graph.node_weight(edge.target())?;
            Some(GraphEdge {
                source: &source.key,
                target: &target.key,
                record: edge.weight(),
            })
        })
    }

    /// Keys adjacent to `key`, once per connecting edge.
    #[must_use]
    pub fn neighbours(&self, key: &str) -> Vec<&NodeKey> {
        let Some(index) = self.node_index(key) else {
            return Vec::new();
        };
        self.graph
            .neighbors(index)
            .filter_map(|neighbour| self.graph.node_weight(neighbour))
            .map(GraphNode::key)
            .collect()
    }

    /// Number of edges incident to `key`.
    #[must_use]
    pub fn degree(&self, key: &str) -> usize {
        self.node_index(key)
            .map_or(0, |index| self.graph.edges(index).count())
    }

    /// Number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Whether the graph has neither nodes nor edges.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0 && self.graph.edge_count() == 0
    }

    /// The underlying `petgraph` container, for traversal algorithms.
    #[must_use]
    pub const fn as_petgraph(&self) -> &UnGraph<GraphNode, FeatureRecord> {
        &self.graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Properties, PropertyValue};
    use geo::Coord;
    use rstest::{fixture, rstest};

    fn named_point(name: &str) -> FeatureRecord {
        FeatureRecord::point(
            Coord { x: 0.0, y: 0.0 },
            Properties::from([("name".to_owned(), PropertyValue::from(name))]),
        )
    }

    #[fixture]
    fn triangle() -> FeatureGraph {
        let mut graph = FeatureGraph::new();
        for (from, to) in [("a", "b"), ("b", "c"), ("c", "a")] {
            let record = FeatureRecord::segment(
                Coord { x: 0.0, y: 0.0 },
                Coord { x: 1.0, y: 1.0 },
                Properties::new(),
            );
            graph.add_edge(NodeKey::from(from), NodeKey::from(to), record);
        }
        graph
    }

    #[rstest]
    fn shared_keys_collapse(triangle: FeatureGraph) {
        assert_eq!(triangle.node_count(), 3);
        assert_eq!(triangle.edge_count(), 3);
        assert_eq!(triangle.degree("a"), 2);
        let mut around_a: Vec<&str> = triangle.neighbours("a").into_iter().map(NodeKey::as_str).collect();
        around_a.sort_unstable();
        assert_eq!(around_a, vec!["b", "c"]);
    }

    #[rstest]
    fn edges_report_endpoint_keys(triangle: FeatureGraph) {
        let pairs: Vec<(&str, &str)> = triangle
            .edges()
            .map(|edge| (edge.source.as_str(), edge.target.as_str()))
            .collect();
        assert_eq!(pairs, vec![("a", "b"), ("b", "c"), ("c", "a")]);
    }

    #[rstest]
    fn upsert_replaces_the_record() {
        let mut graph = FeatureGraph::new();
        assert!(graph.upsert_node(NodeKey::from("k"), named_point("first")).is_none());
        let replaced = graph
            .upsert_node(NodeKey::from("k"), named_point("second"))
            .expect("previous record returned");
        assert_eq!(replaced, named_point("first"));
        let node = graph.node("k").expect("node present");
        assert_eq!(node.record(), Some(&named_point("second")));
        assert_eq!(graph.node_count(), 1);
    }

    #[rstest]
    fn unknown_keys_have_no_neighbours() {
        let graph = FeatureGraph::new();
        assert!(graph.neighbours("missing").is_empty());
        assert_eq!(graph.degree("missing"), 0);
        assert!(graph.is_empty());
    }
}
