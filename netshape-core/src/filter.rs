//! Attribute-based node selection.

use crate::{FeatureGraph, GraphNode, PropertyValue};

/// Nodes whose record stores `value` under `field`.
///
/// A linear scan in graph order. Values compare with
/// [`PropertyValue::matches`], so `Integer(3)` finds a stored `Number(3.0)`.
/// Nodes lacking the field, or lacking a record altogether, are skipped.
/// No match yields an empty vector; uniqueness is not checked.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use netshape_core::{
///     FeatureGraph, FeatureRecord, NodeKey, Properties, PropertyValue, select_nodes_by_attribute,
/// };
///
/// let mut graph = FeatureGraph::new();
/// let props = Properties::from([("color".to_owned(), PropertyValue::from("red"))]);
/// graph.upsert_node(NodeKey::from("A"), FeatureRecord::point(Coord { x: 0.0, y: 0.0 }, props));
///
/// let red = select_nodes_by_attribute(&graph, "color", &PropertyValue::from("red"));
/// assert_eq!(red.len(), 1);
/// assert!(select_nodes_by_attribute(&graph, "size", &PropertyValue::from("red")).is_empty());
/// ```
#[must_use]
pub fn select_nodes_by_attribute<'g>(
    graph: &'g FeatureGraph,
    field: &str,
    value: &PropertyValue,
) -> Vec<&'g GraphNode> {
    graph
        .nodes()
        .filter(|node| {
            node.record()
                .and_then(|record| record.property(field))
                .is_some_and(|stored| stored.matches(value))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FeatureRecord, NodeKey, Properties};
    use geo::Coord;
    use rstest::{fixture, rstest};

    fn node_with(props: &[(&str, PropertyValue)]) -> FeatureRecord {
        let properties: Properties = props
            .iter()
            .map(|(name, value)| ((*name).to_owned(), value.clone()))
            .collect();
        FeatureRecord::point(Coord { x: 0.0, y: 0.0 }, properties)
    }

    #[fixture]
    fn poles() -> FeatureGraph {
        let mut graph = FeatureGraph::new();
        graph.upsert_node(
            NodeKey::from("A"),
            node_with(&[("color", "red".into()), ("height", PropertyValue::Number(9.0))]),
        );
        graph.upsert_node(NodeKey::from("B"), node_with(&[("color", "blue".into())]));
        graph.upsert_node(
            NodeKey::from("C"),
            node_with(&[("color", "red".into()), ("height", PropertyValue::Integer(12))]),
        );
        graph.add_node(NodeKey::from("bare"));
        graph
    }

    fn keys<'g>(nodes: &[&'g GraphNode]) -> Vec<&'g str> {
        nodes.iter().map(|node| node.key().as_str()).collect()
    }

    #[rstest]
    fn returns_every_match_in_graph_order(poles: FeatureGraph) {
        let red = select_nodes_by_attribute(&poles, "color", &PropertyValue::from("red"));
        assert_eq!(keys(&red), vec!["A", "C"]);
    }

    #[rstest]
    #[case(PropertyValue::Integer(9), vec!["A"])]
    #[case(PropertyValue::Number(12.0), vec!["C"])]
    #[case(PropertyValue::from("9"), vec![])]
    fn numbers_match_across_representations(
        poles: FeatureGraph,
        #[case] value: PropertyValue,
        #[case] expected: Vec<&str>,
    ) {
        let found = select_nodes_by_attribute(&poles, "height", &value);
        assert_eq!(keys(&found), expected);
    }

    #[rstest]
    fn unknown_fields_yield_nothing(poles: FeatureGraph) {
        let found = select_nodes_by_attribute(&poles, "voltage", &PropertyValue::from("red"));
        assert!(found.is_empty());
    }
}
