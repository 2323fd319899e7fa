//! Behavioural tests for attribute-based node selection.

use geo::Coord;
use netshape_core::{
    FeatureGraph, FeatureRecord, GraphBuilder, Properties, PropertyValue,
    select_nodes_by_attribute,
};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::cell::RefCell;

fn coloured(x: f64, color: &str) -> FeatureRecord {
    FeatureRecord::point(
        Coord { x, y: 0.0 },
        Properties::from([("color".to_owned(), PropertyValue::from(color))]),
    )
}

#[fixture]
fn graph() -> RefCell<FeatureGraph> {
    RefCell::new(FeatureGraph::new())
}

#[fixture]
fn selected() -> RefCell<Vec<String>> {
    RefCell::new(Vec::new())
}

fn select_into(graph: &RefCell<FeatureGraph>, selected: &RefCell<Vec<String>>, field: &str) {
    let graph = graph.borrow();
    let keys = select_nodes_by_attribute(&graph, field, &PropertyValue::from("red"))
        .into_iter()
        .map(|node| node.key().to_string())
        .collect();
    *selected.borrow_mut() = keys;
}

#[given("a point graph with a red node A and a blue node B")]
fn given_point_graph(#[from(graph)] graph: &RefCell<FeatureGraph>) {
    let mut builder = GraphBuilder::new();
    builder.push(coloured(1.0, "red")).expect("node A");
    builder.push(coloured(2.0, "blue")).expect("node B");
    let (built, _) = builder.finish().expect("graph built");
    *graph.borrow_mut() = built;
}

#[given("a line graph of two connected segments")]
fn given_line_graph(#[from(graph)] graph: &RefCell<FeatureGraph>) {
    let mut builder = GraphBuilder::new();
    let red = Properties::from([("color".to_owned(), PropertyValue::from("red"))]);
    let origin = Coord { x: 0.0, y: 0.0 };
    builder
        .push(FeatureRecord::segment(origin, Coord { x: 1.0, y: 0.0 }, red.clone()))
        .expect("first segment");
    builder
        .push(FeatureRecord::segment(origin, Coord { x: 0.0, y: 1.0 }, red))
        .expect("second segment");
    let (built, _) = builder.finish().expect("graph built");
    *graph.borrow_mut() = built;
}

#[when("I select nodes whose color is red")]
fn when_select_color(
    #[from(graph)] graph: &RefCell<FeatureGraph>,
    #[from(selected)] selected: &RefCell<Vec<String>>,
) {
    select_into(graph, selected, "color");
}

#[when("I select nodes whose voltage is red")]
fn when_select_voltage(
    #[from(graph)] graph: &RefCell<FeatureGraph>,
    #[from(selected)] selected: &RefCell<Vec<String>>,
) {
    select_into(graph, selected, "voltage");
}

#[then("exactly node A is returned")]
fn then_node_a(#[from(selected)] selected: &RefCell<Vec<String>>) {
    assert_eq!(*selected.borrow(), vec!["(1.0, 0.0)".to_owned()]);
}

#[then("no nodes are returned")]
fn then_nothing(#[from(selected)] selected: &RefCell<Vec<String>>) {
    assert!(selected.borrow().is_empty(), "expected no matches");
}

#[scenario(path = "tests/features/attribute_filter.feature", index = 0)]
fn scenario_select_red(graph: RefCell<FeatureGraph>, selected: RefCell<Vec<String>>) {
    let _ = (graph, selected);
}

#[scenario(path = "tests/features/attribute_filter.feature", index = 1)]
fn scenario_missing_field(graph: RefCell<FeatureGraph>, selected: RefCell<Vec<String>>) {
    let _ = (graph, selected);
}

#[scenario(path = "tests/features/attribute_filter.feature", index = 2)]
fn scenario_line_graph(graph: RefCell<FeatureGraph>, selected: RefCell<Vec<String>>) {
    let _ = (graph, selected);
}
