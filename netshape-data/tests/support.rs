//! Shapefile fixtures written with the `shapefile` crate directly.
#![allow(dead_code)]

use camino::{Utf8Path, Utf8PathBuf};
use netshape_core::{Crs, FeatureGraph};
use netshape_data::read_schema;
use shapefile::dbase::{FieldName, FieldValue, Record, TableWriterBuilder};
use shapefile::{Multipoint, Point, Polyline};
use tempfile::TempDir;

/// A pole as stored in the point fixtures: location, name, id and height.
pub type Pole = ((f64, f64), &'static str, i32, f64);

/// Three poles at distinct coordinates.
pub const POLES: [Pole; 3] = [
    ((120.5, 14.25), "A", 123_456, 1.234_567_890_12),
    ((120.75, 14.5), "B", 7, 12.25),
    ((121.0, 14.75), "C", -42, 10.000_000_000_01),
];

/// Temporary directory with a UTF-8 root path.
pub struct Workspace {
    _tmp: TempDir,
    /// Root of the temporary directory.
    pub root: Utf8PathBuf,
}

impl Workspace {
    /// Fresh empty workspace.
    pub fn new() -> Self {
        let tmp = TempDir::new().unwrap_or_else(|err| panic!("failed to create tempdir: {err}"));
        let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf())
            .unwrap_or_else(|path| panic!("temporary path {path:?} is not UTF-8"));
        Self { _tmp: tmp, root }
    }
}

fn field(name: &str) -> FieldName {
    FieldName::try_from(name).unwrap_or_else(|_| panic!("invalid fixture field name {name:?}"))
}

fn label_table() -> TableWriterBuilder {
    TableWriterBuilder::new().add_character_field(field("label"), 8)
}

fn label_record(label: &str) -> Record {
    let mut record = Record::default();
    record.insert("label".to_owned(), FieldValue::Character(Some(label.to_owned())));
    record
}

/// Write `poles` as a point layer with `name` (C, 20), `id` (N, 10.0) and
/// `height` (N, 19.11) columns.
pub fn write_poles(path: &Utf8Path, poles: &[Pole]) {
    let table = TableWriterBuilder::new()
        .add_character_field(field("name"), 20)
        .add_numeric_field(field("id"), 10, 0)
        .add_numeric_field(field("height"), 19, 11);
    let mut writer = shapefile::Writer::from_path(path.as_std_path(), table)
        .unwrap_or_else(|err| panic!("failed to create {path}: {err}"));
    for ((x, y), name, id, height) in poles {
        let mut record = Record::default();
        record.insert("name".to_owned(), FieldValue::Character(Some((*name).to_owned())));
        record.insert("id".to_owned(), FieldValue::Numeric(Some(f64::from(*id))));
        record.insert("height".to_owned(), FieldValue::Numeric(Some(*height)));
        writer
            .write_shape_and_record(&Point::new(*x, *y), &record)
            .unwrap_or_else(|err| panic!("failed to write pole {name}: {err}"));
    }
}

/// Write one two-point polyline per segment, labelled by position.
pub fn write_segments(path: &Utf8Path, segments: &[((f64, f64), (f64, f64))]) {
    let mut writer = shapefile::Writer::from_path(path.as_std_path(), label_table())
        .unwrap_or_else(|err| panic!("failed to create {path}: {err}"));
    for (index, (start, end)) in segments.iter().enumerate() {
        let line = Polyline::new(vec![Point::new(start.0, start.1), Point::new(end.0, end.1)]);
        writer
            .write_shape_and_record(&line, &label_record(&format!("s{index}")))
            .unwrap_or_else(|err| panic!("failed to write segment {index}: {err}"));
    }
}

/// Write a single polyline through every point in `points`.
pub fn write_polyline(path: &Utf8Path, points: &[(f64, f64)]) {
    let mut writer = shapefile::Writer::from_path(path.as_std_path(), label_table())
        .unwrap_or_else(|err| panic!("failed to create {path}: {err}"));
    let line = Polyline::new(points.iter().map(|(x, y)| Point::new(*x, *y)).collect());
    writer
        .write_shape_and_record(&line, &label_record("bent"))
        .unwrap_or_else(|err| panic!("failed to write polyline: {err}"));
}

/// Write a layer holding one multipoint shape.
pub fn write_multipoint(path: &Utf8Path) {
    let mut writer = shapefile::Writer::from_path(path.as_std_path(), label_table())
        .unwrap_or_else(|err| panic!("failed to create {path}: {err}"));
    let cloud = Multipoint::new(vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0)]);
    writer
        .write_shape_and_record(&cloud, &label_record("cloud"))
        .unwrap_or_else(|err| panic!("failed to write multipoint: {err}"));
}

/// Write `crs` into the `.prj` beside `shp`.
pub fn write_prj(shp: &Utf8Path, crs: &Crs) {
    let prj = shp.with_extension("prj");
    std::fs::write(&prj, crs.wkt()).unwrap_or_else(|err| panic!("failed to write {prj}: {err}"));
}

/// Assert that two graphs hold the same node keys with equal records.
pub fn assert_same_nodes(expected: &FeatureGraph, actual: &FeatureGraph) {
    assert_eq!(actual.node_count(), expected.node_count(), "node count differs");
    for node in expected.nodes() {
        let copy = actual
            .node(node.key().as_str())
            .unwrap_or_else(|| panic!("node {} missing from copy", node.key()));
        let (Some(want), Some(got)) = (node.record(), copy.record()) else {
            panic!("node {} lacks a record", node.key());
        };
        assert_eq!(got.coordinates(), want.coordinates(), "coordinates of {}", node.key());
        assert_eq!(got.properties(), want.properties(), "attributes of {}", node.key());
    }
}

/// Assert that the layer at `actual` declares exactly the schema of `expected`.
pub fn assert_same_schema(expected: &Utf8Path, actual: &Utf8Path) {
    let want = read_schema(expected).unwrap_or_else(|err| panic!("schema of {expected}: {err}"));
    let got = read_schema(actual).unwrap_or_else(|err| panic!("schema of {actual}: {err}"));
    assert_eq!(got, want, "schema of {actual} differs from {expected}");
}
