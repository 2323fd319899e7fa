//! Load a point or line shapefile into a [`FeatureGraph`].

use camino::Utf8Path;
use log::debug;
use netshape_core::{
    BuildError, FeatureGraph, FeatureRecord, GraphBuilder, NodeKeyStrategy, PositionIndex,
    TextualKey,
};

use crate::codec::{GeometryError, decode_geometry, decode_record};
use crate::error::ReadError;
use crate::metadata::read_fields;

/// Reads shapefiles into graphs, deriving node identity from a
/// [`NodeKeyStrategy`].
///
/// # Examples
/// ```no_run
/// use camino::Utf8Path;
/// use geo::Coord;
/// use netshape_core::NodeKey;
/// use netshape_data::FeatureGraphReader;
///
/// // Snap coordinates to a millimetre grid before keying.
/// let snapped = |c: Coord<f64>| NodeKey::new(format!("{:.3} {:.3}", c.x, c.y));
/// let (graph, _) = FeatureGraphReader::with_strategy(snapped).read(Utf8Path::new("lines.shp"))?;
/// println!("{} nodes", graph.node_count());
/// # Ok::<(), netshape_data::ReadError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct FeatureGraphReader<K = TextualKey> {
    strategy: K,
}

impl FeatureGraphReader<TextualKey> {
    /// Reader keyed by coordinate text.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<K: NodeKeyStrategy + Clone> FeatureGraphReader<K> {
    /// Reader keyed by `strategy`.
    pub const fn with_strategy(strategy: K) -> Self {
        Self { strategy }
    }

    /// Read every feature of `path` into a graph and position index.
    ///
    /// The first feature fixes the mode: points become nodes, two-point
    /// polylines become edges between endpoint nodes. Points landing on an
    /// existing key replace its record. Nothing is returned on failure.
    ///
    /// # Errors
    /// See [`ReadError`]; every variant names `path`.
    pub fn read(&self, path: &Utf8Path) -> Result<(FeatureGraph, PositionIndex), ReadError> {
        let mut reader =
            shapefile::Reader::from_path(path.as_std_path()).map_err(|source| ReadError::Open {
                path: path.to_owned(),
                source,
            })?;
        let fields = read_fields(path)?;

        let mut builder = GraphBuilder::with_strategy(self.strategy.clone());
        for (index, item) in reader.iter_shapes_and_records().enumerate() {
            let (shape, record) = item.map_err(|source| ReadError::ReadFeature {
                path: path.to_owned(),
                index,
                source,
            })?;
            let geometry = decode_geometry(&shape).map_err(|err| match err {
                GeometryError::Unsupported { shape_type } => ReadError::UnsupportedGeometry {
                    path: path.to_owned(),
                    index,
                    shape_type,
                },
                GeometryError::Malformed { parts, points } => ReadError::MalformedGeometry {
                    path: path.to_owned(),
                    index,
                    parts,
                    points,
                },
            })?;
            let properties = decode_record(&record, &fields).map_err(|source| ReadError::Decode {
                path: path.to_owned(),
                index,
                source,
            })?;

            let displaced = builder
                .push(FeatureRecord::new(geometry, properties))
                .map_err(|err| build_error(path, err))?;
            if displaced.is_some() {
                debug!("feature {index} in {path} replaced an earlier point at the same key");
            }
        }

        let features = builder.len();
        let (graph, positions) = builder.finish().map_err(|err| build_error(path, err))?;
        debug!(
            "read {features} feature(s) from {path} into {} node(s) and {} edge(s)",
            graph.node_count(),
            graph.edge_count()
        );
        Ok((graph, positions))
    }
}

fn build_error(path: &Utf8Path, err: BuildError) -> ReadError {
    match err {
        BuildError::Empty => ReadError::EmptyLayer {
            path: path.to_owned(),
        },
        BuildError::GeometryMismatch {
            index,
            expected,
            found,
        } => ReadError::GeometryMismatch {
            path: path.to_owned(),
            index,
            expected,
            found,
        },
    }
}

/// Read `path` with coordinate-text node identity.
///
/// # Errors
/// See [`FeatureGraphReader::read`].
///
/// # Examples
/// ```no_run
/// use camino::Utf8Path;
///
/// let (graph, positions) = netshape_data::read_graph(Utf8Path::new("lines.shp"))?;
/// assert_eq!(graph.node_count(), positions.len());
/// # Ok::<(), netshape_data::ReadError>(())
/// ```
pub fn read_graph(path: &Utf8Path) -> Result<(FeatureGraph, PositionIndex), ReadError> {
    FeatureGraphReader::new().read(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use netshape_core::GeometryKind;
    use rstest::rstest;

    #[rstest]
    fn empty_builds_report_an_empty_layer() {
        let err = build_error(Utf8Path::new("empty.shp"), BuildError::Empty);
        assert!(matches!(err, ReadError::EmptyLayer { path } if path == "empty.shp"));
    }

    #[rstest]
    fn mismatches_keep_their_position() {
        let err = build_error(
            Utf8Path::new("mixed.shp"),
            BuildError::GeometryMismatch {
                index: 4,
                expected: GeometryKind::LineString,
                found: GeometryKind::Point,
            },
        );
        assert!(matches!(
            err,
            ReadError::GeometryMismatch {
                index: 4,
                expected: GeometryKind::LineString,
                found: GeometryKind::Point,
                ..
            }
        ));
    }

    #[rstest]
    fn missing_files_fail_to_open() {
        let err = read_graph(Utf8Path::new("/nonexistent/lines.shp")).expect_err("missing file");
        assert!(matches!(err, ReadError::Open { .. }));
    }
}
