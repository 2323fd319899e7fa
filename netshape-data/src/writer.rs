//! Persist a [`FeatureGraph`] as a point or line shapefile.

use camino::{Utf8Path, Utf8PathBuf};
use log::info;
use netshape_core::{Crs, FeatureGeometry, FeatureGraph, FeatureRecord, GeometryKind, Schema};

use crate::codec::{encode_point, encode_record, encode_segment, prepare_layer};
use crate::error::{CreateError, WriteError};

/// Outcome of a successful write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteSummary {
    /// Destination `.shp` path.
    pub path: Utf8PathBuf,
    /// Geometry kind of the written layer.
    pub geometry: GeometryKind,
    /// Number of features written.
    pub features: usize,
}

/// Geometry kind a graph would be written as.
///
/// The first edge's record decides when the graph has edges; otherwise the
/// first node carrying a record does. `None` when neither exists.
#[must_use]
pub fn infer_geometry_kind(graph: &FeatureGraph) -> Option<GeometryKind> {
    graph
        .edges()
        .next()
        .map(|edge| edge.record.kind())
        .or_else(|| graph.nodes().find_map(|node| node.record().map(FeatureRecord::kind)))
}

/// Configurable graph writer.
///
/// Without a schema the layer gets [`Schema::default_for`] the inferred
/// kind; without a CRS it is tagged WGS84.
///
/// # Examples
/// ```no_run
/// use camino::Utf8Path;
/// use netshape_core::{Crs, FeatureGraph};
/// use netshape_data::{FeatureGraphWriter, read_graph, read_schema};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let source = Utf8Path::new("poles.shp");
/// let (graph, _) = read_graph(source)?;
/// let schema = read_schema(source)?;
/// let summary = FeatureGraphWriter::new()
///     .with_schema(schema)
///     .with_crs(Crs::from_epsg(3857)?)
///     .write(Utf8Path::new("out/poles.shp"), &graph)?;
/// println!("wrote {} features", summary.features);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct FeatureGraphWriter {
    schema: Option<Schema>,
    crs: Option<Crs>,
}

impl FeatureGraphWriter {
    /// Writer with the default schema and CRS.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `schema` for the attribute table.
    #[must_use]
    pub fn with_schema(mut self, schema: Schema) -> Self {
        self.schema = Some(schema);
        self
    }

    /// Tag the layer with `crs`.
    #[must_use]
    pub fn with_crs(mut self, crs: Crs) -> Self {
        self.crs = Some(crs);
        self
    }

    /// Write `graph` to `path`, creating parent directories.
    ///
    /// Point layers get one feature per node and line layers one per edge,
    /// both in insertion order. A failure part-way leaves the partial
    /// files in place.
    ///
    /// # Errors
    /// See [`WriteError`].
    pub fn write(&self, path: &Utf8Path, graph: &FeatureGraph) -> Result<WriteSummary, WriteError> {
        write_graph(path, graph, self.schema.as_ref(), self.crs.as_ref())
    }
}

fn mismatch(path: &Utf8Path, expected: GeometryKind, record: &FeatureRecord) -> WriteError {
    WriteError::GeometryMismatch {
        path: path.to_owned(),
        expected,
        found: record.kind(),
    }
}

/// Write `graph` to `path` with an optional schema and CRS.
///
/// # Errors
/// - [`WriteError::EmptyGraph`] when no node or edge carries a record.
/// - [`WriteError::SchemaGeometryMismatch`] when `schema` declares the
///   other geometry kind.
/// - [`WriteError::Create`] when the destination or its table cannot be
///   created.
/// - [`WriteError::MissingRecord`] for a bare node in a point layer.
/// - [`WriteError::GeometryMismatch`] for a record of the other kind.
/// - [`WriteError::Encode`] for properties that do not fit the schema.
/// - [`WriteError::WriteFeature`] when the shapefile writer fails.
pub fn write_graph(
    path: &Utf8Path,
    graph: &FeatureGraph,
    schema: Option<&Schema>,
    crs: Option<&Crs>,
) -> Result<WriteSummary, WriteError> {
    let geometry = infer_geometry_kind(graph).ok_or(WriteError::EmptyGraph)?;
    let default_schema;
    let schema = if let Some(schema) = schema {
        if schema.geometry() != geometry {
            return Err(WriteError::SchemaGeometryMismatch {
                schema: schema.geometry(),
                graph: geometry,
            });
        }
        schema
    } else {
        default_schema = Schema::default_for(geometry);
        &default_schema
    };
    let default_crs;
    let crs = if let Some(crs) = crs {
        crs
    } else {
        default_crs = Crs::wgs84();
        &default_crs
    };

    let create_error = |source| WriteError::Create {
        path: path.to_owned(),
        source,
    };
    let table = prepare_layer(path, schema, crs).map_err(create_error)?;
    let mut writer = shapefile::Writer::from_path(path.as_std_path(), table)
        .map_err(|source| create_error(CreateError::Open(source)))?;

    let encode_error = |index, source| WriteError::Encode {
        path: path.to_owned(),
        index,
        source,
    };
    let write_error = |index, source| WriteError::WriteFeature {
        path: path.to_owned(),
        index,
        source,
    };

    let mut features = 0;
    match geometry {
        GeometryKind::Point => {
            for node in graph.nodes() {
                let record = node.record().ok_or_else(|| WriteError::MissingRecord {
                    key: node.key().clone(),
                })?;
                let FeatureGeometry::Point(point) = *record.geometry() else {
                    return Err(mismatch(path, geometry, record));
                };
                let row = encode_record(record.properties(), schema)
                    .map_err(|source| encode_error(features, source))?;
                writer
                    .write_shape_and_record(&encode_point(point.0), &row)
                    .map_err(|source| write_error(features, source))?;
                features += 1;
            }
        }
        GeometryKind::LineString => {
            for edge in graph.edges() {
                let FeatureGeometry::LineString(line) = *edge.record.geometry() else {
                    return Err(mismatch(path, geometry, edge.record));
                };
                let row = encode_record(edge.record.properties(), schema)
                    .map_err(|source| encode_error(features, source))?;
                writer
                    .write_shape_and_record(&encode_segment(line), &row)
                    .map_err(|source| write_error(features, source))?;
                features += 1;
            }
        }
    }
    drop(writer);

    info!("wrote {features} {geometry} feature(s) to {path} ({crs})");
    Ok(WriteSummary {
        path: path.to_owned(),
        geometry,
        features,
    })
}
