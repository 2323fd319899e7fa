//! Error types raised by the shapefile adapters.
#![forbid(unsafe_code)]

use camino::Utf8PathBuf;
use netshape_core::{FieldType, GeometryKind, NodeKey, SchemaError};
use shapefile::dbase;
use thiserror::Error;

/// Errors raised while converting between attribute values and dBASE fields.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValueError {
    /// A record lacks a field its table declares.
    #[error("record has no value for declared field {field:?}")]
    MissingField {
        /// Declared field name.
        field: String,
    },
    /// A stored dBASE value has no property equivalent.
    #[error("field {field:?} holds an unsupported {kind} value")]
    UnsupportedValue {
        /// Field name.
        field: String,
        /// dBASE value kind.
        kind: &'static str,
    },
    /// A property is not declared in the output schema.
    #[error("property {field:?} is not declared in the schema")]
    NotInSchema {
        /// Property name.
        field: String,
    },
    /// A property's kind does not fit its field type.
    #[error("property {field:?} holds a {found} value but the field is {expected}")]
    TypeMismatch {
        /// Property name.
        field: String,
        /// Declared field type.
        expected: FieldType,
        /// Kind of the offending value.
        found: &'static str,
    },
}

/// Reasons a destination layer could not be created.
#[derive(Debug, Error)]
pub enum CreateError {
    /// Creating the parent directory failed.
    #[error("failed to create the parent directory")]
    Directory(#[source] std::io::Error),
    /// The dBASE table rejected a field name (at most 10 ASCII bytes).
    #[error("field name {field:?} is not a valid dBASE field name")]
    FieldName {
        /// Rejected name.
        field: String,
    },
    /// The shapefile writer could not be opened.
    #[error("failed to open the shapefile writer")]
    Open(#[source] shapefile::Error),
    /// Writing the `.prj` sidecar failed.
    #[error("failed to write the projection file")]
    Projection(#[source] std::io::Error),
}

/// Errors raised while reading a layer's schema or CRS.
#[derive(Debug, Error)]
pub enum MetadataError {
    /// The shapefile could not be opened.
    #[error("failed to open shapefile at {path}")]
    Open {
        /// Requested path.
        path: Utf8PathBuf,
        /// Source error from `shapefile`.
        #[source]
        source: shapefile::Error,
    },
    /// The attribute table could not be opened.
    #[error("failed to open attribute table at {path}")]
    OpenTable {
        /// Path of the `.dbf` file.
        path: Utf8PathBuf,
        /// Source error from `dbase`.
        #[source]
        source: dbase::Error,
    },
    /// The table's field descriptors could not be read for their decimal
    /// counts.
    #[error("failed to read field descriptors of {path}")]
    ReadDescriptors {
        /// Path of the `.dbf` file.
        path: Utf8PathBuf,
        /// Source error from std I/O.
        #[source]
        source: std::io::Error,
    },
    /// The projection sidecar exists but could not be read.
    #[error("failed to read projection file at {path}")]
    ReadProjection {
        /// Path of the `.prj` file.
        path: Utf8PathBuf,
        /// Source error from std I/O.
        #[source]
        source: std::io::Error,
    },
    /// The layer's shape type is neither point nor polyline.
    #[error("shapefile at {path} holds {shape_type} shapes; only Point and Polyline are supported")]
    UnsupportedGeometry {
        /// Requested path.
        path: Utf8PathBuf,
        /// Shape type named in the header.
        shape_type: String,
    },
    /// A dBASE field type has no schema equivalent.
    #[error("field {field:?} in {path} has unsupported dBASE type {field_type}")]
    UnsupportedField {
        /// Path of the `.dbf` file.
        path: Utf8PathBuf,
        /// Field name.
        field: String,
        /// dBASE type name.
        field_type: String,
    },
    /// The table's fields do not form a valid schema.
    #[error("attribute table at {path} does not form a valid schema")]
    InvalidSchema {
        /// Path of the `.dbf` file.
        path: Utf8PathBuf,
        /// Schema validation failure.
        #[source]
        source: SchemaError,
    },
}

/// Errors raised by [`read_graph`](crate::read_graph).
#[derive(Debug, Error)]
pub enum ReadError {
    /// The shapefile could not be opened.
    #[error("failed to open shapefile at {path}")]
    Open {
        /// Requested path.
        path: Utf8PathBuf,
        /// Source error from `shapefile`.
        #[source]
        source: shapefile::Error,
    },
    /// Reading the attribute fields failed.
    #[error(transparent)]
    Metadata(#[from] MetadataError),
    /// The layer holds no features.
    #[error("shapefile at {path} contains no features")]
    EmptyLayer {
        /// Requested path.
        path: Utf8PathBuf,
    },
    /// A feature's shape is neither a point nor a polyline.
    #[error("feature {index} in {path} is a {shape_type}; only Point and Polyline are supported")]
    UnsupportedGeometry {
        /// Requested path.
        path: Utf8PathBuf,
        /// Zero-based feature position.
        index: usize,
        /// Shape type of the feature.
        shape_type: String,
    },
    /// A polyline is not a single two-point segment.
    #[error(
        "feature {index} in {path} has {parts} part(s) and {points} point(s); expected one two-point segment"
    )]
    MalformedGeometry {
        /// Requested path.
        path: Utf8PathBuf,
        /// Zero-based feature position.
        index: usize,
        /// Number of parts in the polyline.
        parts: usize,
        /// Total number of points in the polyline.
        points: usize,
    },
    /// A feature's kind differs from the first feature's.
    #[error("feature {index} in {path} is a {found} but the layer holds {expected} features")]
    GeometryMismatch {
        /// Requested path.
        path: Utf8PathBuf,
        /// Zero-based feature position.
        index: usize,
        /// Mode chosen from the first feature.
        expected: GeometryKind,
        /// Kind of the offending feature.
        found: GeometryKind,
    },
    /// Decoding a shape or record failed.
    #[error("failed to read feature {index} from {path}")]
    ReadFeature {
        /// Requested path.
        path: Utf8PathBuf,
        /// Zero-based feature position.
        index: usize,
        /// Source error from `shapefile`.
        #[source]
        source: shapefile::Error,
    },
    /// An attribute value could not be decoded.
    #[error("failed to decode attributes of feature {index} in {path}")]
    Decode {
        /// Requested path.
        path: Utf8PathBuf,
        /// Zero-based feature position.
        index: usize,
        /// Conversion failure.
        #[source]
        source: ValueError,
    },
}

/// Errors raised by [`write_graph`](crate::write_graph).
#[derive(Debug, Error)]
pub enum WriteError {
    /// The graph has nothing to write.
    #[error("graph holds no feature records; nothing to write")]
    EmptyGraph,
    /// The supplied schema declares a different geometry than the graph holds.
    #[error("schema declares {schema} geometry but the graph holds {graph} features")]
    SchemaGeometryMismatch {
        /// Geometry declared by the schema.
        schema: GeometryKind,
        /// Geometry inferred from the graph.
        graph: GeometryKind,
    },
    /// The destination could not be created.
    #[error("failed to create shapefile at {path}")]
    Create {
        /// Destination path.
        path: Utf8PathBuf,
        /// Creation failure.
        #[source]
        source: CreateError,
    },
    /// A point-mode node carries no record.
    #[error("node {key} carries no feature record")]
    MissingRecord {
        /// Key of the bare node.
        key: NodeKey,
    },
    /// A record's geometry differs from the kind being written.
    #[error("cannot write a {found} feature into the {expected} layer at {path}")]
    GeometryMismatch {
        /// Destination path.
        path: Utf8PathBuf,
        /// Kind being written.
        expected: GeometryKind,
        /// Kind of the offending record.
        found: GeometryKind,
    },
    /// A record's properties do not fit the schema.
    #[error("feature {index} does not fit the schema of {path}")]
    Encode {
        /// Destination path.
        path: Utf8PathBuf,
        /// Zero-based output position.
        index: usize,
        /// Conversion failure.
        #[source]
        source: ValueError,
    },
    /// The shapefile writer rejected a feature.
    #[error("failed to write feature {index} to {path}")]
    WriteFeature {
        /// Destination path.
        path: Utf8PathBuf,
        /// Zero-based output position.
        index: usize,
        /// Source error from `shapefile`.
        #[source]
        source: shapefile::Error,
    },
}

/// Errors raised by [`reproject_directory`](crate::reproject_directory).
#[derive(Debug, Error)]
pub enum ReprojectError {
    /// The input directory could not be listed.
    #[error("failed to list shapefiles in {path}")]
    ReadDirectory {
        /// Input directory.
        path: Utf8PathBuf,
        /// Source error from std I/O.
        #[source]
        source: std::io::Error,
    },
    /// The output directory does not exist.
    #[error("output directory {path} does not exist or is not a directory")]
    MissingOutputDirectory {
        /// Output directory.
        path: Utf8PathBuf,
    },
    /// The output directory resolves to the input directory.
    #[error("output directory {path} is the input directory; the source layers would be overwritten")]
    SameDirectory {
        /// Output directory as given.
        path: Utf8PathBuf,
    },
    /// Resolving a directory path failed.
    #[error("failed to resolve directory {path}")]
    ResolveDirectory {
        /// Directory being resolved.
        path: Utf8PathBuf,
        /// Source error from std I/O.
        #[source]
        source: std::io::Error,
    },
    /// Reading the source schema failed.
    #[error(transparent)]
    Metadata(#[from] MetadataError),
    /// The source shapefile could not be opened.
    #[error("failed to open shapefile at {path}")]
    Open {
        /// Source path.
        path: Utf8PathBuf,
        /// Source error from `shapefile`.
        #[source]
        source: shapefile::Error,
    },
    /// The destination could not be created.
    #[error("failed to create shapefile at {path}")]
    Create {
        /// Destination path.
        path: Utf8PathBuf,
        /// Creation failure.
        #[source]
        source: CreateError,
    },
    /// Decoding a source feature failed.
    #[error("failed to read feature {index} from {path}")]
    ReadFeature {
        /// Source path.
        path: Utf8PathBuf,
        /// Zero-based feature position.
        index: usize,
        /// Source error from `shapefile`.
        #[source]
        source: shapefile::Error,
    },
    /// A source feature's shape is neither a point nor a polyline.
    #[error("feature {index} in {path} is a {shape_type}; only Point and Polyline are supported")]
    UnsupportedGeometry {
        /// Source path.
        path: Utf8PathBuf,
        /// Zero-based feature position.
        index: usize,
        /// Shape type of the feature.
        shape_type: String,
    },
    /// A source record's attributes could not be carried across.
    #[error("failed to convert attributes of feature {index} in {path}")]
    Convert {
        /// Source path.
        path: Utf8PathBuf,
        /// Zero-based feature position.
        index: usize,
        /// Conversion failure.
        #[source]
        source: ValueError,
    },
    /// The shapefile writer rejected a feature.
    #[error("failed to write feature {index} to {path}")]
    WriteFeature {
        /// Destination path.
        path: Utf8PathBuf,
        /// Zero-based feature position.
        index: usize,
        /// Source error from `shapefile`.
        #[source]
        source: shapefile::Error,
    },
}
