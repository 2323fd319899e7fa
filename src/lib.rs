//! Facade crate for netshape: shapefile layers as node/edge graphs.
//!
//! This crate re-exports the core graph and schema types and, behind the
//! `shapefile-io` feature, the shapefile readers and writers.

#![forbid(unsafe_code)]

pub use netshape_core::{
    BuildError, CalendarDate, Crs, CrsError, FeatureGeometry, FeatureGraph, FeatureRecord,
    FieldSpec, FieldType, GeometryKind, GraphBuilder, GraphEdge, GraphNode, NodeKey,
    NodeKeyStrategy, PositionIndex, Properties, PropertyValue, Schema, SchemaError, TextualKey,
    select_nodes_by_attribute,
};

#[cfg(feature = "shapefile-io")]
pub use netshape_data::{
    BatchReprojector, CreateError, FailurePolicy, FeatureGraphReader, FeatureGraphWriter,
    MetadataError, ReadError, ReprojectError, ReprojectReport, ReprojectedFile, SkippedFile,
    ValueError, WriteError, WriteSummary, infer_geometry_kind, read_crs, read_fields, read_graph,
    read_schema, reproject_directory, write_graph,
};
