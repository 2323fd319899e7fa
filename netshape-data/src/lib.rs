//! Shapefile adapters for the netshape feature graph.
//!
//! Responsibilities:
//! - Read a layer's schema and CRS without loading its features.
//! - Load point and line layers into a [`netshape_core::FeatureGraph`].
//! - Write graphs back out as shapefiles with a `.prj` sidecar.
//! - Re-tag every shapefile in a directory with a new CRS.
//!
//! Boundaries:
//! - Graph identity rules live in `netshape-core`.
//! - Blocking, single-threaded I/O; every file handle is dropped before
//!   returning.
//!
//! Invariants:
//! - Geometry is limited to Point and two-point Polyline shapes.
//! - No global mutable state; callers install their own logger.

mod codec;
mod error;
mod metadata;
mod projection;
mod reader;
mod reproject;
mod writer;

pub use error::{CreateError, MetadataError, ReadError, ReprojectError, ValueError, WriteError};
pub use metadata::{read_crs, read_fields, read_schema};
pub use projection::projection_path;
pub use reader::{FeatureGraphReader, read_graph};
pub use reproject::{
    BatchReprojector, FailurePolicy, ReprojectReport, ReprojectedFile, SkippedFile,
    reproject_directory,
};
pub use writer::{FeatureGraphWriter, WriteSummary, infer_geometry_kind, write_graph};
