//! Core domain types for netshape.
//!
//! The crate models the mapping between geographic features and a topological
//! graph without touching the filesystem:
//! - [`FeatureRecord`] carries one feature's geometry and attributes.
//! - [`NodeKey`] gives a coordinate its node identity.
//! - [`FeatureGraph`] and [`PositionIndex`] hold the result of a read.
//! - [`GraphBuilder`] applies the identity rules feature by feature.
//! - [`select_nodes_by_attribute`] filters nodes by a stored property.
//!
//! File adapters live in `netshape-data`.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod builder;
mod crs;
mod feature;
pub mod filter;
mod graph;
mod key;
mod position;
mod property;
mod schema;

pub use builder::{BuildError, GraphBuilder};
pub use crs::{Crs, CrsError};
pub use feature::{FeatureGeometry, FeatureRecord, GeometryKind};
pub use filter::select_nodes_by_attribute;
pub use graph::{FeatureGraph, GraphEdge, GraphNode};
pub use key::{NodeKey, NodeKeyStrategy, TextualKey};
pub use position::PositionIndex;
pub use property::{CalendarDate, Properties, PropertyValue};
pub use schema::{FieldSpec, FieldType, Schema, SchemaError};
