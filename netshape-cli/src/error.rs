//! Error type emitted by the netshape CLI.

use std::sync::Arc;

use netshape_core::CrsError;
use netshape_data::{MetadataError, ReadError, ReprojectError, WriteError};
use thiserror::Error;

/// Errors emitted by the netshape CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        field: &'static str,
        env: &'static str,
    },
    /// The requested EPSG code has no built-in definition.
    #[error(transparent)]
    Crs(#[from] CrsError),
    /// Reading a layer's schema or CRS failed.
    #[error(transparent)]
    Metadata(#[from] MetadataError),
    /// Loading a layer into a graph failed.
    #[error(transparent)]
    Read(#[from] ReadError),
    /// Writing a graph failed.
    #[error(transparent)]
    Write(#[from] WriteError),
    /// Batch reprojection failed.
    #[error(transparent)]
    Reproject(#[from] ReprojectError),
    /// Serializing the schema failed.
    #[error("failed to serialize schema: {0}")]
    SerializeSchema(#[source] serde_json::Error),
    /// Writing command output failed.
    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
}
