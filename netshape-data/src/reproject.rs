//! Batch re-tagging of every shapefile in a directory with a new CRS.
//!
//! Geometry is copied verbatim; only the `.prj` sidecar changes. Attribute
//! rows are decoded and re-encoded against the source schema.

use camino::{Utf8Path, Utf8PathBuf};
use log::{debug, info, warn};
use netshape_core::Crs;
use shapefile::Shape;

use crate::codec::{decode_record, encode_record, prepare_layer, shape_type_name};
use crate::error::{CreateError, ReprojectError};
use crate::metadata::read_schema;

/// What to do when one file in the batch fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Stop at the first failing file and return its error. Files already
    /// written stay on disk.
    #[default]
    AbortOnFirstFailure,
    /// Log the failure, record it in the report and carry on.
    SkipFailures,
}

/// A file copied into the output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReprojectedFile {
    /// Source `.shp` path.
    pub source: Utf8PathBuf,
    /// Destination `.shp` path.
    pub destination: Utf8PathBuf,
    /// Number of features copied.
    pub features: usize,
}

/// A file left out under [`FailurePolicy::SkipFailures`].
#[derive(Debug)]
pub struct SkippedFile {
    /// Source `.shp` path.
    pub source: Utf8PathBuf,
    /// Why it failed.
    pub error: ReprojectError,
}

/// Outcome of a batch run.
#[derive(Debug, Default)]
pub struct ReprojectReport {
    /// Files written, in processing order.
    pub written: Vec<ReprojectedFile>,
    /// Files skipped, in processing order.
    pub skipped: Vec<SkippedFile>,
}

impl ReprojectReport {
    /// Total features copied across all written files.
    #[must_use]
    pub fn features(&self) -> usize {
        self.written.iter().map(|file| file.features).sum()
    }
}

/// Copies every `.shp` in a directory into another, tagged with one CRS.
///
/// # Examples
/// ```no_run
/// use camino::Utf8Path;
/// use netshape_core::Crs;
/// use netshape_data::{BatchReprojector, FailurePolicy};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let report = BatchReprojector::new(Crs::from_epsg(3857)?)
///     .with_policy(FailurePolicy::SkipFailures)
///     .run(Utf8Path::new("in"), Utf8Path::new("out"))?;
/// for skipped in &report.skipped {
///     eprintln!("{}: {}", skipped.source, skipped.error);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct BatchReprojector {
    crs: Crs,
    policy: FailurePolicy,
}

impl BatchReprojector {
    /// Reprojector targeting `crs` that aborts on the first failure.
    #[must_use]
    pub fn new(crs: Crs) -> Self {
        Self {
            crs,
            policy: FailurePolicy::default(),
        }
    }

    /// Replace the failure policy.
    #[must_use]
    pub const fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Target CRS.
    #[must_use]
    pub const fn crs(&self) -> &Crs {
        &self.crs
    }

    /// Process every `.shp` directly inside `input_dir`, matching the
    /// extension without regard to ASCII case, in file-name order. Each
    /// output keeps its source file name.
    ///
    /// # Errors
    /// Returns [`ReprojectError::ReadDirectory`] when `input_dir` cannot be
    /// listed, [`ReprojectError::MissingOutputDirectory`] when `output_dir`
    /// is not an existing directory and [`ReprojectError::SameDirectory`]
    /// when both resolve to one directory. Nothing is written in those
    /// cases. Under
    /// [`FailurePolicy::AbortOnFirstFailure`] the first per-file error is
    /// returned as is.
    pub fn run(
        &self,
        input_dir: &Utf8Path,
        output_dir: &Utf8Path,
    ) -> Result<ReprojectReport, ReprojectError> {
        let names = netshape_fs::list_files_with_extension(input_dir, "shp").map_err(|source| {
            ReprojectError::ReadDirectory {
                path: input_dir.to_owned(),
                source,
            }
        })?;
        if !netshape_fs::dir_is_dir(output_dir).unwrap_or(false) {
            return Err(ReprojectError::MissingOutputDirectory {
                path: output_dir.to_owned(),
            });
        }
        let same = netshape_fs::same_directory(input_dir, output_dir).map_err(|source| {
            ReprojectError::ResolveDirectory {
                path: output_dir.to_owned(),
                source,
            }
        })?;
        if same {
            return Err(ReprojectError::SameDirectory {
                path: output_dir.to_owned(),
            });
        }

        let mut report = ReprojectReport::default();
        for name in names {
            let source = input_dir.join(&name);
            let destination = output_dir.join(&name);
            debug!("reprojecting {source} to {destination}");
            match reproject_file(&source, &destination, &self.crs) {
                Ok(features) => report.written.push(ReprojectedFile {
                    source,
                    destination,
                    features,
                }),
                Err(error) => match self.policy {
                    FailurePolicy::AbortOnFirstFailure => return Err(error),
                    FailurePolicy::SkipFailures => {
                        warn!("skipping {source}: {error}");
                        report.skipped.push(SkippedFile { source, error });
                    }
                },
            }
        }

        info!(
            "reprojected {} file(s) ({} feature(s)) into {output_dir} as {}; skipped {}",
            report.written.len(),
            report.features(),
            self.crs,
            report.skipped.len()
        );
        Ok(report)
    }
}

fn reproject_file(
    source: &Utf8Path,
    destination: &Utf8Path,
    crs: &Crs,
) -> Result<usize, ReprojectError> {
    let schema = read_schema(source)?;
    let mut reader =
        shapefile::Reader::from_path(source.as_std_path()).map_err(|err| ReprojectError::Open {
            path: source.to_owned(),
            source: err,
        })?;

    let create_error = |err| ReprojectError::Create {
        path: destination.to_owned(),
        source: err,
    };
    let table = prepare_layer(destination, &schema, crs).map_err(create_error)?;
    let mut writer = shapefile::Writer::from_path(destination.as_std_path(), table)
        .map_err(|err| create_error(CreateError::Open(err)))?;

    let mut features = 0;
    for (index, item) in reader.iter_shapes_and_records().enumerate() {
        let (shape, record) = item.map_err(|err| ReprojectError::ReadFeature {
            path: source.to_owned(),
            index,
            source: err,
        })?;
        let row = decode_record(&record, schema.fields())
            .and_then(|properties| encode_record(&properties, &schema))
            .map_err(|err| ReprojectError::Convert {
                path: source.to_owned(),
                index,
                source: err,
            })?;
        let written = match &shape {
            Shape::Point(point) => writer.write_shape_and_record(point, &row),
            Shape::Polyline(line) => writer.write_shape_and_record(line, &row),
            other => {
                return Err(ReprojectError::UnsupportedGeometry {
                    path: source.to_owned(),
                    index,
                    shape_type: shape_type_name(other),
                });
            }
        };
        written.map_err(|err| ReprojectError::WriteFeature {
            path: destination.to_owned(),
            index,
            source: err,
        })?;
        features += 1;
    }
    drop(writer);
    Ok(features)
}

/// Copy every `.shp` in `input_dir` into `output_dir` tagged with `crs`,
/// aborting on the first failure.
///
/// # Errors
/// See [`BatchReprojector::run`].
pub fn reproject_directory(
    input_dir: &Utf8Path,
    output_dir: &Utf8Path,
    crs: &Crs,
) -> Result<ReprojectReport, ReprojectError> {
    BatchReprojector::new(crs.clone()).run(input_dir, output_dir)
}
