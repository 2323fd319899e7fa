//! Schema and CRS inspection without loading features.

use std::io::{self, BufReader, Read};

use camino::Utf8Path;
use log::debug;
use netshape_core::{Crs, FieldSpec, FieldType, GeometryKind, Schema};
use shapefile::ShapeType;
use shapefile::dbase::{self, FieldType as DbaseFieldType};

use crate::error::MetadataError;
use crate::projection::{projection_path, read_projection};

/// Bytes of table header preceding the field descriptors.
const TABLE_HEADER_LEN: usize = 32;
/// Bytes per field descriptor.
const DESCRIPTOR_LEN: usize = 32;
/// Position of the decimal count within a descriptor.
const DECIMALS_OFFSET: usize = 17;
/// Digits needed for any binary `I` value, sign included.
const BINARY_INTEGER_WIDTH: u8 = 11;
/// Layout reported for binary `B`/`O`/`Y` columns, which carry no text width.
const BINARY_FLOAT_WIDTH: u8 = 24;
const BINARY_FLOAT_PRECISION: u8 = 15;

fn geometry_kind(path: &Utf8Path, shape_type: ShapeType) -> Result<GeometryKind, MetadataError> {
    match shape_type {
        ShapeType::Point => Ok(GeometryKind::Point),
        ShapeType::Polyline => Ok(GeometryKind::LineString),
        other => Err(MetadataError::UnsupportedGeometry {
            path: path.to_owned(),
            shape_type: format!("{other:?}"),
        }),
    }
}

/// Schema type of a stored column. `N` columns without decimals hold whole
/// numbers.
fn field_type(stored: DbaseFieldType, length: u8, decimals: u8) -> Option<FieldType> {
    match stored {
        DbaseFieldType::Character => Some(FieldType::Str { width: length }),
        DbaseFieldType::Numeric if decimals == 0 => Some(FieldType::Int { width: length }),
        DbaseFieldType::Numeric | DbaseFieldType::Float => Some(FieldType::Float {
            width: length,
            precision: Some(decimals),
        }),
        DbaseFieldType::Integer => Some(FieldType::Int {
            width: BINARY_INTEGER_WIDTH,
        }),
        DbaseFieldType::Double | DbaseFieldType::Currency => Some(FieldType::Float {
            width: BINARY_FLOAT_WIDTH,
            precision: Some(BINARY_FLOAT_PRECISION),
        }),
        DbaseFieldType::Logical => Some(FieldType::Bool),
        DbaseFieldType::Date => Some(FieldType::Date),
        DbaseFieldType::DateTime | DbaseFieldType::Memo => None,
    }
}

/// Decimal count of the first `count` field descriptors of `dbf`.
///
/// `dbase` parses this byte but keeps it private, so it is read from the
/// descriptor array directly.
fn read_decimal_counts(dbf: &Utf8Path, count: usize) -> io::Result<Vec<u8>> {
    let mut reader = BufReader::new(netshape_fs::open_file(dbf)?);
    let mut header = [0_u8; TABLE_HEADER_LEN];
    reader.read_exact(&mut header)?;
    let mut descriptor = [0_u8; DESCRIPTOR_LEN];
    (0..count)
        .map(|_| {
            reader.read_exact(&mut descriptor)?;
            Ok(descriptor[DECIMALS_OFFSET])
        })
        .collect()
}

/// Attribute fields declared in the `.dbf` beside `path`, in table order.
///
/// `N(w,0)` columns read as `int:w` and `N(w,p)` columns as `float:w.p`.
///
/// # Errors
/// Returns [`MetadataError::OpenTable`] when the table cannot be opened,
/// [`MetadataError::ReadDescriptors`] when its field descriptors are
/// truncated and [`MetadataError::UnsupportedField`] for memo or datetime
/// columns.
pub fn read_fields(path: &Utf8Path) -> Result<Vec<FieldSpec>, MetadataError> {
    let dbf = path.with_extension("dbf");
    let table = dbase::Reader::from_path(dbf.as_std_path()).map_err(|source| {
        MetadataError::OpenTable {
            path: dbf.clone(),
            source,
        }
    })?;
    let columns = table.fields();
    let decimals = read_decimal_counts(&dbf, columns.len()).map_err(|source| {
        MetadataError::ReadDescriptors {
            path: dbf.clone(),
            source,
        }
    })?;
    columns
        .iter()
        .zip(decimals)
        .map(|(info, decimals)| {
            field_type(info.field_type(), info.length(), decimals)
                .map(|field_type| FieldSpec::new(info.name(), field_type))
                .ok_or_else(|| MetadataError::UnsupportedField {
                    path: dbf.clone(),
                    field: info.name().to_owned(),
                    field_type: format!("{:?}", info.field_type()),
                })
        })
        .collect()
}

/// Geometry kind and attribute fields of the shapefile at `path`.
///
/// Opens the file read-only and leaves it untouched; repeated calls return
/// equal schemas.
///
/// # Errors
/// Returns [`MetadataError::Open`] when the file cannot be opened,
/// [`MetadataError::UnsupportedGeometry`] for shape types other than Point
/// and Polyline, and the [`read_fields`] errors for its attribute table.
///
/// # Examples
/// ```no_run
/// use camino::Utf8Path;
///
/// let schema = netshape_data::read_schema(Utf8Path::new("poles.shp"))?;
/// println!("{} layer with {} fields", schema.geometry(), schema.fields().len());
/// # Ok::<(), netshape_data::MetadataError>(())
/// ```
pub fn read_schema(path: &Utf8Path) -> Result<Schema, MetadataError> {
    let reader =
        shapefile::Reader::from_path(path.as_std_path()).map_err(|source| MetadataError::Open {
            path: path.to_owned(),
            source,
        })?;
    let geometry = geometry_kind(path, reader.header().shape_type)?;
    drop(reader);

    let fields = read_fields(path)?;
    debug!("read {} field(s) of {geometry} layer {path}", fields.len());
    Schema::new(geometry, fields).map_err(|source| MetadataError::InvalidSchema {
        path: path.with_extension("dbf"),
        source,
    })
}

/// CRS stored in the `.prj` beside `path`, or `None` when there is none.
///
/// # Errors
/// Returns [`MetadataError::Open`] when the shapefile cannot be opened and
/// [`MetadataError::ReadProjection`] when the `.prj` exists but cannot be
/// read.
pub fn read_crs(path: &Utf8Path) -> Result<Option<Crs>, MetadataError> {
    shapefile::Reader::from_path(path.as_std_path()).map_err(|source| {
        MetadataError::Open {
            path: path.to_owned(),
            source,
        }
    })?;
    read_projection(path).map_err(|source| MetadataError::ReadProjection {
        path: projection_path(path),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(DbaseFieldType::Character, 40, 0, Some(FieldType::Str { width: 40 }))]
    #[case(DbaseFieldType::Numeric, 10, 0, Some(FieldType::Int { width: 10 }))]
    #[case(
        DbaseFieldType::Numeric,
        19,
        11,
        Some(FieldType::Float { width: 19, precision: Some(11) })
    )]
    #[case(
        DbaseFieldType::Float,
        12,
        3,
        Some(FieldType::Float { width: 12, precision: Some(3) })
    )]
    #[case(DbaseFieldType::Integer, 4, 0, Some(FieldType::Int { width: 11 }))]
    #[case(
        DbaseFieldType::Double,
        8,
        0,
        Some(FieldType::Float { width: 24, precision: Some(15) })
    )]
    #[case(DbaseFieldType::Logical, 1, 0, Some(FieldType::Bool))]
    #[case(DbaseFieldType::Date, 8, 0, Some(FieldType::Date))]
    #[case(DbaseFieldType::Memo, 10, 0, None)]
    #[case(DbaseFieldType::DateTime, 8, 0, None)]
    fn maps_dbase_columns(
        #[case] stored: DbaseFieldType,
        #[case] length: u8,
        #[case] decimals: u8,
        #[case] expected: Option<FieldType>,
    ) {
        assert_eq!(field_type(stored, length, decimals), expected);
    }

    #[rstest]
    fn decimal_counts_come_from_the_descriptors() {
        let tmp = tempfile::TempDir::new().expect("tempdir");
        let dbf = camino::Utf8PathBuf::from_path_buf(tmp.path().join("poles.dbf"))
            .expect("utf8 path");
        let mut bytes = vec![0_u8; TABLE_HEADER_LEN];
        for decimals in [0_u8, 11, 3] {
            let mut descriptor = [0_u8; DESCRIPTOR_LEN];
            descriptor[DECIMALS_OFFSET] = decimals;
            bytes.extend_from_slice(&descriptor);
        }
        std::fs::write(&dbf, &bytes).expect("write table");

        assert_eq!(read_decimal_counts(&dbf, 3).expect("read"), vec![0, 11, 3]);
        assert!(read_decimal_counts(&dbf, 4).is_err());
    }

    #[rstest]
    fn only_points_and_polylines_are_supported() {
        let path = Utf8Path::new("layer.shp");
        assert_eq!(
            geometry_kind(path, ShapeType::Polyline).expect("polyline"),
            GeometryKind::LineString
        );
        assert!(matches!(
            geometry_kind(path, ShapeType::Polygon),
            Err(MetadataError::UnsupportedGeometry { .. })
        ));
    }

    #[rstest]
    fn missing_files_fail_to_open() {
        let err = read_schema(Utf8Path::new("/nonexistent/layer.shp")).expect_err("missing file");
        assert!(matches!(err, MetadataError::Open { .. }));
        let err = read_crs(Utf8Path::new("/nonexistent/layer.shp")).expect_err("missing file");
        assert!(matches!(err, MetadataError::Open { .. }));
    }
}
