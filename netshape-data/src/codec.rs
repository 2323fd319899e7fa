//! Conversions between `shapefile`/`dbase` values and the core feature model.

use camino::Utf8Path;
use geo::{Coord, Line, Point};
use netshape_core::{
    CalendarDate, Crs, FeatureGeometry, FieldSpec, FieldType, Properties, PropertyValue, Schema,
};
use shapefile::dbase::{self, FieldName, FieldValue, Record, TableWriterBuilder};
use shapefile::{Polyline, Shape};

use crate::error::{CreateError, ValueError};
use crate::projection;

/// Why a shape could not become a [`FeatureGeometry`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum GeometryError {
    Unsupported { shape_type: String },
    Malformed { parts: usize, points: usize },
}

pub(crate) fn shape_type_name(shape: &Shape) -> String {
    format!("{:?}", shape.shapetype())
}

/// Convert a point or single-segment polyline.
pub(crate) fn decode_geometry(shape: &Shape) -> Result<FeatureGeometry, GeometryError> {
    match shape {
        Shape::Point(point) => Ok(FeatureGeometry::Point(Point::new(point.x, point.y))),
        Shape::Polyline(line) => {
            let parts: &[Vec<shapefile::Point>] = line.parts();
            match parts {
                [part] => match part.as_slice() {
                    [start, end] => Ok(FeatureGeometry::LineString(Line::new(
                        Coord { x: start.x, y: start.y },
                        Coord { x: end.x, y: end.y },
                    ))),
                    points => Err(GeometryError::Malformed {
                        parts: 1,
                        points: points.len(),
                    }),
                },
                parts => Err(GeometryError::Malformed {
                    parts: parts.len(),
                    points: parts.iter().map(Vec::len).sum(),
                }),
            }
        }
        other => Err(GeometryError::Unsupported {
            shape_type: shape_type_name(other),
        }),
    }
}

pub(crate) fn encode_point(location: Coord<f64>) -> shapefile::Point {
    shapefile::Point::new(location.x, location.y)
}

pub(crate) fn encode_segment(line: Line<f64>) -> Polyline {
    Polyline::new(vec![encode_point(line.start), encode_point(line.end)])
}

/// Whole `N` values in an `int` column decode as integers.
fn decode_numeric(field_type: FieldType, number: Option<f64>) -> PropertyValue {
    match (field_type, number) {
        (FieldType::Int { .. }, Some(number))
            if number.fract() == 0.0 && number.abs() < 9_007_199_254_740_992.0 =>
        {
            PropertyValue::Integer(number as i64)
        }
        (_, number) => number.into(),
    }
}

/// Convert one stored dBASE value of a column declared as `field_type`.
pub(crate) fn decode_value(
    field: &str,
    field_type: FieldType,
    value: &FieldValue,
) -> Result<PropertyValue, ValueError> {
    let unsupported = |kind: &'static str| ValueError::UnsupportedValue {
        field: field.to_owned(),
        kind,
    };
    let decoded = match value {
        FieldValue::Character(text) => text.clone().into(),
        FieldValue::Numeric(number) => decode_numeric(field_type, *number),
        FieldValue::Float(number) => number.map(f64::from).into(),
        FieldValue::Double(number) | FieldValue::Currency(number) => PropertyValue::Number(*number),
        FieldValue::Integer(number) => PropertyValue::Integer(i64::from(*number)),
        FieldValue::Logical(flag) => (*flag).into(),
        FieldValue::Date(date) => date
            .as_ref()
            .map(|date| CalendarDate::new(date.year(), date.month(), date.day()))
            .into(),
        FieldValue::DateTime(_) => return Err(unsupported("datetime")),
        FieldValue::Memo(_) => return Err(unsupported("memo")),
    };
    Ok(decoded)
}

/// Read every declared field of `record`, in declaration order.
pub(crate) fn decode_record(record: &Record, fields: &[FieldSpec]) -> Result<Properties, ValueError> {
    fields
        .iter()
        .map(|spec| {
            let stored = record.get(&spec.name).ok_or_else(|| ValueError::MissingField {
                field: spec.name.clone(),
            })?;
            Ok((spec.name.clone(), decode_value(&spec.name, spec.field_type, stored)?))
        })
        .collect()
}

// dBASE numeric fields hold f64; integers beyond 2^53 lose precision.
fn integer_as_number(value: i64) -> f64 {
    value as f64
}

fn encode_value(field: &str, field_type: FieldType, value: &PropertyValue) -> Result<FieldValue, ValueError> {
    if !field_type.accepts(value) {
        return Err(ValueError::TypeMismatch {
            field: field.to_owned(),
            expected: field_type,
            found: value.kind_name(),
        });
    }
    let number = match value {
        PropertyValue::Integer(number) => Some(integer_as_number(*number)),
        PropertyValue::Number(number) => Some(*number),
        _ => None,
    };
    let encoded = match (field_type, value) {
        (FieldType::Str { .. }, PropertyValue::Text(text)) => FieldValue::Character(Some(text.clone())),
        (FieldType::Str { .. }, _) => FieldValue::Character(None),
        (FieldType::Int { .. } | FieldType::Float { .. }, _) => FieldValue::Numeric(number),
        (FieldType::Bool, PropertyValue::Bool(flag)) => FieldValue::Logical(Some(*flag)),
        (FieldType::Bool, _) => FieldValue::Logical(None),
        (FieldType::Date, PropertyValue::Date(date)) => {
            FieldValue::Date(Some(dbase::Date::new(date.day, date.month, date.year)))
        }
        (FieldType::Date, _) => FieldValue::Date(None),
    };
    Ok(encoded)
}

/// Build the attribute row for `properties` under `schema`.
///
/// Declared fields absent from `properties` are written as null.
pub(crate) fn encode_record(properties: &Properties, schema: &Schema) -> Result<Record, ValueError> {
    if let Some(stray) = properties.keys().find(|name| schema.field(name).is_none()) {
        return Err(ValueError::NotInSchema {
            field: stray.clone(),
        });
    }
    let mut record = Record::default();
    for spec in schema.fields() {
        let value = properties.get(&spec.name).unwrap_or(&PropertyValue::Null);
        record.insert(spec.name.clone(), encode_value(&spec.name, spec.field_type, value)?);
    }
    Ok(record)
}

fn field_name(name: &str) -> Result<FieldName, CreateError> {
    FieldName::try_from(name).map_err(|_| CreateError::FieldName {
        field: name.to_owned(),
    })
}

/// Table layout for `schema`.
pub(crate) fn table_builder(schema: &Schema) -> Result<TableWriterBuilder, CreateError> {
    schema
        .fields()
        .iter()
        .try_fold(TableWriterBuilder::new(), |builder, spec| -> Result<_, CreateError> {
            let name = field_name(&spec.name)?;
            Ok(match spec.field_type {
                FieldType::Str { width } => builder.add_character_field(name, width),
                FieldType::Int { width } => builder.add_numeric_field(name, width, 0),
                FieldType::Float {
                    width,
                    precision: Some(decimals),
                } => builder.add_numeric_field(name, width, decimals),
                FieldType::Float {
                    width,
                    precision: None,
                } => {
                    // Half the width goes to the fraction.
                    builder.add_numeric_field(name, width, (width / 2).min(width.saturating_sub(2)))
                }
                FieldType::Bool => builder.add_logical_field(name),
                FieldType::Date => builder.add_date_field(name),
            })
        })
}

/// Prepare a destination layer: create its parent directory, write the
/// `.prj` sidecar and return the table layout the shapefile writer needs.
pub(crate) fn prepare_layer(
    path: &Utf8Path,
    schema: &Schema,
    crs: &Crs,
) -> Result<TableWriterBuilder, CreateError> {
    let table = table_builder(schema)?;
    netshape_fs::ensure_parent_dir(path).map_err(CreateError::Directory)?;
    projection::write_projection(path, crs).map_err(CreateError::Projection)?;
    Ok(table)
}
