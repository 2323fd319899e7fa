//! Layer schemas in fiona-style type notation.

use std::{fmt, str::FromStr};

use thiserror::Error;

use crate::{GeometryKind, PropertyValue};

/// Default width of a `str` field without an explicit width.
const DEFAULT_STR_WIDTH: u8 = 80;
/// Default width of an `int` field without an explicit width.
const DEFAULT_INT_WIDTH: u8 = 10;
/// Default width of a `float` field without an explicit width.
const DEFAULT_FLOAT_WIDTH: u8 = 24;
/// Default precision of a `float` field without an explicit width.
const DEFAULT_FLOAT_PRECISION: u8 = 15;

/// Errors raised while building or parsing a [`Schema`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// The geometry name is not `Point` or `LineString`.
    #[error("unsupported geometry type {0:?}")]
    UnknownGeometry(String),
    /// The field type spec could not be parsed.
    #[error("invalid field type {0:?}")]
    InvalidFieldType(String),
    /// A field name appeared twice.
    #[error("field {0:?} is declared more than once")]
    DuplicateField(String),
}

/// Attribute field type.
///
/// Displayed and parsed as `str:N`, `int:N`, `float:N`, `float:N.P`, `bool`
/// and `date`.
///
/// # Examples
/// ```
/// use netshape_core::FieldType;
///
/// let parsed: FieldType = "float:16".parse().unwrap();
/// assert_eq!(parsed, FieldType::Float { width: 16, precision: None });
/// assert_eq!(parsed.to_string(), "float:16");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    /// Character data of at most `width` bytes.
    Str {
        /// Maximum length in bytes.
        width: u8,
    },
    /// Whole number with `width` digits.
    Int {
        /// Total digits.
        width: u8,
    },
    /// Decimal number.
    Float {
        /// Total characters.
        width: u8,
        /// Digits after the decimal point; writer default when absent.
        precision: Option<u8>,
    },
    /// Logical value.
    Bool,
    /// Calendar date.
    Date,
}

impl FieldType {
    /// Whether `value` can be stored in a field of this type.
    ///
    /// `Null` fits every type. `int` fields accept integral numbers only.
    #[must_use]
    pub fn accepts(&self, value: &PropertyValue) -> bool {
        match (self, value) {
            (_, PropertyValue::Null)
            | (Self::Str { .. }, PropertyValue::Text(_))
            | (Self::Int { .. } | Self::Float { .. }, PropertyValue::Integer(_))
            | (Self::Float { .. }, PropertyValue::Number(_))
            | (Self::Bool, PropertyValue::Bool(_))
            | (Self::Date, PropertyValue::Date(_)) => true,
            (Self::Int { .. }, PropertyValue::Number(number)) => number.fract() == 0.0,
            _ => false,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str { width } => write!(f, "str:{width}"),
            Self::Int { width } => write!(f, "int:{width}"),
            Self::Float {
                width,
                precision: None,
            } => write!(f, "float:{width}"),
            Self::Float {
                width,
                precision: Some(precision),
            } => write!(f, "float:{width}.{precision}"),
            Self::Bool => f.write_str("bool"),
            Self::Date => f.write_str("date"),
        }
    }
}

impl FromStr for FieldType {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || SchemaError::InvalidFieldType(s.to_owned());
        let (name, size) = match s.split_once(':') {
            Some((name, size)) => (name, Some(size)),
            None => (s, None),
        };
        let parse_width = |text: &str| text.parse::<u8>().map_err(|_| invalid());
        match (name, size) {
            ("str", None) => Ok(Self::Str {
                width: DEFAULT_STR_WIDTH,
            }),
            ("str", Some(size)) => Ok(Self::Str {
                width: parse_width(size)?,
            }),
            ("int", None) => Ok(Self::Int {
                width: DEFAULT_INT_WIDTH,
            }),
            ("int", Some(size)) => Ok(Self::Int {
                width: parse_width(size)?,
            }),
            ("float", None) => Ok(Self::Float {
                width: DEFAULT_FLOAT_WIDTH,
                precision: Some(DEFAULT_FLOAT_PRECISION),
            }),
            ("float", Some(size)) => match size.split_once('.') {
                Some((width, precision)) => Ok(Self::Float {
                    width: parse_width(width)?,
                    precision: Some(parse_width(precision)?),
                }),
                None => Ok(Self::Float {
                    width: parse_width(size)?,
                    precision: None,
                }),
            },
            ("bool", None) => Ok(Self::Bool),
            ("date", None) => Ok(Self::Date),
            _ => Err(invalid()),
        }
    }
}

/// A named attribute field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    /// Field name.
    pub name: String,
    /// Field type.
    pub field_type: FieldType,
}

impl FieldSpec {
    /// Declare a field.
    #[must_use]
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
        }
    }
}

/// Geometry kind and ordered attribute fields of a layer.
///
/// With the `serde` feature the schema (de)serializes as
/// `{"geometry": "Point", "properties": {"id": "float:16"}}`, keeping field
/// order.
///
/// # Examples
/// ```
/// use netshape_core::{FieldType, GeometryKind, Schema};
///
/// let schema = Schema::default_for(GeometryKind::Point);
/// let id = schema.field("id").expect("default schema declares id");
/// assert_eq!(id.field_type, FieldType::Float { width: 16, precision: None });
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    geometry: GeometryKind,
    fields: Vec<FieldSpec>,
}

impl Schema {
    /// Validate and construct a schema.
    ///
    /// # Errors
    /// Returns [`SchemaError::DuplicateField`] when a field name repeats.
    pub fn new(geometry: GeometryKind, fields: Vec<FieldSpec>) -> Result<Self, SchemaError> {
        for (position, field) in fields.iter().enumerate() {
            if fields
                .iter()
                .skip(position + 1)
                .any(|other| other.name == field.name)
            {
                return Err(SchemaError::DuplicateField(field.name.clone()));
            }
        }
        Ok(Self { geometry, fields })
    }

    /// Schema synthesized when a writer is given none: a single numeric `id`.
    #[must_use]
    pub fn default_for(geometry: GeometryKind) -> Self {
        Self {
            geometry,
            fields: vec![FieldSpec::new(
                "id",
                FieldType::Float {
                    width: 16,
                    precision: None,
                },
            )],
        }
    }

    /// Declared geometry kind.
    #[must_use]
    pub const fn geometry(&self) -> GeometryKind {
        self.geometry
    }

    /// Fields in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Look up a field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|field| field.name == name)
    }
}

#[cfg(feature = "serde")]
mod serde_impl {
    use std::fmt;

    use serde::{
        Deserialize, Deserializer, Serialize, Serializer,
        de::{self, MapAccess, Visitor},
        ser::SerializeMap,
    };

    use super::{FieldSpec, FieldType, Schema};
    use crate::GeometryKind;

    #[derive(Serialize, Deserialize)]
    struct SchemaDocument {
        geometry: GeometryKind,
        properties: FieldMap,
    }

    struct FieldMap(Vec<FieldSpec>);

    impl Serialize for FieldMap {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            let mut map = serializer.serialize_map(Some(self.0.len()))?;
            for field in &self.0 {
                map.serialize_entry(&field.name, &field.field_type.to_string())?;
            }
            map.end()
        }
    }

    impl<'de> Deserialize<'de> for FieldMap {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            deserializer.deserialize_map(FieldMapVisitor)
        }
    }

    struct FieldMapVisitor;

    impl<'de> Visitor<'de> for FieldMapVisitor {
        type Value = FieldMap;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            formatter.write_str("a map of field names to type specs")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
            let mut fields = Vec::new();
            while let Some((name, spec)) = access.next_entry::<String, String>()? {
                let field_type = spec.parse::<FieldType>().map_err(de::Error::custom)?;
                fields.push(FieldSpec { name, field_type });
            }
            Ok(FieldMap(fields))
        }
    }

    impl Serialize for Schema {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            SchemaDocument {
                geometry: self.geometry,
                properties: FieldMap(self.fields.clone()),
            }
            .serialize(serializer)
        }
    }

    impl<'de> Deserialize<'de> for Schema {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            let document = SchemaDocument::deserialize(deserializer)?;
            Self::new(document.geometry, document.properties.0).map_err(de::Error::custom)
        }
    }
}
