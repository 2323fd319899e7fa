use std::{fmt, str::FromStr};

use geo::{Coord, Line, Point};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Properties, PropertyValue, SchemaError};

/// Geometry kind a feature, file or graph holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum GeometryKind {
    /// One coordinate per feature; features become nodes.
    Point,
    /// Two-coordinate segments; features become edges.
    LineString,
}

impl GeometryKind {
    /// Name used in schemas and diagnostics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Point => "Point",
            Self::LineString => "LineString",
        }
    }
}

impl fmt::Display for GeometryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GeometryKind {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Point" => Ok(Self::Point),
            "LineString" => Ok(Self::LineString),
            other => Err(SchemaError::UnknownGeometry(other.to_owned())),
        }
    }
}

/// Geometry of a single feature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FeatureGeometry {
    /// A single position.
    Point(Point<f64>),
    /// A simple two-point segment.
    LineString(Line<f64>),
}

impl FeatureGeometry {
    /// The geometry's kind.
    #[must_use]
    pub const fn kind(&self) -> GeometryKind {
        match self {
            Self::Point(_) => GeometryKind::Point,
            Self::LineString(_) => GeometryKind::LineString,
        }
    }

    /// Coordinates in order: one for a point, start and end for a segment.
    #[must_use]
    pub fn coordinates(&self) -> Vec<Coord<f64>> {
        match self {
            Self::Point(point) => vec![point.0],
            Self::LineString(line) => vec![line.start, line.end],
        }
    }
}

/// One geographic feature: geometry plus attributes.
///
/// Records are created by a reader, attached to the node or edge they
/// describe, and written back verbatim.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use netshape_core::{FeatureRecord, GeometryKind, Properties};
///
/// let record = FeatureRecord::segment(
///     Coord { x: 0.0, y: 0.0 },
///     Coord { x: 1.0, y: 1.0 },
///     Properties::new(),
/// );
/// assert_eq!(record.kind(), GeometryKind::LineString);
/// assert_eq!(record.coordinates().len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRecord {
    geometry: FeatureGeometry,
    properties: Properties,
}

impl FeatureRecord {
    /// Pair a geometry with its properties.
    #[must_use]
    pub const fn new(geometry: FeatureGeometry, properties: Properties) -> Self {
        Self {
            geometry,
            properties,
        }
    }

    /// Build a point feature.
    #[must_use]
    pub fn point(location: Coord<f64>, properties: Properties) -> Self {
        Self::new(FeatureGeometry::Point(Point::from(location)), properties)
    }

    /// Build a segment feature.
    #[must_use]
    pub fn segment(start: Coord<f64>, end: Coord<f64>, properties: Properties) -> Self {
        Self::new(FeatureGeometry::LineString(Line::new(start, end)), properties)
    }

    /// The feature's geometry.
    #[must_use]
    pub const fn geometry(&self) -> &FeatureGeometry {
        &self.geometry
    }

    /// The feature's geometry kind.
    #[must_use]
    pub const fn kind(&self) -> GeometryKind {
        self.geometry.kind()
    }

    /// Coordinates of the geometry in order.
    #[must_use]
    pub fn coordinates(&self) -> Vec<Coord<f64>> {
        self.geometry.coordinates()
    }

    /// All properties.
    #[must_use]
    pub const fn properties(&self) -> &Properties {
        &self.properties
    }

    /// Look up one property.
    #[must_use]
    pub fn property(&self, field: &str) -> Option<&PropertyValue> {
        self.properties.get(field)
    }
}
