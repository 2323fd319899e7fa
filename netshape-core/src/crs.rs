//! Coordinate reference system descriptors.
//!
//! A [`Crs`] is opaque WKT text. It is never interpreted beyond locating the
//! top-level EPSG authority code; coordinates are never transformed.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

const WGS84_WKT: &str = concat!(
    r#"GEOGCS["WGS 84",DATUM["WGS_1984",SPHEROID["WGS 84",6378137,298.257223563,"#,
    r#"AUTHORITY["EPSG","7030"]],AUTHORITY["EPSG","6326"]],"#,
    r#"PRIMEM["Greenwich",0,AUTHORITY["EPSG","8901"]],"#,
    r#"UNIT["degree",0.0174532925199433,AUTHORITY["EPSG","9122"]],"#,
    r#"AUTHORITY["EPSG","4326"]]"#,
);

const EPSG_AUTHORITY: &str = r#"AUTHORITY["EPSG",""#;

/// Errors raised when constructing a [`Crs`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CrsError {
    /// The EPSG registry has no definition for the requested code.
    #[error("EPSG:{0} is not in the EPSG registry")]
    UnknownEpsg(u32),
}

/// Opaque coordinate reference system descriptor in WKT form.
///
/// Defaults to WGS84 geographic coordinates (EPSG:4326).
///
/// # Examples
/// ```
/// use netshape_core::Crs;
///
/// # fn main() -> Result<(), netshape_core::CrsError> {
/// let mercator = Crs::from_epsg(3857)?;
/// assert_eq!(mercator.epsg(), Some(3857));
/// assert_eq!(Crs::default().epsg(), Some(4326));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct Crs {
    wkt: String,
}

impl Crs {
    /// Wrap WKT text as found in a `.prj` file. Surrounding whitespace is
    /// dropped; the text is otherwise kept verbatim.
    #[must_use]
    pub fn from_wkt(wkt: impl AsRef<str>) -> Self {
        Self {
            wkt: wkt.as_ref().trim().to_owned(),
        }
    }

    /// Look up the WKT for an EPSG code in the bundled EPSG registry.
    ///
    /// # Errors
    /// Returns [`CrsError::UnknownEpsg`] when the registry has no entry for
    /// `code`.
    pub fn from_epsg(code: u32) -> Result<Self, CrsError> {
        u16::try_from(code)
            .ok()
            .and_then(crs_definitions::from_code)
            .map(|definition| Self::from_wkt(definition.wkt))
            .ok_or(CrsError::UnknownEpsg(code))
    }

    /// WGS84 geographic coordinates.
    #[must_use]
    pub fn wgs84() -> Self {
        Self::from_wkt(WGS84_WKT)
    }

    /// The WKT text.
    #[must_use]
    pub fn wkt(&self) -> &str {
        &self.wkt
    }

    /// EPSG code of the outermost `AUTHORITY` clause, if any.
    ///
    /// The outermost clause closes the WKT, so it is the last one in the text.
    #[must_use]
    pub fn epsg(&self) -> Option<u32> {
        let (_, tail) = self.wkt.rsplit_once(EPSG_AUTHORITY)?;
        let (code, _) = tail.split_once('"')?;
        code.parse().ok()
    }
}

impl Default for Crs {
    fn default() -> Self {
        Self::wgs84()
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.epsg() {
            Some(code) => write!(f, "EPSG:{code}"),
            None => f.write_str(&self.wkt),
        }
    }
}
