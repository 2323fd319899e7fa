//! `.prj` sidecar handling.

use camino::{Utf8Path, Utf8PathBuf};
use netshape_core::Crs;

/// Path of the projection sidecar that accompanies `shp`.
#[must_use]
pub fn projection_path(shp: &Utf8Path) -> Utf8PathBuf {
    shp.with_extension("prj")
}

/// Read the CRS stored beside `shp`; `None` when there is no `.prj`.
pub(crate) fn read_projection(shp: &Utf8Path) -> std::io::Result<Option<Crs>> {
    let contents = netshape_fs::read_optional_to_string(&projection_path(shp))?;
    Ok(contents.map(Crs::from_wkt))
}

/// Write `crs` as WKT beside `shp`, replacing any existing sidecar.
pub(crate) fn write_projection(shp: &Utf8Path, crs: &Crs) -> std::io::Result<()> {
    netshape_fs::write_file(&projection_path(shp), crs.wkt())
}
