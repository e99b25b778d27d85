use crate::hotspots::binner::Cell;
use crate::hotspots::error::HotspotError;
use crate::hotspots::grid_spec::{GridSpec, Point};
use crate::projection::InverseProjection;
use crate::types::lat_lon::LatLon;

/// Planar midpoint of `cell`, computed from the same edges the binner uses.
///
/// # Errors
///
/// [`HotspotError::CellOutOfRange`] if either index is past the last bin.
pub fn cell_midpoint(cell: Cell, spec: &GridSpec) -> Result<Point, HotspotError> {
    let bins = spec.bins_per_axis();
    if cell.x_bin >= bins || cell.y_bin >= bins {
        return Err(HotspotError::CellOutOfRange {
            x_bin: cell.x_bin,
            y_bin: cell.y_bin,
            bins_per_axis: bins,
        });
    }
    let x_mid = (spec.x_edge(cell.x_bin) + spec.x_edge(cell.x_bin + 1)) / 2.0;
    let y_mid = (spec.y_edge(cell.y_bin) + spec.y_edge(cell.y_bin + 1)) / 2.0;
    Ok(Point::new(x_mid, y_mid))
}

/// Geographic position representing `cell`: its planar midpoint passed through
/// the inverse projection.
///
/// # Examples
///
/// ```
/// use accident_hotspots::{recover, Cell, GridSpec, LatLon, Point};
///
/// let spec = GridSpec::new(0.0, 10.0, 0.0, 10.0, 11).unwrap();
/// // Treat y as latitude and x as longitude.
/// let inverse = |p: Point| LatLon(p.y, p.x);
///
/// let position = recover(Cell::new(9, 0), &spec, &inverse).unwrap();
/// assert_eq!(position, LatLon(0.5, 9.5));
/// ```
pub fn recover<P>(cell: Cell, spec: &GridSpec, inverse: &P) -> Result<LatLon, HotspotError>
where
    P: InverseProjection + ?Sized,
{
    let midpoint = cell_midpoint(cell, spec)?;
    Ok(inverse.inverse(midpoint))
}
