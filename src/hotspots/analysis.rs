//! The hotspot pipeline end to end: project, bin, rank, recover.

use crate::hotspots::binner::{bin_points, CellCounts};
use crate::hotspots::error::HotspotError;
use crate::hotspots::grid_spec::{GridSpec, Point};
use crate::hotspots::ranker::{rank, CellStatistics};
use crate::hotspots::recoverer::recover;
use crate::projection::Projection;
use crate::types::lat_lon::LatLon;
use bon::bon;
use log::{debug, info};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

pub const DEFAULT_RESOLUTION: usize = 100;
pub const DEFAULT_TOP_K: usize = 10;

/// A ranked grid cell with its recovered geographic position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hotspot {
    pub x_bin: usize,
    pub y_bin: usize,
    pub count: u64,
    pub latitude: f64,
    pub longitude: f64,
}

/// Output of one hotspot analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotspotReport {
    /// Grid the points were binned into.
    pub grid: GridSpec,
    /// Distribution over all active cells.
    pub statistics: CellStatistics,
    /// Number of points binned.
    pub total_points: u64,
    /// Densest cells, densest first.
    pub hotspots: Vec<Hotspot>,
}

impl HotspotReport {
    /// Serializes the report as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Hotspot rows as a `DataFrame` with columns
    /// `x_bin, y_bin, count, latitude, longitude`.
    pub fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        let x_bins: Vec<u64> = self.hotspots.iter().map(|h| h.x_bin as u64).collect();
        let y_bins: Vec<u64> = self.hotspots.iter().map(|h| h.y_bin as u64).collect();
        let counts: Vec<u64> = self.hotspots.iter().map(|h| h.count).collect();
        let latitudes: Vec<f64> = self.hotspots.iter().map(|h| h.latitude).collect();
        let longitudes: Vec<f64> = self.hotspots.iter().map(|h| h.longitude).collect();
        df!(
            "x_bin" => x_bins,
            "y_bin" => y_bins,
            "count" => counts,
            "latitude" => latitudes,
            "longitude" => longitudes
        )
    }
}

/// Runs the hotspot pipeline for a fixed projection.
///
/// # Examples
///
/// ```rust
/// use accident_hotspots::{HotspotAnalyzer, LambertConformalConic, LatLon};
///
/// let analyzer = HotspotAnalyzer::new(LambertConformalConic::continental_us());
/// let locations = [
///     LatLon(29.76, -95.37),
///     LatLon(29.76, -95.37),
///     LatLon(40.71, -74.01),
///     LatLon(34.05, -118.24),
/// ];
///
/// let report = analyzer
///     .analyze()
///     .locations(&locations)
///     .top_k(2)
///     .call()
///     .unwrap();
///
/// assert_eq!(report.hotspots.len(), 2);
/// assert_eq!(report.hotspots[0].count, 2);
/// assert_eq!(report.total_points, 4);
/// ```
#[derive(Debug, Clone)]
pub struct HotspotAnalyzer<P> {
    projection: P,
}

#[bon]
impl<P: Projection> HotspotAnalyzer<P> {
    pub fn new(projection: P) -> Self {
        Self { projection }
    }

    pub fn projection(&self) -> &P {
        &self.projection
    }

    /// Projects `locations`, bins them into a grid spanning their bounding box, and
    /// returns the `top_k` densest cells with their positions recovered.
    ///
    /// This method uses a builder pattern.
    ///
    /// # Arguments
    ///
    /// * `.locations(&[LatLon])`: **Required.** Points to analyse.
    /// * `.resolution(usize)`: Optional. Edges per grid axis. Defaults to `100` (99 bins per axis).
    /// * `.top_k(usize)`: Optional. Number of hotspots to return. Defaults to `10`.
    ///
    /// # Errors
    ///
    /// * [`HotspotError::EmptyInput`] if `locations` is empty.
    /// * [`HotspotError::InvalidTopK`] if `top_k` is 0.
    /// * [`HotspotError::InvalidResolution`] / [`HotspotError::DegenerateAxis`] for
    ///   a resolution below 2 or points that share one coordinate on an axis.
    #[builder]
    pub fn analyze(
        &self,
        locations: &[LatLon],
        resolution: Option<usize>,
        top_k: Option<usize>,
    ) -> Result<HotspotReport, HotspotError> {
        let resolution = resolution.unwrap_or(DEFAULT_RESOLUTION);
        let top_k = top_k.unwrap_or(DEFAULT_TOP_K);
        if top_k == 0 {
            return Err(HotspotError::InvalidTopK(top_k));
        }

        let points: Vec<Point> = locations
            .iter()
            .map(|location| self.projection.forward(*location))
            .collect();
        let grid = GridSpec::from_points(&points, resolution)?;
        debug!("Binning {} points into {:?}", points.len(), grid);

        let counts = bin_points(&points, &grid)?;
        self.report(grid, &counts, top_k)
    }

    /// Ranks already-binned `counts` and recovers the top-k positions.
    pub fn report(
        &self,
        grid: GridSpec,
        counts: &CellCounts,
        top_k: usize,
    ) -> Result<HotspotReport, HotspotError> {
        let statistics = CellStatistics::from_counts(counts)?;
        let hotspots = rank(counts, top_k)?
            .into_iter()
            .map(|ranked| {
                let position = recover(ranked.cell, &grid, &self.projection)?;
                Ok(Hotspot {
                    x_bin: ranked.cell.x_bin,
                    y_bin: ranked.cell.y_bin,
                    count: ranked.count,
                    latitude: position.lat(),
                    longitude: position.lon(),
                })
            })
            .collect::<Result<Vec<_>, HotspotError>>()?;

        info!(
            "Found {} active cells (mean {:.2}, max {}), reporting top {}",
            statistics.active_cells,
            statistics.mean,
            statistics.max,
            hotspots.len()
        );

        Ok(HotspotReport {
            grid,
            statistics,
            total_points: counts.total(),
            hotspots,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hotspots::binner::Cell;
    use crate::projection::{InverseProjection, LambertConformalConic};

    // lon -> x, lat -> y
    #[derive(Debug, Clone, Copy)]
    struct Equirectangular;

    impl InverseProjection for Equirectangular {
        fn inverse(&self, point: Point) -> LatLon {
            LatLon(point.y, point.x)
        }
    }

    impl Projection for Equirectangular {
        fn forward(&self, location: LatLon) -> Point {
            Point::new(location.lon(), location.lat())
        }
    }

    fn latlon(coords: &[(f64, f64)]) -> Vec<LatLon> {
        coords.iter().map(|&(x, y)| LatLon(y, x)).collect()
    }

    #[test]
    fn test_end_to_end_example() {
        // Declared grid rather than the points' own bounding box, which would end at 9.9.
        let analyzer = HotspotAnalyzer::new(Equirectangular);
        let grid = GridSpec::new(0.0, 10.0, 0.0, 10.0, 11).unwrap();
        let points: Vec<Point> = [(0.0, 0.0), (0.0, 0.0), (9.9, 9.9), (5.0, 5.0)]
            .iter()
            .map(|&(x, y)| Point::new(x, y))
            .collect();
        let counts = bin_points(&points, &grid).unwrap();

        let report = analyzer.report(grid, &counts, 2).unwrap();
        let rows: Vec<(usize, usize, u64)> = report
            .hotspots
            .iter()
            .map(|h| (h.x_bin, h.y_bin, h.count))
            .collect();
        assert_eq!(rows, vec![(0, 0, 2), (5, 5, 1)]);
        assert_eq!(report.total_points, 4);
        assert_eq!(report.statistics.active_cells, 3);
        assert_eq!(report.hotspots[0].latitude, 0.5);
        assert_eq!(report.hotspots[0].longitude, 0.5);
        assert_eq!(report.hotspots[1].latitude, 5.5);
    }

    #[test]
    fn test_analyze_builds_grid_from_bounding_box() {
        let analyzer = HotspotAnalyzer::new(Equirectangular);
        let locations = latlon(&[(0.0, 0.0), (0.0, 0.0), (10.0, 10.0), (5.0, 5.0)]);

        let report = analyzer
            .analyze()
            .locations(&locations)
            .resolution(11)
            .top_k(5)
            .call()
            .unwrap();

        assert_eq!(report.grid, GridSpec::new(0.0, 10.0, 0.0, 10.0, 11).unwrap());
        assert_eq!(report.hotspots.len(), 3);
        assert_eq!(report.hotspots[0].count, 2);
        assert_eq!((report.hotspots[1].x_bin, report.hotspots[1].y_bin), (5, 5));
        assert_eq!((report.hotspots[2].x_bin, report.hotspots[2].y_bin), (9, 9));
        let total: u64 = report.hotspots.iter().map(|h| h.count).sum();
        assert_eq!(total, report.total_points);
    }

    #[test]
    fn test_analyze_defaults() {
        let analyzer = HotspotAnalyzer::new(Equirectangular);
        let locations: Vec<LatLon> = (0..200)
            .map(|i| LatLon((i % 20) as f64, (i / 20) as f64))
            .collect();
        let report = analyzer.analyze().locations(&locations).call().unwrap();
        assert_eq!(report.grid.resolution(), DEFAULT_RESOLUTION);
        assert_eq!(report.hotspots.len(), DEFAULT_TOP_K);
        assert_eq!(report.total_points, 200);
    }

    #[test]
    fn test_analyze_errors() {
        let analyzer = HotspotAnalyzer::new(Equirectangular);
        assert_eq!(
            analyzer.analyze().locations(&[]).call(),
            Err(HotspotError::EmptyInput)
        );

        let locations = latlon(&[(0.0, 0.0), (1.0, 1.0)]);
        assert_eq!(
            analyzer.analyze().locations(&locations).top_k(0).call(),
            Err(HotspotError::InvalidTopK(0))
        );

        let same = latlon(&[(2.0, 2.0), (2.0, 2.0)]);
        assert!(matches!(
            analyzer.analyze().locations(&same).call(),
            Err(HotspotError::DegenerateAxis { .. })
        ));
    }

    #[test]
    fn test_analyze_with_lambert_projection() {
        let analyzer = HotspotAnalyzer::new(LambertConformalConic::continental_us());
        let houston = LatLon(29.7604, -95.3698);
        let mut locations = vec![houston; 5];
        locations.extend([LatLon(40.7128, -74.0060), LatLon(47.6062, -122.3321)]);

        let report = analyzer
            .analyze()
            .locations(&locations)
            .top_k(1)
            .call()
            .unwrap();
        let top = report.hotspots[0];
        assert_eq!(top.count, 5);
        // Cells are a few tens of kilometres across at this extent.
        assert!((top.latitude - houston.lat()).abs() < 0.5, "{:?}", top);
        assert!((top.longitude - houston.lon()).abs() < 0.5, "{:?}", top);
    }

    #[test]
    fn test_report_exports() {
        let analyzer = HotspotAnalyzer::new(Equirectangular);
        let grid = GridSpec::new(0.0, 10.0, 0.0, 10.0, 11).unwrap();
        let counts: CellCounts = vec![(Cell::new(1, 2), 3), (Cell::new(4, 4), 1)]
            .into_iter()
            .collect();
        let report = analyzer.report(grid, &counts, 10).unwrap();

        let frame = report.to_dataframe().unwrap();
        assert_eq!(frame.shape(), (2, 5));
        let names: Vec<String> = frame
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect();
        assert_eq!(names, ["x_bin", "y_bin", "count", "latitude", "longitude"]);

        let json = report.to_json().unwrap();
        let parsed: HotspotReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.hotspots, report.hotspots);
        assert_eq!(parsed.grid, report.grid);
        assert_eq!(parsed.statistics.max, 3);
    }
}
