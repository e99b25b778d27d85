//! Planar points and the binning domain they are counted in.

use crate::hotspots::error::HotspotError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A planar coordinate pair, already projected (metres for the bundled projection).
///
/// # Examples
///
/// ```
/// use accident_hotspots::Point;
///
/// let p = Point::new(9.5, 0.5);
/// assert_eq!(p.x, 9.5);
/// assert_eq!(p.y, 0.5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// One of the two grid axes, used in error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::X => write!(f, "x"),
            Axis::Y => write!(f, "y"),
        }
    }
}

/// The binning domain: axis bounds and the number of evenly spaced edges per axis.
///
/// `resolution` edges produce `resolution - 1` bins per axis. A value `v` falls in
/// bin `i` when `edge[i] <= v < edge[i + 1]`; the last bin is closed on the right so
/// that a value equal to the axis maximum is counted rather than dropped.
///
/// # Examples
///
/// ```
/// use accident_hotspots::GridSpec;
///
/// let spec = GridSpec::new(0.0, 10.0, 0.0, 10.0, 11).unwrap();
/// assert_eq!(spec.bins_per_axis(), 10);
/// assert_eq!(spec.x_edge(3), 3.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawGridSpec")]
pub struct GridSpec {
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
    resolution: usize,
}

impl GridSpec {
    /// Creates a grid over `[x_min, x_max] × [y_min, y_max]` with `resolution` edges per axis.
    ///
    /// # Errors
    ///
    /// Returns [`HotspotError::InvalidResolution`] if `resolution < 2` (no bins), and
    /// [`HotspotError::DegenerateAxis`] if an axis has `min >= max`, a non-finite bound, or a
    /// width too large to represent.
    pub fn new(
        x_min: f64,
        x_max: f64,
        y_min: f64,
        y_max: f64,
        resolution: usize,
    ) -> Result<Self, HotspotError> {
        if resolution < 2 {
            return Err(HotspotError::InvalidResolution(resolution));
        }
        check_axis(Axis::X, x_min, x_max)?;
        check_axis(Axis::Y, y_min, y_max)?;
        Ok(Self {
            x_min,
            x_max,
            y_min,
            y_max,
            resolution,
        })
    }

    /// Builds the grid from the bounding box of `points`.
    ///
    /// The bounds are computed once over the full point set, so every point of that
    /// same set is guaranteed to be in range when binned afterwards.
    ///
    /// # Errors
    ///
    /// [`HotspotError::EmptyInput`] for an empty slice, plus everything [`GridSpec::new`] returns.
    /// A point set whose coordinates are all equal on one axis yields
    /// [`HotspotError::DegenerateAxis`].
    pub fn from_points(points: &[Point], resolution: usize) -> Result<Self, HotspotError> {
        let first = points.first().ok_or(HotspotError::EmptyInput)?;
        let (mut x_min, mut x_max) = (first.x, first.x);
        let (mut y_min, mut y_max) = (first.y, first.y);
        for p in &points[1..] {
            x_min = x_min.min(p.x);
            x_max = x_max.max(p.x);
            y_min = y_min.min(p.y);
            y_max = y_max.max(p.y);
        }
        Self::new(x_min, x_max, y_min, y_max, resolution)
    }

    pub fn x_min(&self) -> f64 {
        self.x_min
    }

    pub fn x_max(&self) -> f64 {
        self.x_max
    }

    pub fn y_min(&self) -> f64 {
        self.y_min
    }

    pub fn y_max(&self) -> f64 {
        self.y_max
    }

    /// Number of edges per axis.
    pub fn resolution(&self) -> usize {
        self.resolution
    }

    /// Number of bins per axis (`resolution - 1`).
    pub fn bins_per_axis(&self) -> usize {
        self.resolution - 1
    }

    /// Whether `point` lies inside the closed domain.
    /// NaN coordinates are never contained.
    pub fn contains(&self, point: Point) -> bool {
        (self.x_min..=self.x_max).contains(&point.x) && (self.y_min..=self.y_max).contains(&point.y)
    }

    /// The `i`-th x edge. The last edge is exactly `x_max`.
    pub fn x_edge(&self, i: usize) -> f64 {
        edge(self.x_min, self.x_max, self.resolution, i)
    }

    /// The `i`-th y edge. The last edge is exactly `y_max`.
    pub fn y_edge(&self, i: usize) -> f64 {
        edge(self.y_min, self.y_max, self.resolution, i)
    }

    pub(crate) fn x_bin(&self, x: f64) -> usize {
        bin_index(x, self.x_min, self.x_max, self.resolution)
    }

    pub(crate) fn y_bin(&self, y: f64) -> usize {
        bin_index(y, self.y_min, self.y_max, self.resolution)
    }
}

// Deserialized grids go through the same validation as `GridSpec::new`.
#[derive(Deserialize)]
struct RawGridSpec {
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
    resolution: usize,
}

impl TryFrom<RawGridSpec> for GridSpec {
    type Error = HotspotError;

    fn try_from(raw: RawGridSpec) -> Result<Self, Self::Error> {
        GridSpec::new(raw.x_min, raw.x_max, raw.y_min, raw.y_max, raw.resolution)
    }
}

// The width must be finite too, or every value collapses into bin 0.
fn check_axis(axis: Axis, min: f64, max: f64) -> Result<(), HotspotError> {
    if !min.is_finite() || !max.is_finite() || min >= max || !(max - min).is_finite() {
        return Err(HotspotError::DegenerateAxis { axis, min, max });
    }
    Ok(())
}

// Same arithmetic as a linspace: start + i * step, with the endpoint pinned.
fn edge(min: f64, max: f64, resolution: usize, i: usize) -> f64 {
    let last = resolution - 1;
    if i >= last {
        return max;
    }
    min + (max - min) * (i as f64) / (last as f64)
}

// Caller guarantees `min <= v <= max`.
fn bin_index(v: f64, min: f64, max: f64, resolution: usize) -> usize {
    let last_bin = resolution - 2;
    let scaled = ((v - min) / (max - min) * (resolution - 1) as f64).floor();
    if scaled <= 0.0 {
        0
    } else {
        (scaled as usize).min(last_bin)
    }
}
