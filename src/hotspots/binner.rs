//! Sparse 2D binning of planar points.
//!
//! Only cells that receive at least one point are stored, so memory grows with the
//! number of active cells instead of with `resolution²`.

use crate::hotspots::error::HotspotError;
use crate::hotspots::grid_spec::{GridSpec, Point};
use serde::{Deserialize, Serialize};
use std::collections::hash_map;
use std::collections::HashMap;

/// Grid cell index. Ordering is `(x_bin, y_bin)` ascending, which is the tie-break
/// used when ranking cells with equal counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub x_bin: usize,
    pub y_bin: usize,
}

impl Cell {
    pub fn new(x_bin: usize, y_bin: usize) -> Self {
        Self { x_bin, y_bin }
    }
}

/// Point counts for the active cells of a grid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CellCounts {
    counts: HashMap<Cell, u64>,
}

impl CellCounts {
    /// Count for `cell`, zero for cells that never received a point.
    pub fn get(&self, cell: Cell) -> u64 {
        self.counts.get(&cell).copied().unwrap_or(0)
    }

    /// Number of active cells.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum over all cells; equals the number of points binned.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Iterates active cells in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (Cell, u64)> + '_ {
        self.counts.iter().map(|(cell, count)| (*cell, *count))
    }

    /// Adds `other`'s counts into `self`. Binning is a sum per cell, so partial
    /// results from disjoint point batches merge to the same result as one pass.
    pub fn merge(&mut self, other: CellCounts) {
        for (cell, count) in other.counts {
            *self.counts.entry(cell).or_insert(0) += count;
        }
    }

    fn increment(&mut self, cell: Cell) {
        match self.counts.entry(cell) {
            hash_map::Entry::Occupied(mut e) => *e.get_mut() += 1,
            hash_map::Entry::Vacant(e) => {
                e.insert(1);
            }
        }
    }
}

impl FromIterator<(Cell, u64)> for CellCounts {
    /// Collects `(cell, count)` pairs; zero counts are skipped and repeated cells summed.
    fn from_iter<I: IntoIterator<Item = (Cell, u64)>>(iter: I) -> Self {
        let mut counts = HashMap::new();
        for (cell, count) in iter {
            if count > 0 {
                *counts.entry(cell).or_insert(0) += count;
            }
        }
        Self { counts }
    }
}

/// Streaming accumulator that bins points one at a time.
///
/// # Examples
///
/// ```
/// use accident_hotspots::{Cell, GridBinner, GridSpec, Point};
///
/// let spec = GridSpec::new(0.0, 10.0, 0.0, 10.0, 11).unwrap();
/// let mut binner = GridBinner::new(spec);
/// binner.push(Point::new(9.5, 0.5)).unwrap();
/// binner.push(Point::new(10.0, 10.0)).unwrap();
///
/// let counts = binner.finish().unwrap();
/// assert_eq!(counts.get(Cell::new(9, 0)), 1);
/// assert_eq!(counts.get(Cell::new(9, 9)), 1);
/// ```
#[derive(Debug, Clone)]
pub struct GridBinner {
    spec: GridSpec,
    counts: CellCounts,
    points_seen: u64,
}

impl GridBinner {
    pub fn new(spec: GridSpec) -> Self {
        Self {
            spec,
            counts: CellCounts::default(),
            points_seen: 0,
        }
    }

    pub fn spec(&self) -> &GridSpec {
        &self.spec
    }

    /// Number of points accepted so far.
    pub fn points_seen(&self) -> u64 {
        self.points_seen
    }

    /// Cell that `point` falls into.
    ///
    /// # Errors
    ///
    /// [`HotspotError::OutOfRange`] if the point (or either coordinate, including NaN)
    /// is outside the grid bounds. Points are never clamped into the grid.
    pub fn cell_for(&self, point: Point) -> Result<Cell, HotspotError> {
        if !self.spec.contains(point) {
            return Err(HotspotError::OutOfRange {
                x: point.x,
                y: point.y,
                x_min: self.spec.x_min(),
                x_max: self.spec.x_max(),
                y_min: self.spec.y_min(),
                y_max: self.spec.y_max(),
            });
        }
        Ok(Cell::new(self.spec.x_bin(point.x), self.spec.y_bin(point.y)))
    }

    /// Counts one point. A rejected point leaves the accumulator unchanged.
    pub fn push(&mut self, point: Point) -> Result<Cell, HotspotError> {
        let cell = self.cell_for(point)?;
        self.counts.increment(cell);
        self.points_seen += 1;
        Ok(cell)
    }

    /// Counts every point of `points`, stopping at the first out-of-range one.
    pub fn extend<I: IntoIterator<Item = Point>>(&mut self, points: I) -> Result<(), HotspotError> {
        for point in points {
            self.push(point)?;
        }
        Ok(())
    }

    /// Returns the counts gathered so far, even if empty.
    pub fn into_counts(self) -> CellCounts {
        self.counts
    }

    /// Returns the counts.
    ///
    /// # Errors
    ///
    /// [`HotspotError::EmptyInput`] if no point was ever pushed.
    pub fn finish(self) -> Result<CellCounts, HotspotError> {
        if self.points_seen == 0 {
            return Err(HotspotError::EmptyInput);
        }
        Ok(self.counts)
    }
}

/// Bins `points` into the grid described by `spec`.
///
/// # Errors
///
/// * [`HotspotError::EmptyInput`] if `points` is empty.
/// * [`HotspotError::OutOfRange`] if any point lies outside `spec`.
pub fn bin_points(points: &[Point], spec: &GridSpec) -> Result<CellCounts, HotspotError> {
    let mut binner = GridBinner::new(*spec);
    binner.extend(points.iter().copied())?;
    binner.finish()
}

/// Same as [`bin_points`], but bins fixed-size chunks on the rayon pool and merges
/// the partial counts.
#[cfg(feature = "parallel")]
pub fn bin_points_parallel(points: &[Point], spec: &GridSpec) -> Result<CellCounts, HotspotError> {
    use rayon::prelude::*;

    const CHUNK_SIZE: usize = 16_384;

    if points.is_empty() {
        return Err(HotspotError::EmptyInput);
    }
    points
        .par_chunks(CHUNK_SIZE)
        .map(|chunk| {
            let mut binner = GridBinner::new(*spec);
            binner.extend(chunk.iter().copied())?;
            Ok(binner.into_counts())
        })
        .try_reduce(CellCounts::default, |mut acc, part| {
            acc.merge(part);
            Ok(acc)
        })
}
