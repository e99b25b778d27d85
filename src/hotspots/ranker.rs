//! Ranking of active cells and the distribution statistics reported alongside them.

use crate::hotspots::binner::{Cell, CellCounts};
use crate::hotspots::error::HotspotError;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;

/// An active cell together with its point count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedCell {
    pub cell: Cell,
    pub count: u64,
}

/// Distribution of counts over *all* active cells, not only the top-k.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CellStatistics {
    /// Number of cells with at least one point.
    pub active_cells: usize,
    pub mean: f64,
    pub max: u64,
    /// Sample standard deviation (n - 1 denominator). Exactly `0.0` for a single cell.
    pub std_dev: f64,
}

impl CellStatistics {
    /// Computes mean, max and sample standard deviation over the active cells.
    ///
    /// # Errors
    ///
    /// [`HotspotError::EmptyInput`] if there are no active cells.
    ///
    /// # Examples
    ///
    /// ```
    /// use accident_hotspots::{Cell, CellCounts, CellStatistics};
    ///
    /// let counts: CellCounts = vec![(Cell::new(0, 0), 1), (Cell::new(0, 1), 2), (Cell::new(1, 0), 3)]
    ///     .into_iter()
    ///     .collect();
    /// let stats = CellStatistics::from_counts(&counts).unwrap();
    /// assert_eq!(stats.mean, 2.0);
    /// assert_eq!(stats.max, 3);
    /// ```
    pub fn from_counts(counts: &CellCounts) -> Result<Self, HotspotError> {
        let n = counts.len();
        if n == 0 {
            return Err(HotspotError::EmptyInput);
        }

        let total = counts.total();
        let max = counts.iter().map(|(_, c)| c).max().unwrap_or(0);
        let mean = total as f64 / n as f64;
        let std_dev = if n == 1 {
            0.0
        } else {
            let sum_sq: f64 = counts
                .iter()
                .map(|(_, c)| {
                    let d = c as f64 - mean;
                    d * d
                })
                .sum();
            (sum_sq / (n - 1) as f64).sqrt()
        };

        Ok(Self {
            active_cells: n,
            mean,
            max,
            std_dev,
        })
    }
}

/// Returns the `k` densest cells, ordered by count descending and then by
/// `(x_bin, y_bin)` ascending, so equal counts always come out in the same order.
///
/// If `k` exceeds the number of active cells, every active cell is returned.
///
/// # Errors
///
/// [`HotspotError::InvalidTopK`] if `k == 0`.
///
/// # Examples
///
/// ```
/// use accident_hotspots::{bin_points, rank, Cell, GridSpec, Point};
///
/// let spec = GridSpec::new(0.0, 10.0, 0.0, 10.0, 11).unwrap();
/// let points = [
///     Point::new(0.0, 0.0),
///     Point::new(0.0, 0.0),
///     Point::new(9.9, 9.9),
///     Point::new(5.0, 5.0),
/// ];
/// let counts = bin_points(&points, &spec).unwrap();
/// let top = rank(&counts, 2).unwrap();
///
/// assert_eq!(top[0].cell, Cell::new(0, 0));
/// assert_eq!(top[0].count, 2);
/// assert_eq!(top[1].cell, Cell::new(5, 5));
/// ```
pub fn rank(counts: &CellCounts, k: usize) -> Result<Vec<RankedCell>, HotspotError> {
    if k == 0 {
        return Err(HotspotError::InvalidTopK(k));
    }

    let mut ranked: Vec<RankedCell> = counts
        .iter()
        .filter(|(_, count)| *count > 0)
        .map(|(cell, count)| RankedCell { cell, count })
        .collect();

    // Keys are unique per cell, so the order is total.
    let key = |r: &RankedCell| (Reverse(r.count), r.cell);
    if k < ranked.len() {
        ranked.select_nth_unstable_by_key(k - 1, key);
        ranked.truncate(k);
    }
    ranked.sort_unstable_by_key(key);
    Ok(ranked)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(entries: &[((usize, usize), u64)]) -> CellCounts {
        entries
            .iter()
            .map(|&((x, y), c)| (Cell::new(x, y), c))
            .collect()
    }

    fn cells(ranked: &[RankedCell]) -> Vec<(usize, usize, u64)> {
        ranked
            .iter()
            .map(|r| (r.cell.x_bin, r.cell.y_bin, r.count))
            .collect()
    }

    #[test]
    fn test_rank_example_tie_break() {
        let c = counts(&[((0, 0), 2), ((9, 9), 1), ((5, 5), 1)]);
        let top = rank(&c, 2).unwrap();
        assert_eq!(cells(&top), vec![(0, 0, 2), (5, 5, 1)]);
    }

    #[test]
    fn test_rank_is_deterministic_under_ties() {
        let c = counts(&[
            ((3, 1), 4),
            ((1, 7), 4),
            ((1, 2), 4),
            ((8, 0), 9),
            ((0, 9), 1),
            ((2, 2), 4),
        ]);
        let expected = vec![
            (8, 0, 9),
            (1, 2, 4),
            (1, 7, 4),
            (2, 2, 4),
            (3, 1, 4),
            (0, 9, 1),
        ];
        for _ in 0..10 {
            // Rebuild so the hash map iteration order differs between runs.
            let rebuilt: CellCounts = c.iter().collect();
            assert_eq!(cells(&rank(&rebuilt, 6).unwrap()), expected);
        }
        assert_eq!(cells(&rank(&c, 3).unwrap()), expected[..3].to_vec());
    }

    #[test]
    fn test_top_k_bound() {
        let c = counts(&[((0, 0), 5), ((1, 0), 3), ((2, 0), 1)]);
        assert_eq!(rank(&c, 1).unwrap().len(), 1);
        assert_eq!(rank(&c, 3).unwrap().len(), 3);
        assert_eq!(rank(&c, 100).unwrap().len(), 3);
    }

    #[test]
    fn test_rank_zero_k_is_invalid() {
        let c = counts(&[((0, 0), 5)]);
        let err = rank(&c, 0).unwrap_err();
        assert_eq!(err, HotspotError::InvalidTopK(0));
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_rank_empty_counts() {
        assert!(rank(&CellCounts::default(), 5).unwrap().is_empty());
    }

    #[test]
    fn test_statistics_mean_of_one_two_three() {
        let c = counts(&[((0, 0), 1), ((0, 1), 2), ((1, 0), 3)]);
        let stats = CellStatistics::from_counts(&c).unwrap();
        assert_eq!(stats.active_cells, 3);
        assert_eq!(stats.mean, 2.0);
        assert_eq!(stats.max, 3);
        assert!((stats.std_dev - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_statistics_single_cell_has_zero_std_dev() {
        let c = counts(&[((4, 4), 17)]);
        let stats = CellStatistics::from_counts(&c).unwrap();
        assert_eq!(stats.std_dev, 0.0);
        assert_eq!(stats.mean, 17.0);
        assert_eq!(stats.max, 17);
    }

    #[test]
    fn test_statistics_cover_all_active_cells() {
        let c = counts(&[((0, 0), 10), ((1, 1), 2), ((2, 2), 2), ((3, 3), 2)]);
        let stats = CellStatistics::from_counts(&c).unwrap();
        assert_eq!(stats.active_cells, 4);
        assert_eq!(stats.mean, 4.0);
        // Sample variance: (36 + 4 + 4 + 4) / 3 = 16
        assert!((stats.std_dev - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_statistics_empty() {
        assert_eq!(
            CellStatistics::from_counts(&CellCounts::default()),
            Err(HotspotError::EmptyInput)
        );
    }
}
