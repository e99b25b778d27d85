use crate::types::accident_record::AccidentRecord;
use crate::types::lat_lon::LatLon;
use log::warn;
use rand::rngs::StdRng;
use rand::seq::index;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// Which located records feed the hotspot analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointSelection {
    /// Every record that has a location.
    All,
    /// A reproducible random sample without replacement.
    Sample { size: usize, seed: u64 },
}

impl Default for PointSelection {
    /// 10 000 points drawn with seed 42.
    fn default() -> Self {
        PointSelection::Sample {
            size: 10_000,
            seed: 42,
        }
    }
}

/// Locations of `records` chosen according to `selection`.
///
/// Records without a location, or with a non-finite coordinate, are skipped first.
/// A sample keeps the source order of the chosen records; asking for more points
/// than exist returns all of them.
pub fn select_locations(records: &[AccidentRecord], selection: PointSelection) -> Vec<LatLon> {
    let located: Vec<LatLon> = records
        .iter()
        .filter_map(|r| r.location)
        .filter(|l| l.lat().is_finite() && l.lon().is_finite())
        .collect();

    match selection {
        PointSelection::All => located,
        PointSelection::Sample { size, seed } => {
            if size >= located.len() {
                if size > located.len() {
                    warn!(
                        "Requested a sample of {} points but only {} are located, using all",
                        size,
                        located.len()
                    );
                }
                return located;
            }
            let mut rng = StdRng::seed_from_u64(seed);
            let mut chosen = index::sample(&mut rng, located.len(), size).into_vec();
            chosen.sort_unstable();
            chosen.into_iter().map(|i| located[i]).collect()
        }
    }
}
