mod dataset;
mod error;
mod hotspots;
mod projection;
mod types;
mod us_accidents;

pub use error::AccidentsError;
pub use us_accidents::UsAccidents;

pub use types::accident_record::{weekday_name, AccidentRecord, TimeFeatures};
pub use types::lat_lon::LatLon;
pub use types::time_of_day::TimeOfDay;

pub use projection::{InverseProjection, LambertConformalConic, Projection};

pub use hotspots::analysis::*;
pub use hotspots::binner::{bin_points, Cell, CellCounts, GridBinner};
#[cfg(feature = "parallel")]
pub use hotspots::binner::bin_points_parallel;
pub use hotspots::grid_spec::{Axis, GridSpec, Point};
pub use hotspots::ranker::{rank, CellStatistics, RankedCell};
pub use hotspots::recoverer::{cell_midpoint, recover};

pub use dataset::loader::{parse_timestamp, AccidentLoader, ACCIDENT_COLUMNS, DEFAULT_ROW_LIMIT};
pub use dataset::sampling::{select_locations, PointSelection};
pub use dataset::summary::{AccidentSummary, RoadFeatureCounts, DEFAULT_TOP_WEATHER};

pub use dataset::error::DatasetError;
pub use hotspots::error::HotspotError;
