use crate::dataset::error::DatasetError;
use crate::hotspots::error::HotspotError;
use polars::error::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AccidentsError {
    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error(transparent)]
    Hotspot(#[from] HotspotError),

    #[error("No accident record has a usable location")]
    NoLocatedRecords,

    #[error("Failed to export report as JSON")]
    Json(#[from] serde_json::Error),

    #[error("Failed to build report DataFrame")]
    Polars(#[from] PolarsError),
}
