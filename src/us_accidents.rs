//! Entry point tying the loader, summaries and hotspot pipeline together for the US
//! accident dataset.

use crate::dataset::loader::{AccidentLoader, DEFAULT_ROW_LIMIT};
use crate::dataset::sampling::{select_locations, PointSelection};
use crate::dataset::summary::{AccidentSummary, DEFAULT_TOP_WEATHER};
use crate::error::AccidentsError;
use crate::hotspots::analysis::{HotspotAnalyzer, HotspotReport};
use crate::projection::LambertConformalConic;
use crate::types::accident_record::AccidentRecord;
use bon::bon;
use log::info;
use std::path::Path;

/// Loaded accident records plus the analyses that run over them.
///
/// Hotspots are computed in the continental US Lambert conformal conic projection
/// ([`LambertConformalConic::continental_us`]).
///
/// # Examples
///
/// ```rust
/// # use accident_hotspots::{AccidentsError, PointSelection, UsAccidents};
/// # use std::path::Path;
/// # async fn run() -> Result<(), AccidentsError> {
/// let accidents = UsAccidents::load()
///     .path(Path::new("US_Accidents_March23.csv"))
///     .call()
///     .await?;
///
/// let summary = accidents.summary().call();
/// println!("{} records, {:?}", summary.total_records, summary.by_time_of_day);
///
/// let report = accidents
///     .hotspots()
///     .selection(PointSelection::All)
///     .top_k(5)
///     .call()?;
/// for hotspot in &report.hotspots {
///     println!("{:?}", hotspot);
/// }
/// # Ok(())
/// # }
/// ```
pub struct UsAccidents {
    records: Vec<AccidentRecord>,
    analyzer: HotspotAnalyzer<LambertConformalConic>,
}

#[bon]
impl UsAccidents {
    /// Reads the accident CSV at `path`.
    ///
    /// This method uses a builder pattern.
    ///
    /// # Arguments
    ///
    /// * `.path(&Path)`: **Required.** Location of the CSV file.
    /// * `.row_limit(usize)`: Optional. Maximum number of rows to read. Defaults to `500_000`.
    ///
    /// # Errors
    ///
    /// Returns [`AccidentsError::Dataset`] if the file cannot be read, a required column
    /// is missing, or a timestamp cannot be parsed.
    #[builder]
    pub async fn load(path: &Path, row_limit: Option<usize>) -> Result<Self, AccidentsError> {
        let row_limit = row_limit.unwrap_or(DEFAULT_ROW_LIMIT);
        let records = AccidentLoader::new(path).load(Some(row_limit)).await?;
        Ok(Self::from_records(records))
    }

    pub fn from_records(records: Vec<AccidentRecord>) -> Self {
        Self {
            records,
            analyzer: HotspotAnalyzer::new(LambertConformalConic::continental_us()),
        }
    }

    pub fn records(&self) -> &[AccidentRecord] {
        &self.records
    }

    /// Counts per time of day, year, hour, weekday, weather condition and road feature.
    ///
    /// * `.top_weather(usize)`: Optional. Number of weather conditions to keep. Defaults to `10`.
    #[builder]
    pub fn summary(&self, top_weather: Option<usize>) -> AccidentSummary {
        AccidentSummary::from_records(&self.records, top_weather.unwrap_or(DEFAULT_TOP_WEATHER))
    }

    /// Densest grid cells over the selected accident locations.
    ///
    /// This method uses a builder pattern.
    ///
    /// # Arguments
    ///
    /// * `.selection(PointSelection)`: Optional. Which locations to use. Defaults to a
    ///   reproducible sample of 10 000 (seed 42).
    /// * `.resolution(usize)`: Optional. Edges per grid axis. Defaults to `100`.
    /// * `.top_k(usize)`: Optional. Number of hotspots. Defaults to `10`.
    ///
    /// # Errors
    ///
    /// * [`AccidentsError::NoLocatedRecords`] if no record has a location.
    /// * [`AccidentsError::Hotspot`] for invalid parameters, or if all selected points
    ///   share a coordinate on one axis.
    #[builder]
    pub fn hotspots(
        &self,
        selection: Option<PointSelection>,
        resolution: Option<usize>,
        top_k: Option<usize>,
    ) -> Result<HotspotReport, AccidentsError> {
        let selection = selection.unwrap_or_default();
        let locations = select_locations(&self.records, selection);
        if locations.is_empty() {
            return Err(AccidentsError::NoLocatedRecords);
        }
        info!(
            "Analysing {} of {} records for hotspots ({:?})",
            locations.len(),
            self.records.len(),
            selection
        );

        let report = self
            .analyzer
            .analyze()
            .locations(&locations)
            .maybe_resolution(resolution)
            .maybe_top_k(top_k)
            .call()?;
        Ok(report)
    }
}
