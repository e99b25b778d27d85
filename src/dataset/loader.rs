use crate::dataset::error::DatasetError;
use crate::types::accident_record::AccidentRecord;
use crate::types::lat_lon::LatLon;
use chrono::NaiveDateTime;
use log::{info, warn};
use polars::prelude::*;
use std::path::{Path, PathBuf};
use tokio::task;

/// Columns kept from the source CSV; everything else is skipped during the scan.
pub const ACCIDENT_COLUMNS: [&str; 10] = [
    "ID",
    "Start_Time",
    "End_Time",
    "Severity",
    "Weather_Condition",
    "Start_Lat",
    "Start_Lng",
    "Crossing",
    "Junction",
    "Traffic_Signal",
];

pub const DEFAULT_ROW_LIMIT: usize = 500_000;

const INFER_SCHEMA_ROWS: usize = 10_000;
const TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

pub struct AccidentLoader {
    path: PathBuf,
}

impl AccidentLoader {
    pub fn new(path: &Path) -> AccidentLoader {
        AccidentLoader {
            path: path.to_path_buf(),
        }
    }

    /// Reads up to `row_limit` rows (all rows for `None`) and converts them into records.
    /// Parsing runs on the blocking pool.
    pub async fn load(&self, row_limit: Option<usize>) -> Result<Vec<AccidentRecord>, DatasetError> {
        let path = self.path.clone();
        info!("Reading accident records from {:?} (row limit {:?})", path, row_limit);

        let records = task::spawn_blocking(move || {
            let frame = Self::read_frame(&path, row_limit)?;
            Self::frame_to_records(&frame)
        })
        .await??;

        info!("Loaded {} accident records", records.len());
        Ok(records)
    }

    fn read_frame(path: &Path, row_limit: Option<usize>) -> Result<DataFrame, DatasetError> {
        LazyCsvReader::new(path)
            .with_has_header(true)
            .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
            .with_n_rows(row_limit)
            .finish()
            .and_then(|frame| frame.select(Self::projection()).collect())
            .map_err(|e| DatasetError::CsvRead(path.to_path_buf(), e))
    }

    // Casts normalise whatever dtype the CSV inference picked.
    fn projection() -> Vec<Expr> {
        vec![
            col("ID").cast(DataType::String),
            col("Start_Time").cast(DataType::String),
            col("End_Time").cast(DataType::String),
            col("Severity").cast(DataType::Int64),
            col("Weather_Condition").cast(DataType::String),
            col("Start_Lat").cast(DataType::Float64),
            col("Start_Lng").cast(DataType::Float64),
            col("Crossing").cast(DataType::String),
            col("Junction").cast(DataType::String),
            col("Traffic_Signal").cast(DataType::String),
        ]
    }

    fn frame_to_records(frame: &DataFrame) -> Result<Vec<AccidentRecord>, DatasetError> {
        let ids = str_column(frame, "ID")?;
        let start_times = str_column(frame, "Start_Time")?;
        let end_times = str_column(frame, "End_Time")?;
        let severities = i64_column(frame, "Severity")?;
        let weather = str_column(frame, "Weather_Condition")?;
        let latitudes = f64_column(frame, "Start_Lat")?;
        let longitudes = f64_column(frame, "Start_Lng")?;
        let crossings = str_column(frame, "Crossing")?;
        let junctions = str_column(frame, "Junction")?;
        let signals = str_column(frame, "Traffic_Signal")?;

        let mut missing_location = 0usize;
        let records = (0..frame.height())
            .map(|row| {
                let location = match (latitudes[row], longitudes[row]) {
                    (Some(lat), Some(lon)) => Some(LatLon(lat, lon)),
                    _ => {
                        missing_location += 1;
                        None
                    }
                };
                Ok(AccidentRecord {
                    id: ids[row].unwrap_or_default().to_string(),
                    start_time: parse_timestamp_at("Start_Time", row, start_times[row])?,
                    end_time: parse_timestamp_at("End_Time", row, end_times[row])?,
                    severity: severities[row],
                    weather_condition: weather[row].map(str::to_string),
                    location,
                    crossing: parse_flag(crossings[row]),
                    junction: parse_flag(junctions[row]),
                    traffic_signal: parse_flag(signals[row]),
                })
            })
            .collect::<Result<Vec<_>, DatasetError>>()?;

        if missing_location > 0 {
            warn!("{} records have no start location", missing_location);
        }
        Ok(records)
    }
}

fn str_column<'a>(frame: &'a DataFrame, name: &str) -> Result<Vec<Option<&'a str>>, DatasetError> {
    let values = frame
        .column(name)
        .and_then(|c| c.str())
        .map_err(|e| column_type(name, "string", e))?;
    Ok(values.into_iter().collect())
}

fn i64_column(frame: &DataFrame, name: &str) -> Result<Vec<Option<i64>>, DatasetError> {
    let values = frame
        .column(name)
        .and_then(|c| c.i64())
        .map_err(|e| column_type(name, "integer", e))?;
    Ok(values.into_iter().collect())
}

fn f64_column(frame: &DataFrame, name: &str) -> Result<Vec<Option<f64>>, DatasetError> {
    let values = frame
        .column(name)
        .and_then(|c| c.f64())
        .map_err(|e| column_type(name, "float", e))?;
    Ok(values.into_iter().collect())
}

fn column_type(name: &str, expected: &'static str, source: PolarsError) -> DatasetError {
    DatasetError::ColumnType {
        column: name.to_string(),
        expected,
        source,
    }
}

/// Parses `YYYY-MM-DD HH:MM:SS` with optional fractional seconds and an optional `T`
/// separator.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
}

fn parse_timestamp_at(
    column: &'static str,
    row: usize,
    value: Option<&str>,
) -> Result<Option<NaiveDateTime>, DatasetError> {
    match value {
        None => Ok(None),
        Some(raw) => parse_timestamp(raw)
            .map(Some)
            .ok_or_else(|| DatasetError::TimestampParse {
                column,
                row,
                value: raw.to_string(),
            }),
    }
}

fn parse_flag(value: Option<&str>) -> bool {
    value.is_some_and(|v| v.trim().eq_ignore_ascii_case("true"))
}
