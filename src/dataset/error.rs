use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DatasetError {
    // Covers missing files, malformed CSV and missing columns (reported by polars on collect)
    #[error("Failed to read accident CSV '{0}'")]
    CsvRead(PathBuf, #[source] PolarsError),

    #[error("Column '{column}' could not be read as {expected}")]
    ColumnType {
        column: String,
        expected: &'static str,
        #[source]
        source: PolarsError,
    },

    #[error("Unparseable timestamp '{value}' in column '{column}' at row {row}")]
    TimestampParse {
        column: &'static str,
        row: usize,
        value: String,
    },

    #[error("Background task failed to complete")]
    TaskJoin(#[from] tokio::task::JoinError),
}
