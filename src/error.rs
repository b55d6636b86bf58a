//! Error types for the simulator.

use thiserror::Error;

/// Main error type for the simulator.
#[derive(Error, Debug)]
pub enum SimulationError {
    #[error("Data error: {0}")]
    DataError(String),

    #[error("CSV parsing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Date parsing error: {0}")]
    DateParseError(#[from] chrono::ParseError),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error(
        "Calendar mismatch for {symbol}: expected {expected_start} to {expected_end} \
         ({expected_days} days), got {actual_start} to {actual_end} ({actual_days} days)"
    )]
    CalendarMismatch {
        symbol: String,
        expected_start: chrono::NaiveDate,
        expected_end: chrono::NaiveDate,
        expected_days: usize,
        actual_start: chrono::NaiveDate,
        actual_end: chrono::NaiveDate,
        actual_days: usize,
    },

    #[error("No data loaded")]
    NoData,

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type alias for simulator operations.
pub type Result<T> = std::result::Result<T, SimulationError>;
