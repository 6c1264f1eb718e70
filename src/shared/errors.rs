//! Error handling for the application

use thiserror::Error;

/// Market-data errors
#[derive(Error, Debug)]
pub enum MarketDataError {
    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Failed to parse terminal response: {0}")]
    ParseError(String),

    #[error("Terminal API error [{code}]: {message}")]
    ApiError { code: String, message: String },

    #[error("No data source configured")]
    NoSource,
}

/// Snapshot logging errors
#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("I/O error: {0}")]
    Io(String),

    #[error("CSV error: {0}")]
    Csv(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<std::io::Error> for SnapshotError {
    fn from(err: std::io::Error) -> Self {
        SnapshotError::Io(err.to_string())
    }
}

impl From<csv::Error> for SnapshotError {
    fn from(err: csv::Error) -> Self {
        SnapshotError::Csv(err.to_string())
    }
}

impl From<serde_json::Error> for SnapshotError {
    fn from(err: serde_json::Error) -> Self {
        SnapshotError::Serialization(err.to_string())
    }
}

/// General application error
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Market data error: {0}")]
    MarketDataError(String),

    #[error("Snapshot error: {0}")]
    SnapshotError(String),

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Unknown commodity: {0}")]
    UnknownCommodity(String),
}

impl From<MarketDataError> for AppError {
    fn from(err: MarketDataError) -> Self {
        AppError::MarketDataError(err.to_string())
    }
}

impl From<SnapshotError> for AppError {
    fn from(err: SnapshotError) -> Self {
        AppError::SnapshotError(err.to_string())
    }
}
