use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the campaign report.
///
/// Every tier is fatal: the load policy is to treat all rows as input and
/// propagate the first structural failure instead of skipping rows.
#[derive(Error, Debug)]
pub enum ReportError {
    /// A source file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A CSV record could not be decoded.
    #[error("Malformed CSV in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A row had the wrong number of comma-separated fields.
    #[error("Expected {want} fields per row, found {got}")]
    FieldCount { want: usize, got: usize },

    /// An audience label did not split into state, hair color and age range.
    #[error("Audience label {0:?} does not split into three parts")]
    AudienceFormat(String),

    /// A numeric column could not be parsed as an integer.
    #[error("Invalid integer in {field} field: {value:?}")]
    IntField {
        field: &'static str,
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },

    /// A date column did not match `YYYY-MM-DD`.
    #[error("Invalid date {value:?}: {source}")]
    DateParse {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    /// The embedded actions payload was not a valid JSON array.
    #[error("Malformed actions payload: {0}")]
    ActionJson(#[from] serde_json::Error),

    /// An action object did not have exactly an `"action"` key plus one
    /// integer-valued source key.
    #[error("Malformed action object: {0}")]
    ActionShape(String),

    /// A stats row named a campaign id missing from the reference table.
    #[error("Stats row references unknown campaign {0}")]
    UnknownCampaign(String),

    /// The configured data directory does not exist.
    #[error("Data path not found: {0}")]
    DataPathNotFound(PathBuf),

    /// A ratio query had nothing to divide by.
    #[error("Cannot compute {metric}: denominator is zero")]
    ZeroDenominator { metric: &'static str },

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenience alias used throughout the report crates.
pub type Result<T> = std::result::Result<T, ReportError>;
