//! Error types shared by the domain, data and ML layers.
//!
//! The application and CLI layers wrap these in `anyhow` with file-path
//! context; everything below them returns [`Result`].

use thiserror::Error;

/// Result alias for the lower layers.
pub type Result<T> = std::result::Result<T, PipelineError>;

#[derive(Error, Debug)]
pub enum PipelineError {
    /// A survey column the trainer needs is absent from the sheet.
    #[error("missing required column '{column}' (expected header \"{header}\")")]
    MissingColumn { column: &'static str, header: &'static str },

    /// A labelled row has no usable target value.
    #[error("row {row}: missing or non-numeric target in column '{column}'")]
    MissingTarget { row: usize, column: &'static str },

    /// A feature value failed validation when building a record.
    #[error("invalid value for '{field}': {reason}")]
    InvalidFeature { field: &'static str, reason: String },

    /// A column had no observed values, so no statistic could be fitted.
    #[error("column '{0}' has no observed values to fit on")]
    EmptyColumn(&'static str),

    /// A stored artifact was produced for a different feature schema.
    #[error("model artifact schema mismatch: expected {expected}, found {found}\nRetrain the model with this version of the trainer.")]
    SchemaMismatch { expected: String, found: String },

    /// The survey spreadsheet could not be opened or read.
    #[error("spreadsheet error: {0}")]
    Spreadsheet(String),

    #[error("not enough data: {0}")]
    InsufficientData(String),

    #[error("invalid parameter grid: {0}")]
    InvalidGrid(String),

    /// A candidate fit failed; the whole search is aborted.
    #[error("fit failed for [{params}]: {reason}")]
    CandidateFailed { params: String, reason: String },

    #[error("tensor error: {0}")]
    Tensor(String),
}
