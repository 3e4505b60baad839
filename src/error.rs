//! Error types for loading and scoring submissions.

use std::path::PathBuf;

use thiserror::Error;

/// Failures raised while computing a metric over one column.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MetricError {
    /// Mean squared log error is undefined for negative inputs.
    #[error("mean squared log error needs non-negative values, found {value}")]
    NegativeLogInput { value: f64 },

    #[error("no samples to score")]
    EmptyInput,

    #[error("truth has {truth} values but prediction has {predicted}")]
    LengthMismatch { truth: usize, predicted: usize },
}

/// Everything that can go wrong while evaluating a submission.
#[derive(Debug, Error)]
pub enum EvalError {
    /// The submission file name does not follow `<prefix>_<team>_<task>_<run>.csv`.
    #[error("malformed submission filename '{filename}': {reason}")]
    MalformedFilename { filename: String, reason: String },

    #[error("unsupported task '{0}' (expected 'motility' or 'morphology')")]
    UnsupportedTask(String),

    #[error("{path}: header has no column named '{column}'")]
    MissingColumn { path: PathBuf, column: String },

    #[error("{path}: row {row} has no value for column '{column}'")]
    MissingField {
        path: PathBuf,
        row: usize,
        column: String,
    },

    #[error("{path}: row {row}, column '{column}': '{value}' is not a number")]
    InvalidNumber {
        path: PathBuf,
        row: usize,
        column: String,
        value: String,
    },

    /// A ground-truth record has no counterpart in the submission.
    #[error("{path}: no prediction for identifier '{id}'")]
    MissingIdentifier { path: PathBuf, id: String },

    #[error(
        "truth has {truth_rows}x{truth_cols} samples but prediction has {predicted_rows}x{predicted_cols}"
    )]
    MisalignedSamples {
        truth_rows: usize,
        truth_cols: usize,
        predicted_rows: usize,
        predicted_cols: usize,
    },

    #[error("{0}: ground truth contains no records")]
    EmptyGroundTruth(PathBuf),

    #[error("metric for '{variable}' failed: {source}")]
    Metric {
        variable: String,
        #[source]
        source: MetricError,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl EvalError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn malformed_filename(filename: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedFilename {
            filename: filename.into(),
            reason: reason.into(),
        }
    }
}
