//! Error types for every stage of the pipeline.
//!
//! All of them are fatal for a run; `main` reports the error and exits
//! non-zero.

use std::path::PathBuf;
use thiserror::Error;

/// Failure to obtain a local copy of the dataset.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP request to {url} failed: {reason}")]
    Http { url: String, reason: String },

    #[error("HTTP request to {url} returned status {status}")]
    Status { url: String, status: u16 },

    #[error("checksum mismatch for {url}: expected {expected}, got {got}")]
    ChecksumMismatch { url: String, expected: String, got: String },

    #[error("could not extract archive: {0}")]
    Extract(String),

    #[error("archive extracted but {0} is missing")]
    MissingFile(PathBuf),

    #[error("I/O error while fetching dataset: {0}")]
    Io(#[from] std::io::Error),
}

/// What was wrong with a malformed record line.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseErrorKind {
    #[error("expected {expected} fields, got {got}")]
    FieldCount { expected: usize, got: usize },

    #[error("feature '{0}' is not a number")]
    NotANumber(String),

    #[error("label '{0}' is not a non-negative integer")]
    InvalidLabel(String),

    #[error("label {label} is outside [0, {num_classes})")]
    LabelOutOfRange { label: usize, num_classes: usize },
}

/// A malformed line aborts the whole load; `line` is 1-based.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("line {line}: {kind}")]
pub struct ParseError {
    pub line: usize,
    pub kind: ParseErrorKind,
}

/// Invalid settings or mismatched shapes between stages.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("train fraction must be in (0, 1), got {0}")]
    InvalidSplitFraction(f64),

    #[error("layer {index}: size must be non-zero")]
    ZeroLayerSize { index: usize },

    #[error("layer {index}: expects {expected} inputs but the previous layer produces {got}")]
    LayerWidthMismatch { index: usize, expected: usize, got: usize },

    #[error("the network must end with exactly one output layer")]
    MisplacedOutputLayer,

    #[error("feature count mismatch: expected {expected}, got {got}")]
    FeatureCountMismatch { expected: usize, got: usize },

    #[error("{features} feature rows but {labels} label rows")]
    RowCountMismatch { features: usize, labels: usize },

    #[error("cannot {0} an empty dataset")]
    EmptyDataset(&'static str),

    #[error("{name} must be {requirement}, got {value}")]
    InvalidHyperparameter {
        name: &'static str,
        requirement: &'static str,
        value: f64,
    },
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
