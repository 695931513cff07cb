use std::path::PathBuf;

use polars::error::PolarsError;
use thiserror::Error;

/// A record field outside its declared domain.
///
/// `message` is the text shown to the person filling in the form; `field` is the
/// record attribute that failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: &'static str,
}

/// Failures while turning a polars frame into typed feature columns.
#[derive(Debug, Error)]
pub enum FrameError {
    #[error("Data frame error: {0}")]
    Polars(#[from] PolarsError),
    #[error("Missing column: {0}")]
    MissingColumn(String),
    #[error("Column {column} contains {count} missing values")]
    MissingValues { column: String, count: usize },
    #[error("Column {column} has unsupported type {dtype}")]
    UnsupportedColumn { column: String, dtype: String },
}

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("Nothing to plot")]
    Empty,
    #[error("Chart I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Chart encoding error: {0}")]
    Image(#[from] image::ImageError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("Model not trained")]
    NotTrained,
    #[error("Model expects {expected} features, got {actual}")]
    FeatureCount { expected: usize, actual: usize },
    #[error("Got {features} feature rows but {targets} targets")]
    TargetCount { features: usize, targets: usize },
}

#[derive(Debug, Error)]
pub enum PredictionError {
    #[error("Could not read model {}: {source}", path.display())]
    ModelLoading {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Corrupt model artifact: {0}")]
    Artifact(#[from] serde_json::Error),
    #[error("Input frame error: {0}")]
    Frame(#[from] FrameError),
    #[error("Model unavailable: {0}")]
    Unavailable(String),
    #[error("Model prediction error: {0}")]
    Model(#[from] ModelError),
    #[error("Model returned {0} predictions for a single record")]
    OutputShape(usize),
    #[error("Model returned a non-finite score: {0}")]
    NonFinite(f64),
}

impl From<PolarsError> for PredictionError {
    fn from(err: PolarsError) -> Self {
        Self::Frame(FrameError::Polars(err))
    }
}

/// Either kind of failure a form submission can report.
#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Prediction(#[from] PredictionError),
}

#[derive(Debug, Error)]
pub enum TrainingError {
    #[error("Data loading error: {0}")]
    DataLoading(#[from] FrameError),
    #[error("Invalid data path pattern: {0}")]
    Pattern(#[from] glob::PatternError),
    #[error("No files found matching pattern: {0}")]
    NoFilesMatched(String),
    #[error("Dataset is empty")]
    EmptyDataset,
    #[error("Dataset has no feature columns")]
    NoFeatures,
    #[error("Split of {rows} rows leaves {train} training and {test} test rows")]
    SplitTooSmall {
        rows: usize,
        train: usize,
        test: usize,
    },
    #[error("Model training error: {0}")]
    Model(#[from] ModelError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Chart error: {0}")]
    Chart(#[from] ChartError),
}

impl From<PolarsError> for TrainingError {
    fn from(err: PolarsError) -> Self {
        Self::DataLoading(FrameError::Polars(err))
    }
}
