use std::path::Path;

use tracing::{debug, instrument};

use crate::error::PredictionError;
use crate::pipeline::TrainedPipeline;
use crate::record::StudentRecord;

/// Serves scores from a pipeline loaded once at startup.
#[derive(Debug)]
pub struct Predictor {
    pipeline: TrainedPipeline,
}

impl Predictor {
    pub fn new(pipeline: TrainedPipeline) -> Self {
        Self { pipeline }
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, PredictionError> {
        TrainedPipeline::load(path).map(Self::new)
    }

    /// Predicted exam score for an already validated record, rounded to two
    /// decimals. The value is not clamped to any score range.
    #[instrument(skip_all)]
    pub fn predict(&self, record: &StudentRecord) -> Result<f64, PredictionError> {
        let frame = record.to_frame()?;
        let predictions = self.pipeline.predict_frame(&frame)?;

        let score = match predictions.as_slice() {
            [score] => *score,
            other => return Err(PredictionError::OutputShape(other.len())),
        };
        if !score.is_finite() {
            return Err(PredictionError::NonFinite(score));
        }
        debug!(score, "Raw prediction");

        Ok(round_to_cents(score))
    }
}

/// Rounds half to even at two decimals, so `72.125` becomes `72.12`.
pub fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

/// Formats a score with at least one decimal: `72.0`, `72.5`, `72.12`.
pub fn format_score(score: f64) -> String {
    if score.fract() == 0.0 {
        format!("{score:.1}")
    } else {
        score.to_string()
    }
}
