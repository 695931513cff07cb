//! The boundary between a submitted form and the predictor: validation and
//! prediction failures become user-facing messages here.

use std::fmt;
use std::path::PathBuf;

use tracing::{info, warn};

use crate::chart;
use crate::error::{PredictionError, SubmissionError};
use crate::predictor::{format_score, Predictor};
use crate::record::StudentRecord;
use crate::validation::validate;

#[derive(Debug)]
pub enum Outcome {
    Success { score: f64 },
    Failure(SubmissionError),
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success { score } => {
                write!(f, "✅ El puntaje estimado del examen es: **{}**", format_score(*score))
            }
            Self::Failure(err) => write!(f, "❌ Error en la predicción: {}", err),
        }
    }
}

/// Result of one submission: the message and, after a successful prediction,
/// the activity chart that was written.
#[derive(Debug)]
pub struct Submission {
    pub outcome: Outcome,
    pub chart: Option<PathBuf>,
}

/// The prediction form's backend. A pipeline that failed to load is kept as
/// the error every submission reports.
pub struct PredictionForm {
    predictor: Result<Predictor, PredictionError>,
    chart_path: Option<PathBuf>,
}

impl PredictionForm {
    pub fn new(predictor: Result<Predictor, PredictionError>) -> Self {
        if let Err(err) = &predictor {
            warn!("Predictor unavailable: {}", err);
        }
        Self {
            predictor,
            chart_path: None,
        }
    }

    pub fn with_chart_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.chart_path = Some(path.into());
        self
    }

    pub fn submit(&self, record: &StudentRecord) -> Submission {
        let outcome = match self.score(record) {
            Ok(score) => Outcome::Success { score },
            Err(err) => Outcome::Failure(err),
        };
        info!(success = outcome.is_success(), "{}", outcome);

        let chart = match (&outcome, &self.chart_path) {
            (Outcome::Success { .. }, Some(path)) => {
                match chart::render_activity_hours(path, &record.activity_hours()) {
                    Ok(()) => Some(path.clone()),
                    Err(err) => {
                        warn!("Could not render activity chart: {}", err);
                        None
                    }
                }
            }
            _ => None,
        };

        Submission { outcome, chart }
    }

    fn score(&self, record: &StudentRecord) -> Result<f64, SubmissionError> {
        validate(record)?;
        let predictor = match &self.predictor {
            Ok(predictor) => predictor,
            Err(err) => {
                return Err(PredictionError::Unavailable(err.to_string()).into());
            }
        };
        Ok(predictor.predict(record)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trainer::tests::test_config;
    use crate::trainer::train;

    fn trained_form(dir: &std::path::Path) -> PredictionForm {
        let config = test_config(dir);
        train(&config).unwrap();
        PredictionForm::new(Predictor::load(&config.output.model_path))
            .with_chart_path(&config.output.activity_chart_path)
    }

    #[test]
    fn test_success_message_and_chart() {
        let dir = tempfile::tempdir().unwrap();
        let form = trained_form(dir.path());

        let submission = form.submit(&StudentRecord::default());
        let score = match &submission.outcome {
            Outcome::Success { score } => *score,
            Outcome::Failure(err) => panic!("unexpected failure: {err}"),
        };
        assert_eq!(
            submission.outcome.to_string(),
            format!("✅ El puntaje estimado del examen es: **{}**", format_score(score))
        );
        assert_eq!(submission.chart, Some(dir.path().join("activity_hours.png")));
        assert!(dir.path().join("activity_hours.png").exists());
    }

    #[test]
    fn test_whole_score_prints_with_a_decimal() {
        let outcome = Outcome::Success { score: 72.0 };
        assert_eq!(
            outcome.to_string(),
            "✅ El puntaje estimado del examen es: **72.0**"
        );
        let outcome = Outcome::Success { score: 68.25 };
        assert_eq!(
            outcome.to_string(),
            "✅ El puntaje estimado del examen es: **68.25**"
        );
    }

    #[test]
    fn test_invalid_record_never_reaches_predictor() {
        let dir = tempfile::tempdir().unwrap();
        let form = trained_form(dir.path());

        let record = StudentRecord {
            age: 5,
            ..StudentRecord::default()
        };
        let submission = form.submit(&record);
        assert!(matches!(
            submission.outcome,
            Outcome::Failure(SubmissionError::Validation(ref err)) if err.field == "age"
        ));
        assert_eq!(
            submission.outcome.to_string(),
            "❌ Error en la predicción: Edad fuera de rango (10-100 años)."
        );
        assert_eq!(submission.chart, None);
        assert!(!dir.path().join("activity_hours.png").exists());
    }

    #[test]
    fn test_validation_runs_before_missing_model_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let form = PredictionForm::new(Predictor::load(dir.path().join("absent.json")));

        let invalid = StudentRecord {
            gender: "Unknown".to_string(),
            ..StudentRecord::default()
        };
        assert!(matches!(
            form.submit(&invalid).outcome,
            Outcome::Failure(SubmissionError::Validation(ref err)) if err.field == "gender"
        ));

        let submission = form.submit(&StudentRecord::default());
        assert!(matches!(
            submission.outcome,
            Outcome::Failure(SubmissionError::Prediction(PredictionError::Unavailable(_)))
        ));
        assert!(submission.outcome.to_string().contains("absent.json"));
    }
}
