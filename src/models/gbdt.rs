use super::traits::{IntoDataVec, Regressor};
use crate::config::ModelParams;
use crate::error::ModelError;
use gbdt::{config::Config as GBDTConfig, gradient_boost::GBDT};
use ndarray::ArrayView2;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Gradient-boosted regression trees with squared-error loss.
#[derive(Serialize, Deserialize)]
pub struct GBDTModel {
    params: ModelParams,
    n_features: usize,
    model: Option<GBDT>,
}

impl GBDTModel {
    pub fn new(params: ModelParams) -> Self {
        Self {
            params,
            n_features: 0,
            model: None,
        }
    }

    pub fn params(&self) -> &ModelParams {
        &self.params
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn is_trained(&self) -> bool {
        self.model.is_some()
    }

    fn config(&self, n_features: usize) -> GBDTConfig {
        let mut config = GBDTConfig::new();
        config.set_feature_size(n_features);
        config.set_max_depth(self.params.max_depth);
        config.set_iterations(self.params.n_estimators);
        config.set_shrinkage(self.params.learning_rate as f32);
        config.set_loss("SquaredError");
        config.set_debug(false);
        // Full data and feature sampling: every stage sees every row and
        // column, so the fit never draws from the library's RNG.
        config.set_data_sample_ratio(1.0);
        config.set_feature_sample_ratio(1.0);
        config.set_training_optimization_level(2);
        config
    }
}

impl Regressor for GBDTModel {
    fn fit(&mut self, features: ArrayView2<f64>, targets: &[f64]) -> Result<(), ModelError> {
        if features.nrows() != targets.len() {
            return Err(ModelError::TargetCount {
                features: features.nrows(),
                targets: targets.len(),
            });
        }

        let n_features = features.ncols();
        let mut train_data = features.into_training_data(targets);
        debug!(
            rows = train_data.len(),
            n_features,
            iterations = self.params.n_estimators,
            "Fitting GBDT"
        );

        let mut gbdt = GBDT::new(&self.config(n_features));
        gbdt.fit(&mut train_data);

        self.n_features = n_features;
        self.model = Some(gbdt);
        Ok(())
    }

    fn predict(&self, features: ArrayView2<f64>) -> Result<Vec<f64>, ModelError> {
        let model = self.model.as_ref().ok_or(ModelError::NotTrained)?;
        if features.ncols() != self.n_features {
            return Err(ModelError::FeatureCount {
                expected: self.n_features,
                actual: features.ncols(),
            });
        }

        let test_data = features.into_test_data();
        Ok(model
            .predict(&test_data)
            .into_iter()
            .map(f64::from)
            .collect())
    }
}

impl fmt::Debug for GBDTModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GBDTModel")
            .field("params", &self.params)
            .field("n_features", &self.n_features)
            .field("trained", &self.is_trained())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    fn small_params() -> ModelParams {
        ModelParams {
            n_estimators: 50,
            ..ModelParams::default()
        }
    }

    fn step_data() -> (Array2<f64>, Vec<f64>) {
        let x = Array2::from_shape_fn((40, 2), |(r, c)| if c == 0 { r as f64 } else { 1.0 });
        let y = (0..40).map(|r| if r < 20 { 10.0 } else { 50.0 }).collect();
        (x, y)
    }

    #[test]
    fn test_predict_before_fit_fails() {
        let model = GBDTModel::new(small_params());
        let x = Array2::<f64>::zeros((1, 2));
        assert_eq!(model.predict(x.view()), Err(ModelError::NotTrained));
    }

    #[test]
    fn test_fit_learns_a_step() {
        let (x, y) = step_data();
        let mut model = GBDTModel::new(small_params());
        model.fit(x.view(), &y).unwrap();

        let predictions = model.predict(x.view()).unwrap();
        assert_eq!(predictions.len(), 40);
        assert!((predictions[0] - 10.0).abs() < 1.0);
        assert!((predictions[39] - 50.0).abs() < 1.0);
    }

    #[test]
    fn test_feature_count_is_checked() {
        let (x, y) = step_data();
        let mut model = GBDTModel::new(small_params());
        model.fit(x.view(), &y).unwrap();

        let wrong = Array2::<f64>::zeros((1, 3));
        assert_eq!(
            model.predict(wrong.view()),
            Err(ModelError::FeatureCount {
                expected: 2,
                actual: 3
            })
        );
    }

    #[test]
    fn test_mismatched_targets_are_rejected() {
        let (x, _) = step_data();
        let mut model = GBDTModel::new(small_params());
        assert!(matches!(
            model.fit(x.view(), &[1.0, 2.0]),
            Err(ModelError::TargetCount { .. })
        ));
    }

    #[test]
    fn test_serde_round_trip_preserves_predictions() {
        let (x, y) = step_data();
        let mut model = GBDTModel::new(small_params());
        model.fit(x.view(), &y).unwrap();

        let json = serde_json::to_string(&model).unwrap();
        let restored: GBDTModel = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.params(), model.params());
        assert_eq!(
            restored.predict(x.view()).unwrap(),
            model.predict(x.view()).unwrap()
        );
    }
}
