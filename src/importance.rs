//! Permutation feature importance over the preprocessed feature matrix.

use ndarray::Array2;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::debug;

use crate::error::ModelError;
use crate::models::Regressor;

#[derive(Debug, Clone, PartialEq)]
pub struct FeatureImportance {
    pub feature: String,
    pub importance: f64,
}

fn mean_squared_error(actuals: &[f64], predictions: &[f64]) -> f64 {
    actuals
        .iter()
        .zip(predictions)
        .map(|(a, p)| (a - p).powi(2))
        .sum::<f64>()
        / actuals.len().max(1) as f64
}

/// Increase in mean squared error when each column of `x` is shuffled, clamped
/// at zero and normalized to sum to one. One entry per column of `x`, named by
/// `feature_names`.
pub fn permutation_importance<M: Regressor>(
    model: &M,
    x: &Array2<f64>,
    targets: &[f64],
    feature_names: &[String],
    seed: u64,
) -> Result<Vec<FeatureImportance>, ModelError> {
    let baseline = mean_squared_error(targets, &model.predict(x.view())?);
    let mut rng = StdRng::seed_from_u64(seed);
    let mut raw = Vec::with_capacity(x.ncols());

    for column in 0..x.ncols() {
        let mut permuted = x.clone();
        let mut values = permuted.column(column).to_vec();
        values.shuffle(&mut rng);
        for (cell, value) in permuted.column_mut(column).iter_mut().zip(values) {
            *cell = value;
        }

        let loss = mean_squared_error(targets, &model.predict(permuted.view())?);
        raw.push((loss - baseline).max(0.0));
    }

    let total: f64 = raw.iter().sum();
    debug!(baseline, total, "Computed permutation importances");

    Ok(feature_names
        .iter()
        .zip(raw)
        .map(|(feature, score)| FeatureImportance {
            feature: feature.clone(),
            importance: if total > 0.0 { score / total } else { 0.0 },
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::ArrayView2;

    /// Predicts the first column times ten; ignores everything else.
    struct FirstColumn;

    impl Regressor for FirstColumn {
        fn fit(&mut self, _: ArrayView2<f64>, _: &[f64]) -> Result<(), ModelError> {
            Ok(())
        }

        fn predict(&self, features: ArrayView2<f64>) -> Result<Vec<f64>, ModelError> {
            Ok(features.column(0).iter().map(|x| x * 10.0).collect())
        }
    }

    fn names() -> Vec<String> {
        vec!["signal".to_string(), "noise".to_string()]
    }

    #[test]
    fn test_only_used_feature_matters() {
        let x = Array2::from_shape_fn((50, 2), |(r, c)| if c == 0 { r as f64 } else { (r % 7) as f64 });
        let y: Vec<f64> = (0..50).map(|r| r as f64 * 10.0).collect();

        let importances = permutation_importance(&FirstColumn, &x, &y, &names(), 42).unwrap();
        assert_eq!(importances.len(), 2);
        assert_eq!(importances[0].feature, "signal");
        assert_eq!(importances[0].importance, 1.0);
        assert_eq!(importances[1].importance, 0.0);
    }

    #[test]
    fn test_constant_features_give_all_zero() {
        let x = Array2::from_elem((10, 2), 3.0);
        let y = vec![30.0; 10];
        let importances = permutation_importance(&FirstColumn, &x, &y, &names(), 42).unwrap();
        assert!(importances.iter().all(|i| i.importance == 0.0));
    }

    #[test]
    fn test_same_seed_same_result() {
        let x = Array2::from_shape_fn((20, 2), |(r, c)| (r * (c + 1)) as f64);
        let y: Vec<f64> = (0..20).map(|r| (r * r) as f64).collect();
        let first = permutation_importance(&FirstColumn, &x, &y, &names(), 7).unwrap();
        let second = permutation_importance(&FirstColumn, &x, &y, &names(), 7).unwrap();
        assert_eq!(first, second);
    }
}
