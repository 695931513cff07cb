use gbdt::decision_tree::{Data, DataVec};
use ndarray::ArrayView2;

use crate::error::ModelError;

/// A regression model trained on an already preprocessed feature matrix.
pub trait Regressor {
    fn fit(&mut self, features: ArrayView2<f64>, targets: &[f64]) -> Result<(), ModelError>;
    fn predict(&self, features: ArrayView2<f64>) -> Result<Vec<f64>, ModelError>;
}

pub trait IntoDataVec {
    /// Rows as GBDT training data labelled with `targets`.
    fn into_training_data(self, targets: &[f64]) -> DataVec;
    /// Rows as unlabelled GBDT test data.
    fn into_test_data(self) -> DataVec;
}

impl IntoDataVec for ArrayView2<'_, f64> {
    fn into_training_data(self, targets: &[f64]) -> DataVec {
        self.rows()
            .into_iter()
            .zip(targets)
            .map(|(row, &target)| {
                let feature = row.iter().map(|&x| x as f32).collect();
                Data::new_training_data(feature, 1.0, target as f32, None)
            })
            .collect()
    }

    fn into_test_data(self) -> DataVec {
        self.rows()
            .into_iter()
            .map(|row| Data::new_test_data(row.iter().map(|&x| x as f32).collect(), None))
            .collect()
    }
}
