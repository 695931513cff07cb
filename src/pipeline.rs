//! The fitted preprocessing stage and regressor, persisted as one JSON document.

use std::fs;
use std::path::Path;

use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::ModelParams;
use crate::data_loader::FeatureTable;
use crate::error::{ModelError, PredictionError, TrainingError};
use crate::feature_engineering::Preprocessor;
use crate::models::{GBDTModel, Regressor};

#[derive(Debug, Serialize, Deserialize)]
pub struct TrainedPipeline {
    pub preprocessor: Preprocessor,
    pub model: GBDTModel,
}

impl TrainedPipeline {
    /// Fits the preprocessor on `features` and the model on the transformed rows.
    pub fn fit(
        features: &FeatureTable,
        targets: &[f64],
        params: ModelParams,
    ) -> Result<Self, ModelError> {
        let preprocessor = Preprocessor::fit(features);
        let x = preprocessor.transform(features);

        let mut model = GBDTModel::new(params);
        model.fit(x.view(), targets)?;

        Ok(Self {
            preprocessor,
            model,
        })
    }

    pub fn feature_names(&self) -> Vec<String> {
        self.preprocessor.feature_names()
    }

    /// Predicts rows of a table built from this pipeline's columns.
    pub fn predict(&self, features: &FeatureTable) -> Result<Vec<f64>, ModelError> {
        let x = self.preprocessor.transform(features);
        self.model.predict(x.view())
    }

    /// Selects the fitted columns by name from `df` and predicts every row.
    pub fn predict_frame(&self, df: &DataFrame) -> Result<Vec<f64>, PredictionError> {
        let features = FeatureTable::select(
            df,
            self.preprocessor.numerical_columns(),
            &self.preprocessor.categorical_columns(),
        )?;
        Ok(self.predict(&features)?)
    }

    /// Writes the pipeline, creating the parent directory if needed.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), TrainingError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string(self)?;
        fs::write(path, json)?;
        info!("Saved pipeline to {}", path.display());
        Ok(())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, PredictionError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| PredictionError::ModelLoading {
            path: path.to_path_buf(),
            source,
        })?;
        let pipeline: Self = serde_json::from_str(&json)?;
        if !pipeline.model.is_trained() {
            return Err(ModelError::NotTrained.into());
        }
        debug!(
            features = pipeline.preprocessor.n_features_out(),
            "Loaded pipeline from {}",
            path.display()
        );
        Ok(pipeline)
    }
}
