use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use crate::BoxError;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub data_path: String,
    pub id_column: String,
    pub target_column: String,
    pub output: OutputPaths,
    pub model_params: ModelParams,
    pub split_params: SplitParams,
}

/// Where the trainer writes its artifacts and the predictor reads them.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputPaths {
    pub model_path: PathBuf,
    pub metrics_path: PathBuf,
    pub importance_chart_path: PathBuf,
    pub activity_chart_path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelParams {
    pub n_estimators: usize,
    pub learning_rate: f64,
    pub max_depth: u32,
    pub random_seed: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SplitParams {
    pub test_size: f64,
    pub random_seed: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_path: "data/student_habits_performance.csv".to_string(),
            id_column: "student_id".to_string(),
            target_column: "exam_score".to_string(),
            output: OutputPaths::default(),
            model_params: ModelParams::default(),
            split_params: SplitParams::default(),
        }
    }
}

impl Default for OutputPaths {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("model/gb_model.json"),
            metrics_path: PathBuf::from("metrics.txt"),
            importance_chart_path: PathBuf::from("feature_importance.png"),
            activity_chart_path: PathBuf::from("activity_hours.png"),
        }
    }
}

impl Default for ModelParams {
    fn default() -> Self {
        Self {
            n_estimators: 200,
            learning_rate: 0.1,
            max_depth: 3,
            random_seed: 42,
        }
    }
}

impl Default for SplitParams {
    fn default() -> Self {
        Self {
            test_size: 0.2,
            random_seed: 42,
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, BoxError> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Loads `path`, or the built-in defaults when the file does not exist.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, BoxError> {
        let path = path.as_ref();
        if !path.exists() {
            debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_training_constants() {
        let config = Config::default();
        assert_eq!(config.model_params.n_estimators, 200);
        assert_eq!(config.model_params.max_depth, 3);
        assert_eq!(config.model_params.random_seed, 42);
        assert_eq!(config.split_params.random_seed, 42);
        assert!((config.split_params.test_size - 0.2).abs() < f64::EPSILON);
        assert_eq!(config.output.model_path, PathBuf::from("model/gb_model.json"));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "data_path = \"other.csv\"\n\n[model_params]\nn_estimators = 10\n",
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.data_path, "other.csv");
        assert_eq!(config.model_params.n_estimators, 10);
        assert_eq!(config.model_params.max_depth, 3);
        assert_eq!(config.target_column, "exam_score");
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_default(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.id_column, "student_id");
    }
}
