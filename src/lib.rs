pub mod chart;
pub mod config;
pub mod data_loader;
pub mod error;
pub mod feature_engineering;
pub mod importance;
pub mod metrics;
pub mod models;
pub mod pipeline;
pub mod predictor;
pub mod record;
pub mod serving;
pub mod trainer;
pub mod validation;

pub use config::Config;
pub use data_loader::DataLoader;
pub use feature_engineering::Preprocessor;
pub use models::{GBDTModel, Regressor};
pub use pipeline::TrainedPipeline;
pub use predictor::Predictor;
pub use record::StudentRecord;
pub use serving::PredictionForm;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;
