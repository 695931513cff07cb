//! One-shot training run: load, split, fit, evaluate, persist.

use tracing::{info, instrument};

use crate::chart;
use crate::config::Config;
use crate::data_loader::DataLoader;
use crate::error::TrainingError;
use crate::importance::{permutation_importance, FeatureImportance};
use crate::metrics::ModelMetrics;
use crate::pipeline::TrainedPipeline;

/// What a training run produced.
#[derive(Debug)]
pub struct TrainingReport {
    pub metrics: ModelMetrics,
    pub importances: Vec<FeatureImportance>,
    pub train_rows: usize,
    pub test_rows: usize,
}

/// Trains on `config.data_path` and writes the pipeline, the metrics report and
/// the importance chart to the configured output paths. Any failure aborts the
/// run; earlier outputs of the same run are left as written.
#[instrument(skip(config), fields(data_path = %config.data_path))]
pub fn train(config: &Config) -> Result<TrainingReport, TrainingError> {
    let loader = DataLoader::new(&config.data_path, &config.id_column, &config.target_column)?;
    let dataset = loader.load_dataset()?;

    let split = &config.split_params;
    let (train_set, test_set) = dataset.train_test_split(split.test_size, split.random_seed)?;
    info!(
        train_rows = train_set.len(),
        test_rows = test_set.len(),
        "Fitting pipeline"
    );

    let pipeline = TrainedPipeline::fit(
        &train_set.features,
        &train_set.target,
        config.model_params.clone(),
    )?;

    let predictions = pipeline.predict(&test_set.features)?;
    let metrics = ModelMetrics::compute(&test_set.target, &predictions);
    info!(
        mae = metrics.mae,
        rmse = metrics.rmse,
        r2 = metrics.r_squared,
        "Held-out evaluation"
    );
    metrics.write_report(&config.output.metrics_path)?;

    pipeline.save(&config.output.model_path)?;

    let x_train = pipeline.preprocessor.transform(&train_set.features);
    let importances = permutation_importance(
        &pipeline.model,
        &x_train,
        &train_set.target,
        &pipeline.feature_names(),
        config.model_params.random_seed,
    )?;
    for entry in &importances {
        info!(feature = %entry.feature, importance = entry.importance, "Feature importance");
    }
    let scores: Vec<f64> = importances.iter().map(|entry| entry.importance).collect();
    chart::render_feature_importance(&config.output.importance_chart_path, &scores)?;

    info!("Model trained and saved to {}", config.output.model_path.display());

    Ok(TrainingReport {
        metrics,
        importances,
        train_rows: train_set.len(),
        test_rows: test_set.len(),
    })
}
