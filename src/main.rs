use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use exam_score_predictor::{config::Config, trainer, PredictionForm, Predictor, StudentRecord};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Exam score prediction from student lifestyle habits
#[derive(Parser)]
#[command(name = "exam-score")]
#[command(version)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, global = true, default_value = "config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train the model from the configured CSV dataset
    Train,

    /// Predict the exam score of one student
    Predict(PredictArgs),
}

#[derive(Args)]
struct PredictArgs {
    /// Read the student record from a JSON file instead of the field flags
    #[arg(long)]
    record: Option<PathBuf>,

    /// Override the configured model path
    #[arg(long)]
    model: Option<PathBuf>,

    /// Override the configured activity chart path
    #[arg(long)]
    chart: Option<PathBuf>,

    #[command(flatten)]
    fields: RecordArgs,
}

/// Form fields, with the form's initial values as defaults.
#[derive(Args)]
struct RecordArgs {
    #[arg(long, default_value_t = 20, allow_negative_numbers = true)]
    age: i64,
    #[arg(long, default_value = "Male")]
    gender: String,
    #[arg(long, default_value_t = 2.0, allow_negative_numbers = true)]
    study_hours_per_day: f64,
    #[arg(long, default_value_t = 2.0, allow_negative_numbers = true)]
    social_media_hours: f64,
    #[arg(long, default_value_t = 1.0, allow_negative_numbers = true)]
    netflix_hours: f64,
    #[arg(long, default_value = "Yes")]
    part_time_job: String,
    #[arg(long, default_value_t = 90.0, allow_negative_numbers = true)]
    attendance_percentage: f64,
    #[arg(long, default_value_t = 7.0, allow_negative_numbers = true)]
    sleep_hours: f64,
    #[arg(long, default_value = "Poor")]
    diet_quality: String,
    #[arg(long, default_value_t = 3, allow_negative_numbers = true)]
    exercise_frequency: i64,
    #[arg(long, default_value = "None")]
    parental_education_level: String,
    #[arg(long, default_value = "Poor")]
    internet_quality: String,
    #[arg(long, default_value_t = 5, allow_negative_numbers = true)]
    mental_health_rating: i64,
    #[arg(long, default_value = "Yes")]
    extracurricular_participation: String,
}

impl From<RecordArgs> for StudentRecord {
    fn from(args: RecordArgs) -> Self {
        Self {
            age: args.age,
            gender: args.gender,
            study_hours_per_day: args.study_hours_per_day,
            social_media_hours: args.social_media_hours,
            netflix_hours: args.netflix_hours,
            part_time_job: args.part_time_job,
            attendance_percentage: args.attendance_percentage,
            sleep_hours: args.sleep_hours,
            diet_quality: args.diet_quality,
            exercise_frequency: args.exercise_frequency,
            parental_education_level: args.parental_education_level,
            internet_quality: args.internet_quality,
            mental_health_rating: args.mental_health_rating,
            extracurricular_participation: args.extracurricular_participation,
        }
    }
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    debug!("Loading config from path: {}", cli.config.display());
    let config = Config::load_or_default(&cli.config)
        .map_err(|e| anyhow!(e))
        .with_context(|| format!("Failed to load config {}", cli.config.display()))?;
    debug!(?config, "Config loaded");

    match cli.command {
        Commands::Train => {
            let report = trainer::train(&config)?;
            println!("{}", report.metrics);
            info!("Training complete! Model saved as {}", config.output.model_path.display());
            Ok(ExitCode::SUCCESS)
        }
        Commands::Predict(args) => predict(&config, args),
    }
}

fn predict(config: &Config, args: PredictArgs) -> Result<ExitCode> {
    let record = match &args.record {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("Failed to read record {}", path.display()))?;
            serde_json::from_str(&json)
                .with_context(|| format!("Failed to parse record {}", path.display()))?
        }
        None => StudentRecord::from(args.fields),
    };
    debug!(?record, "Submitting record");

    let model_path = args.model.unwrap_or_else(|| config.output.model_path.clone());
    let chart_path = args
        .chart
        .unwrap_or_else(|| config.output.activity_chart_path.clone());
    let form = PredictionForm::new(Predictor::load(&model_path)).with_chart_path(chart_path);

    let submission = form.submit(&record);
    println!("{}", submission.outcome);
    if let Some(chart) = &submission.chart {
        println!("Activity chart: {}", chart.display());
    }

    Ok(if submission.outcome.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
