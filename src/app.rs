//! Pipeline driver
//!
//! Config → extract → {for each trainer: fit → evaluate → save} →
//! {for each saved model: load → predict N rows → report}. Everything runs
//! sequentially; any failure propagates and ends the run.

use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::config::AppConfig;
use crate::data::csv::read_sample_observations;
use crate::data::extract::fetch_training_data;
use crate::data::DemandObservation;
use crate::error::{ForecastError, Result};
use crate::features::{design_matrix, labels};
use crate::model::{ModelArtifact, Scorer};
use crate::report;
use crate::training::{registry, RegressionMetrics};

/// Train demand models from recognition-event history and demo their
/// predictions.
#[derive(Debug, Parser)]
#[command(name = "demand-forecast")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Train and score recognition-demand regression models")]
pub struct Cli {
    /// Path to the JSON config file
    #[arg(long, default_value = "config.json")]
    pub config: PathBuf,

    /// Name of the connection string to use
    #[arg(long, default_value = "stg")]
    pub connection: String,

    /// Directory for model artifacts (overrides the config file)
    #[arg(long)]
    pub models_dir: Option<PathBuf>,

    /// Number of sample predictions to print per model
    #[arg(long, default_value = "10")]
    pub predictions: usize,

    /// Score against observations from a CSV file instead of the
    /// freshly extracted set
    #[arg(long)]
    pub sample_csv: Option<PathBuf>,

    /// Exit without waiting for a keypress
    #[arg(long)]
    pub no_wait: bool,
}

/// Run the full batch pipeline.
pub async fn run(cli: Cli) -> Result<()> {
    let config = AppConfig::load(&cli.config)?;
    let models_dir = cli.models_dir.clone().unwrap_or_else(|| config.models_dir.clone());

    let connection_string = config.connection_string(&cli.connection).ok_or_else(|| {
        ForecastError::ConfigError(format!(
            "connection string '{}' not found in {}",
            cli.connection,
            cli.config.display()
        ))
    })?;

    report::section("Extract");
    let observations = fetch_training_data(connection_string).await?;
    report::print_row_count(observations.len());
    report::print_feature_peek(&observations, 5);

    train_and_save(&observations, &models_dir, config.seed)?;
    score_saved_models(
        &observations,
        &models_dir,
        config.seed,
        cli.predictions,
        cli.sample_csv.as_deref(),
    )?;

    if !cli.no_wait {
        report::wait_enter();
    }
    Ok(())
}

/// Fit, evaluate and persist every registered trainer, in registry order.
pub fn train_and_save(
    observations: &[DemandObservation],
    models_dir: &Path,
    seed: u64,
) -> Result<()> {
    let x = design_matrix(observations);
    let y = labels(observations);

    for spec in registry(seed) {
        info!(trainer = spec.name, "training");
        let model = spec.fit(&x, &y)?;

        // Evaluate on the extracted set itself: there is no held-out split
        let scores = model.predict(&x)?;
        let metrics = RegressionMetrics::compute(&y, &scores);
        report::print_regression_metrics(spec.name, &metrics);

        let path = spec.artifact_path(models_dir);
        ModelArtifact::new(model).save(&path)?;
        report::step_ok(&format!("saved {}", path.display()));
    }

    Ok(())
}

/// Reload every artifact and print predicted-vs-observed rows, in the same
/// registry order the trainers were fit in.
pub fn score_saved_models(
    observations: &[DemandObservation],
    models_dir: &Path,
    seed: u64,
    predictions: usize,
    sample_csv: Option<&Path>,
) -> Result<()> {
    let sample_rows: Vec<DemandObservation> = match sample_csv {
        Some(path) => read_sample_observations(path, predictions)?,
        None => observations.iter().take(predictions).copied().collect(),
    };

    for spec in registry(seed) {
        let scorer = Scorer::from_path(&spec.artifact_path(models_dir))?;

        report::print_prediction_header(spec.name);
        for obs in &sample_rows {
            let prediction = scorer.predict_one(obs)?;
            report::print_prediction_vs_observed(&prediction, obs.count);
        }
    }

    Ok(())
}
