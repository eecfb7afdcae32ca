//! Console reporting
//!
//! Pure formatting: section rules, key/value metric lines and
//! predicted-vs-observed triplets. No state, no side effects beyond stdout.

use colored::*;

use crate::data::{DemandObservation, DemandPrediction};
use crate::features::feature_row;
use crate::training::RegressionMetrics;

fn dim(s: &str) -> ColoredString {
    s.truecolor(100, 100, 100)
}

fn muted(s: &str) -> ColoredString {
    s.truecolor(140, 140, 140)
}

fn ok(s: &str) -> ColoredString {
    s.truecolor(100, 210, 120)
}

pub fn section(title: &str) {
    println!();
    println!("  {}", title.white().bold());
    println!("  {}", dim(&"─".repeat(56)));
}

pub fn step_ok(msg: &str) {
    println!("  {} {}", ok("✓"), msg);
}

/// Extraction summary line.
pub fn print_row_count(rows: usize) {
    println!("  {:<16} {}", muted("Training rows"), rows.to_string().white());
}

/// Peek at the first few assembled feature vectors.
pub fn print_feature_peek(observations: &[DemandObservation], n: usize) {
    println!(
        "  {:<16} {}",
        muted("Features"),
        muted("[year, month, hour, day, id, weekday] -> count")
    );
    for obs in observations.iter().take(n) {
        println!("  {:<16} {:?} -> {:.0}", "", feature_row(obs), obs.count);
    }
}

/// Per-model regression metrics. These are computed against the same rows
/// the model was fit on, and labelled accordingly.
pub fn print_regression_metrics(model_name: &str, metrics: &RegressionMetrics) {
    section(&format!("Metrics — {} (fit on training data)", model_name));
    println!("  {:<16} {}", muted("Samples"), metrics.n_samples.to_string().white());
    println!("  {:<16} {}", muted("MAE"), format!("{:.4}", metrics.mae).white());
    println!("  {:<16} {}", muted("MSE"), format!("{:.4}", metrics.mse).white());
    println!("  {:<16} {}", muted("RMSE"), format!("{:.4}", metrics.rmse).white());
    println!("  {:<16} {}", muted("R²"), format!("{:.4}", metrics.r2).white().bold());
}

/// Header for a block of predicted-vs-observed lines.
pub fn print_prediction_header(model_name: &str) {
    section(&format!("Predictions — {}", model_name));
    println!(
        "  {:<10} {:>12} {:>12}",
        muted("Type id"),
        muted("Predicted"),
        muted("Observed")
    );
    println!("  {}", dim(&"─".repeat(36)));
}

/// One predicted-vs-observed triplet.
pub fn print_prediction_vs_observed(prediction: &DemandPrediction, observed: f64) {
    println!(
        "  {:<10} {:>12} {:>12}",
        format!("{:.0}", prediction.recognition_type_id),
        format!("{:.2}", prediction.predicted_count).white(),
        format!("{:.0}", observed)
    );
}

/// Hold the console open until the user presses enter.
pub fn wait_enter() {
    println!();
    println!("  {}", dim("press enter to exit"));
    let mut input = String::new();
    let _ = std::io::stdin().read_line(&mut input);
}
