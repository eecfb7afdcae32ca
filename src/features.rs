//! Feature assembly
//!
//! Concatenates the six numeric observation fields into a fixed-order
//! feature vector. The order is defined once, in `feature_row`, and shared
//! by the training-matrix assembly and the single-row scoring path. No
//! scaling, no encoding: every field is mandatory by schema.

use ndarray::{Array1, Array2};

use crate::data::DemandObservation;

/// Number of features consumed by every trainer.
pub const FEATURE_COUNT: usize = 6;

/// Feature column names, in vector order.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = ["year", "month", "hour", "day", "id", "weekday"];

/// Name of the label column.
pub const LABEL_NAME: &str = "count";

/// The one place the feature order lives.
pub fn feature_row(obs: &DemandObservation) -> [f64; FEATURE_COUNT] {
    [obs.year, obs.month, obs.hour, obs.day, obs.id, obs.weekday]
}

/// Assemble the row-major design matrix for a batch of observations.
/// Preserves record count: one row per observation.
pub fn design_matrix(observations: &[DemandObservation]) -> Array2<f64> {
    let rows: Vec<[f64; FEATURE_COUNT]> = observations.iter().map(feature_row).collect();
    Array2::from_shape_fn((observations.len(), FEATURE_COUNT), |(r, c)| rows[r][c])
}

/// Extract the label vector (`count`) for a batch of observations.
pub fn labels(observations: &[DemandObservation]) -> Array1<f64> {
    observations.iter().map(|obs| obs.count).collect()
}
